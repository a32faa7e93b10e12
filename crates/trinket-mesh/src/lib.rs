#![warn(missing_docs)]

//! Triangle mesh toolkit for trinket.
//!
//! Everything the generator needs from a geometry library lives here:
//! - primitive tessellation ([`primitives`]): boxes and cylinders
//! - rigid transforms and concatenation ([`TriangleMesh`])
//! - derived properties ([`inspect`]): volume, area, bounds, watertightness
//! - best-effort cleanup ([`repair`]): vertex merge and orientation fix
//! - boolean difference ([`boolean`]), delegated to `csgrs`
//! - STL import/export ([`stl`])

pub mod boolean;
pub mod error;
pub mod inspect;
pub mod primitives;
pub mod repair;
pub mod stl;

pub use boolean::{BooleanKernel, CsgKernel};
pub use error::{BooleanError, MeshError, RepairError, StlError};
pub use inspect::Aabb;
pub use repair::RepairReport;

use nalgebra::{Isometry3, Point3, Translation3, Unit, UnitQuaternion, Vector3};

/// Output triangle mesh for inspection and export.
///
/// Vertices are stored flat as `[x0, y0, z0, x1, y1, z1, ...]` in millimeters;
/// triangles index into them counter-clockwise when viewed from outside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions.
    pub vertices: Vec<f64>,
    /// Flat array of triangle indices `[i0, i1, i2, ...]`.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Whether the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, p: Point3<f64>) -> u32 {
        let idx = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&[p.x, p.y, p.z]);
        idx
    }

    /// Append a triangle.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Position of vertex `i`.
    pub fn vertex(&self, i: usize) -> Point3<f64> {
        Point3::new(
            self.vertices[i * 3],
            self.vertices[i * 3 + 1],
            self.vertices[i * 3 + 2],
        )
    }

    /// Corner positions of triangle `t`.
    pub fn triangle(&self, t: usize) -> [Point3<f64>; 3] {
        let tri = &self.indices[t * 3..t * 3 + 3];
        [
            self.vertex(tri[0] as usize),
            self.vertex(tri[1] as usize),
            self.vertex(tri[2] as usize),
        ]
    }

    /// Iterate over triangle corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        (0..self.num_triangles()).map(move |t| self.triangle(t))
    }

    /// Merge another mesh into this one (no vertex sharing across meshes).
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Concatenate meshes in order into one.
    pub fn concatenate<'a>(meshes: impl IntoIterator<Item = &'a TriangleMesh>) -> TriangleMesh {
        let mut out = TriangleMesh::new();
        for mesh in meshes {
            out.merge(mesh);
        }
        out
    }

    /// Apply a rigid transform to every vertex.
    pub fn transformed(&self, iso: &Isometry3<f64>) -> TriangleMesh {
        let mut out = self.clone();
        for chunk in out.vertices.chunks_mut(3) {
            let p = iso.transform_point(&Point3::new(chunk[0], chunk[1], chunk[2]));
            chunk.copy_from_slice(&[p.x, p.y, p.z]);
        }
        out
    }

    /// Translate by `(x, y, z)`.
    pub fn translated(&self, x: f64, y: f64, z: f64) -> TriangleMesh {
        self.transformed(&Isometry3::translation(x, y, z))
    }

    /// Rotate about `axis` through the origin by `degrees`.
    pub fn rotated(&self, axis: Vector3<f64>, degrees: f64) -> Result<TriangleMesh, MeshError> {
        Ok(self.transformed(&Isometry3::from_parts(
            Translation3::identity(),
            axis_angle(axis, degrees)?,
        )))
    }
}

/// Build a rotation from an axis (any non-zero length) and an angle in degrees.
pub fn axis_angle(axis: Vector3<f64>, degrees: f64) -> Result<UnitQuaternion<f64>, MeshError> {
    let axis = Unit::try_new(axis, 1e-12).ok_or(MeshError::DegenerateAxis)?;
    Ok(UnitQuaternion::from_axis_angle(&axis, degrees.to_radians()))
}
