#![warn(missing_docs)]

//! trinket: parametric primitive assembly for 3D printing
//!
//! Designs are built from boxes and cylinders, concatenated into solids,
//! drilled with boolean difference, and exported as STL.
//!
//! # Example
//!
//! ```rust,no_run
//! use trinket::keychain::{self, KeychainParams};
//!
//! let generated = keychain::build(&KeychainParams::default());
//! let solid = &generated.solids["keychain"];
//! solid.write_stl("austin_keychain.stl").unwrap();
//! ```

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};
use trinket_ir::Assembly;
use trinket_mesh::stl;
use trinket_mesh::{Aabb, MeshError, RepairError, RepairReport, TriangleMesh};

pub mod config;
pub mod error;
pub mod eval;
pub mod export;
pub mod glyph;
pub mod hole;
pub mod keychain;
pub mod pendant;

pub use config::TrinketConfig;
pub use error::{ConfigError, ExportError, GlyphError};
pub use hole::subtract_hole;
pub use trinket_mesh::stl::StlFormat;
pub use trinket_mesh::{BooleanError, BooleanKernel, CsgKernel};

/// A named solid: the unit that gets inspected and exported.
///
/// Solids come from evaluating an [`Assembly`], from concatenating other
/// solids, or from a boolean difference.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    /// Human-readable name (used in STL headers).
    pub name: String,
    mesh: TriangleMesh,
}

impl Solid {
    /// Wrap a mesh.
    pub fn new(name: impl Into<String>, mesh: TriangleMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
        }
    }

    /// Evaluate every primitive of an assembly and concatenate them.
    pub fn from_assembly(assembly: &Assembly) -> Result<Self, MeshError> {
        Ok(Self::new(
            assembly.label.clone(),
            eval::assembly_mesh(assembly)?,
        ))
    }

    /// Concatenate solids in order (no boolean union; overlaps are kept).
    pub fn concatenate<'a>(
        name: impl Into<String>,
        parts: impl IntoIterator<Item = &'a Solid>,
    ) -> Self {
        Self::new(
            name,
            TriangleMesh::concatenate(parts.into_iter().map(|s| &s.mesh)),
        )
    }

    /// The underlying triangle mesh.
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Whether the solid has no triangles.
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.mesh.num_triangles()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.mesh.num_vertices()
    }

    /// Enclosed volume in mm³.
    pub fn volume(&self) -> f64 {
        self.mesh.volume()
    }

    /// Surface area in mm².
    pub fn surface_area(&self) -> f64 {
        self.mesh.surface_area()
    }

    /// Axis-aligned bounding box.
    pub fn bounding_box(&self) -> Aabb {
        self.mesh.bounding_box()
    }

    /// Bounding box size along each axis.
    pub fn extents(&self) -> Vector3<f64> {
        self.bounding_box().extents()
    }

    /// Volume-weighted centroid.
    pub fn centroid(&self) -> Point3<f64> {
        self.mesh.centroid()
    }

    /// Closed two-manifold check.
    pub fn is_watertight(&self) -> bool {
        self.mesh.is_watertight()
    }

    /// Ray-parity inside test.
    pub fn contains_point(&self, p: &Point3<f64>) -> bool {
        self.mesh.contains_point(p)
    }

    /// Weld vertices and fix orientation; on error the mesh is unchanged.
    pub fn repair(&mut self) -> Result<RepairReport, RepairError> {
        trinket_mesh::repair::repair(&mut self.mesh)
    }

    /// Best-effort [`Solid::repair`]: failures are logged and ignored.
    pub fn tidy(&mut self) {
        match self.repair() {
            Ok(report) => debug!(
                solid = %self.name,
                merged = report.merged_vertices,
                dropped = report.dropped_triangles,
                flipped = report.flipped_components,
                "mesh cleaned up"
            ),
            Err(e) => warn!(solid = %self.name, error = %e, "mesh cleanup skipped"),
        }
    }

    /// Encode as binary STL.
    pub fn to_stl(&self) -> Vec<u8> {
        stl::to_stl_bytes(&self.mesh, &self.name)
    }

    /// Write binary STL to `path`.
    pub fn write_stl(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        self.write_stl_as(path, StlFormat::Binary)
    }

    /// Write STL to `path` in the given encoding.
    pub fn write_stl_as(&self, path: impl AsRef<Path>, format: StlFormat) -> std::io::Result<()> {
        stl::write_stl(&self.mesh, path, &self.name, format)
    }
}

/// Output of a design build: named solids plus any warnings raised.
#[derive(Debug, Clone, Default)]
pub struct Generated {
    /// Design name (e.g. "bulls_pendant").
    pub design: String,
    /// Solids keyed by layer name.
    pub solids: BTreeMap<String, Solid>,
    /// Non-fatal problems, one message each.
    pub warnings: Vec<String>,
}

impl Generated {
    /// Start an empty build.
    pub fn new(design: impl Into<String>) -> Self {
        Self {
            design: design.into(),
            ..Self::default()
        }
    }

    /// Store a solid under `key`.
    pub fn insert(&mut self, key: impl Into<String>, solid: Solid) {
        self.solids.insert(key.into(), solid);
    }

    /// Look up a solid by key.
    pub fn get(&self, key: &str) -> Option<&Solid> {
        self.solids.get(key)
    }

    /// Log and record a non-fatal problem.
    pub fn warn(&mut self, context: &str, error: &dyn Display) {
        warn!(design = %self.design, error = %error, "{context}");
        self.warnings.push(format!("{context}: {error}"));
    }

    /// Evaluate an assembly, warning and substituting an empty solid on failure.
    pub fn evaluate(&mut self, assembly: &Assembly) -> Solid {
        match Solid::from_assembly(assembly) {
            Ok(solid) => solid,
            Err(e) => {
                self.warn(&format!("could not mesh assembly '{}'", assembly.label), &e);
                Solid::new(assembly.label.clone(), TriangleMesh::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trinket_ir::{Primitive, Role};

    fn block_assembly() -> Assembly {
        Assembly::new("blocks", Role::Base)
            .with(Primitive::cuboid("a", 10.0, 10.0, 10.0).at(5.0, 5.0, 5.0))
            .with(Primitive::cuboid("b", 10.0, 10.0, 10.0).at(25.0, 5.0, 5.0))
    }

    #[test]
    fn solid_from_assembly() {
        let solid = Solid::from_assembly(&block_assembly()).unwrap();
        assert_eq!(solid.name, "blocks");
        assert_eq!(solid.num_triangles(), 24);
        assert_relative_eq!(solid.volume(), 2000.0, epsilon = 1e-9);
        assert_relative_eq!(solid.extents().x, 30.0, epsilon = 1e-9);
        assert!(solid.is_watertight());
    }

    #[test]
    fn concatenation_keeps_every_triangle() {
        let a = Solid::from_assembly(&block_assembly()).unwrap();
        let b = Solid::new("cyl", trinket_mesh::primitives::cylinder(1.0, 1.0, 8));
        let both = Solid::concatenate("both", [&a, &b]);
        assert_eq!(both.num_triangles(), a.num_triangles() + b.num_triangles());
        assert_eq!(both.num_vertices(), a.num_vertices() + b.num_vertices());
    }

    #[test]
    fn tidy_keeps_volume() {
        let mut solid = Solid::from_assembly(&block_assembly()).unwrap();
        let before = solid.volume();
        solid.tidy();
        assert_relative_eq!(solid.volume(), before, epsilon = 1e-9);
    }

    #[test]
    fn tidy_ignores_empty_solid() {
        let mut empty = Solid::new("nothing", TriangleMesh::new());
        assert!(empty.repair().is_err());
        empty.tidy();
        assert!(empty.is_empty());
    }

    #[test]
    fn evaluate_substitutes_empty_solid() {
        let bad = Assembly::new("bad", Role::Base).with(Primitive::cuboid("flat", 1.0, 0.0, 1.0));
        let mut out = Generated::new("test");
        let solid = out.evaluate(&bad);
        assert!(solid.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("'bad'"));
    }

    #[test]
    fn stl_bytes_carry_name() {
        let solid = Solid::from_assembly(&block_assembly()).unwrap();
        let bytes = solid.to_stl();
        assert!(bytes.starts_with(b"trinket STL export: blocks"));
        assert_eq!(bytes.len(), 84 + 24 * 50);
    }
}
