//! STL import/export.
//!
//! Binary layout: 80-byte header, little-endian u32 triangle count, then per
//! triangle a facet normal, three vertices (all f32 triples) and a u16
//! attribute byte count.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::boolean::triangle_normal;
use crate::{StlError, TriangleMesh};

const HEADER_LEN: usize = 80;
const TRIANGLE_LEN: usize = 50;

/// STL encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StlFormat {
    /// Compact binary STL.
    #[default]
    Binary,
    /// Human-readable ASCII STL.
    Ascii,
}

fn facet_normal(tri: &[Point3<f64>; 3]) -> Vector3<f64> {
    triangle_normal(tri).unwrap_or_else(Vector3::z)
}

/// Encode a mesh as binary STL. `name` goes into the header (truncated to 80 bytes).
pub fn to_stl_bytes(mesh: &TriangleMesh, name: &str) -> Vec<u8> {
    let num_triangles = mesh.num_triangles();
    let mut data = Vec::with_capacity(HEADER_LEN + 4 + num_triangles * TRIANGLE_LEN);

    let mut header = [b' '; HEADER_LEN];
    let label = format!("trinket STL export: {name}");
    let len = label.len().min(HEADER_LEN);
    header[..len].copy_from_slice(&label.as_bytes()[..len]);
    data.extend_from_slice(&header);
    data.extend_from_slice(&(num_triangles as u32).to_le_bytes());

    for tri in mesh.triangles() {
        let n = facet_normal(&tri);
        for c in [n.x, n.y, n.z] {
            data.extend_from_slice(&(c as f32).to_le_bytes());
        }
        for v in &tri {
            for c in [v.x, v.y, v.z] {
                data.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    data
}

/// Encode a mesh as ASCII STL with solid name `name`.
pub fn to_stl_ascii(mesh: &TriangleMesh, name: &str) -> String {
    let mut out = String::with_capacity(64 + mesh.num_triangles() * 256);
    // Writing into a String cannot fail.
    let _ = writeln!(out, "solid {name}");
    for tri in mesh.triangles() {
        let n = facet_normal(&tri);
        let _ = writeln!(out, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z);
        let _ = writeln!(out, "    outer loop");
        for v in &tri {
            let _ = writeln!(out, "      vertex {:e} {:e} {:e}", v.x as f32, v.y as f32, v.z as f32);
        }
        let _ = writeln!(out, "    endloop");
        let _ = writeln!(out, "  endfacet");
    }
    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Write a mesh to `path` in the given format.
pub fn write_stl(
    mesh: &TriangleMesh,
    path: impl AsRef<Path>,
    name: &str,
    format: StlFormat,
) -> std::io::Result<()> {
    match format {
        StlFormat::Binary => fs::write(path, to_stl_bytes(mesh, name)),
        StlFormat::Ascii => fs::write(path, to_stl_ascii(mesh, name)),
    }
}

/// Decode binary STL into a triangle soup (three vertices per facet).
pub fn from_stl_bytes(data: &[u8]) -> Result<TriangleMesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::Truncated {
            expected: HEADER_LEN + 4,
            actual: data.len(),
        });
    }
    let mut count = [0u8; 4];
    count.copy_from_slice(&data[HEADER_LEN..HEADER_LEN + 4]);
    let num_triangles = u32::from_le_bytes(count) as usize;
    let expected = HEADER_LEN + 4 + num_triangles * TRIANGLE_LEN;
    if data.len() < expected {
        return Err(StlError::Truncated {
            expected,
            actual: data.len(),
        });
    }

    let read_f32 = |at: usize| {
        let mut b = [0u8; 4];
        b.copy_from_slice(&data[at..at + 4]);
        f32::from_le_bytes(b) as f64
    };

    let mut mesh = TriangleMesh::new();
    for t in 0..num_triangles {
        // skip the 12-byte normal
        let base = HEADER_LEN + 4 + t * TRIANGLE_LEN + 12;
        let mut ids = [0u32; 3];
        for (k, id) in ids.iter_mut().enumerate() {
            let at = base + k * 12;
            *id = mesh.push_vertex(Point3::new(read_f32(at), read_f32(at + 4), read_f32(at + 8)));
        }
        mesh.push_triangle(ids[0], ids[1], ids[2]);
    }
    Ok(mesh)
}

/// Read a binary STL file.
pub fn read_stl(path: impl AsRef<Path>) -> Result<TriangleMesh, StlError> {
    from_stl_bytes(&fs::read(path)?)
}
