//! Primitive solid tessellation.
//!
//! Both primitives are centered at the origin and come out closed, with
//! shared vertices and outward (counter-clockwise) winding.

use std::f64::consts::PI;

use nalgebra::Point3;

use crate::{MeshError, TriangleMesh};

/// Tessellate a box with full extents `(sx, sy, sz)` centered at origin.
///
/// Vertex layout:
/// ```text
///     v7----v6
///    /|    /|
///   v4----v5|    z
///   | v3--|-v2   | y
///   |/    |/     |/
///   v0----v1     +---x
/// ```
/// 8 vertices, 12 triangles.
pub fn cuboid(sx: f64, sy: f64, sz: f64) -> TriangleMesh {
    let (hx, hy, hz) = (sx / 2.0, sy / 2.0, sz / 2.0);
    let mut mesh = TriangleMesh::new();
    for p in [
        [-hx, -hy, -hz],
        [hx, -hy, -hz],
        [hx, hy, -hz],
        [-hx, hy, -hz],
        [-hx, -hy, hz],
        [hx, -hy, hz],
        [hx, hy, hz],
        [-hx, hy, hz],
    ] {
        mesh.push_vertex(Point3::new(p[0], p[1], p[2]));
    }

    const FACES: [[u32; 3]; 12] = [
        // bottom (-Z)
        [0, 3, 2],
        [0, 2, 1],
        // top (+Z)
        [4, 5, 6],
        [4, 6, 7],
        // front (-Y)
        [0, 1, 5],
        [0, 5, 4],
        // back (+Y)
        [3, 7, 6],
        [3, 6, 2],
        // left (-X)
        [0, 4, 7],
        [0, 7, 3],
        // right (+X)
        [1, 2, 6],
        [1, 6, 5],
    ];
    for [a, b, c] in FACES {
        mesh.push_triangle(a, b, c);
    }
    mesh
}

/// Tessellate a Z-axis cylinder centered at origin as a regular prism.
///
/// Rim vertex `k` sits at angle `2πk / segments`. Layout is bottom rim,
/// top rim, bottom center, top center: `2n + 2` vertices, `4n` triangles.
/// Fewer than 3 segments are clamped to 3.
pub fn cylinder(radius: f64, height: f64, segments: u32) -> TriangleMesh {
    let n = segments.max(3);
    let hz = height / 2.0;
    let mut mesh = TriangleMesh::new();

    for z in [-hz, hz] {
        for k in 0..n {
            let theta = 2.0 * PI * (k as f64) / (n as f64);
            mesh.push_vertex(Point3::new(radius * theta.cos(), radius * theta.sin(), z));
        }
    }
    let bottom_center = mesh.push_vertex(Point3::new(0.0, 0.0, -hz));
    let top_center = mesh.push_vertex(Point3::new(0.0, 0.0, hz));

    for k in 0..n {
        let next = (k + 1) % n;
        let (b0, b1) = (k, next);
        let (t0, t1) = (n + k, n + next);
        mesh.push_triangle(bottom_center, b1, b0);
        mesh.push_triangle(top_center, t0, t1);
        mesh.push_triangle(b0, b1, t1);
        mesh.push_triangle(b0, t1, t0);
    }
    mesh
}

/// Area of the regular `segments`-gon inscribed in a circle of `radius`.
///
/// This is the cross-section of [`cylinder`], so swept volumes can be
/// predicted exactly.
pub fn polygon_area(radius: f64, segments: u32) -> f64 {
    let n = segments.max(3) as f64;
    0.5 * n * radius * radius * (2.0 * PI / n).sin()
}

/// Reject non-positive or non-finite shape parameters.
pub fn check_dimension(name: &'static str, value: f64) -> Result<(), MeshError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::InvalidParameter { name, value })
    }
}
