//! Boolean difference, delegated to the `csgrs` BSP kernel.
//!
//! The kernel sits behind [`BooleanKernel`] so callers can swap it (tests
//! use a kernel that always fails). [`CsgKernel`] checks both operands
//! before handing them over, so degenerate input fails with a reason
//! instead of producing garbage.
//!
//! The kernel splits polygons independently, so its raw output has
//! near-duplicate corners and T-junctions. The result is welded and its
//! T-junctions closed before it is returned, which keeps a drilled solid
//! watertight enough to drill again.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use csgrs::csg::CSG;
use csgrs::polygon::Polygon;
use csgrs::vertex::Vertex;
use nalgebra::{Point3, Vector3};

use crate::repair::{close_t_junctions, merge_vertices};
use crate::{BooleanError, TriangleMesh};

/// Weld and T-junction tolerance for kernel output, in millimeters.
pub const HEAL_TOLERANCE: f64 = 1e-5;

/// A mesh boolean engine.
pub trait BooleanKernel {
    /// Remove the volume of `tool` from `base`.
    fn difference(
        &self,
        base: &TriangleMesh,
        tool: &TriangleMesh,
    ) -> Result<TriangleMesh, BooleanError>;
}

/// BSP-tree CSG from the `csgrs` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsgKernel;

impl BooleanKernel for CsgKernel {
    fn difference(
        &self,
        base: &TriangleMesh,
        tool: &TriangleMesh,
    ) -> Result<TriangleMesh, BooleanError> {
        check_operand("base", base)?;
        check_operand("tool", tool)?;

        let a = to_csg(base);
        let b = to_csg(tool);
        let result = guarded(|| a.difference(&b))?;

        let mut mesh = from_csg(&result);
        if mesh.is_empty() {
            return Err(BooleanError::EmptyResult);
        }
        if !mesh.is_finite() {
            return Err(BooleanError::NonFinite("result"));
        }
        // Only fails when welding collapses every triangle.
        merge_vertices(&mut mesh, HEAL_TOLERANCE)
            .and_then(|_| close_t_junctions(&mut mesh, HEAL_TOLERANCE))
            .map_err(|_| BooleanError::EmptyResult)?;
        Ok(mesh)
    }
}

/// Run `f`, turning a panic into [`BooleanError::KernelPanic`].
fn guarded<T>(f: impl FnOnce() -> T) -> Result<T, BooleanError> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| BooleanError::KernelPanic(panic_message(payload.as_ref())))
}

/// Reject operands the kernel cannot treat as solids.
pub fn check_operand(operand: &'static str, mesh: &TriangleMesh) -> Result<(), BooleanError> {
    if mesh.is_empty() {
        return Err(BooleanError::EmptyOperand(operand));
    }
    if !mesh.is_finite() {
        return Err(BooleanError::NonFinite(operand));
    }
    let open_edges = mesh.open_edges();
    if open_edges > 0 {
        return Err(BooleanError::NotWatertight {
            operand,
            open_edges,
        });
    }
    Ok(())
}

fn to_csg(mesh: &TriangleMesh) -> CSG<()> {
    let polygons: Vec<Polygon<()>> = mesh
        .triangles()
        .filter_map(|[a, b, c]| {
            let normal = triangle_normal(&[a, b, c])?;
            Some(Polygon::new(
                vec![
                    Vertex::new(a, normal),
                    Vertex::new(b, normal),
                    Vertex::new(c, normal),
                ],
                None,
            ))
        })
        .collect();
    CSG::from_polygons(&polygons)
}

/// Fan-triangulate the kernel's convex polygons, sharing bit-identical corners.
fn from_csg(csg: &CSG<()>) -> TriangleMesh {
    let mut mesh = TriangleMesh::new();
    let mut seen: HashMap<[u64; 3], u32> = HashMap::new();
    let mut index_of = |mesh: &mut TriangleMesh, p: Point3<f64>| {
        let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
        *seen.entry(key).or_insert_with(|| mesh.push_vertex(p))
    };

    for poly in &csg.polygons {
        if poly.vertices.len() < 3 {
            continue;
        }
        let ids: Vec<u32> = poly
            .vertices
            .iter()
            .map(|v| index_of(&mut mesh, v.pos))
            .collect();
        for i in 1..ids.len() - 1 {
            let (a, b, c) = (ids[0], ids[i], ids[i + 1]);
            if a != b && b != c && a != c {
                mesh.push_triangle(a, b, c);
            }
        }
    }
    mesh
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Unit normal of a triangle, or `None` when it is degenerate.
pub fn triangle_normal(tri: &[Point3<f64>; 3]) -> Option<Vector3<f64>> {
    (tri[1] - tri[0]).cross(&(tri[2] - tri[0])).try_normalize(1e-15)
}
