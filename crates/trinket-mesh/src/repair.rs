//! Best-effort mesh cleanup.
//!
//! Cleanup is conservative and never changes the shape:
//! - weld vertices closer than a tolerance, dropping triangles that collapse
//! - flip any connected component whose signed volume is negative
//! - split edges at T-junctions (boolean output only, see [`close_t_junctions`])
//!
//! Callers treat failure as non-fatal and keep the unrepaired mesh.

use std::collections::HashMap;

use nalgebra::Point3;

use crate::{RepairError, TriangleMesh};

/// Default vertex weld tolerance in millimeters.
pub const MERGE_TOLERANCE: f64 = 1e-6;

/// What a repair pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Vertices removed by welding.
    pub merged_vertices: usize,
    /// Triangles removed because welding collapsed them.
    pub dropped_triangles: usize,
    /// Connected components whose winding was reversed.
    pub flipped_components: usize,
}

/// Weld vertices and fix orientation in place.
///
/// On error the mesh is left untouched.
pub fn repair(mesh: &mut TriangleMesh) -> Result<RepairReport, RepairError> {
    validate(mesh)?;
    let (merged_vertices, dropped_triangles) = merge_vertices(mesh, MERGE_TOLERANCE)?;
    let flipped_components = fix_normals(mesh)?;
    Ok(RepairReport {
        merged_vertices,
        dropped_triangles,
        flipped_components,
    })
}

fn check_tolerance(tolerance: f64) -> Result<(), RepairError> {
    if tolerance > 0.0 && tolerance.is_finite() {
        Ok(())
    } else {
        Err(RepairError::BadTolerance(tolerance))
    }
}

fn validate(mesh: &TriangleMesh) -> Result<(), RepairError> {
    if mesh.is_empty() {
        return Err(RepairError::EmptyMesh);
    }
    if let Some(i) = mesh.vertices.iter().position(|v| !v.is_finite()) {
        return Err(RepairError::NonFinite(i / 3));
    }
    Ok(())
}

/// Weld vertices closer than `tolerance` to each other.
///
/// Each vertex is welded to the first earlier survivor within `tolerance`
/// (searched in the 27 neighboring grid cells). Surviving vertices keep
/// first-seen order, and unreferenced vertices are dropped. Returns
/// `(vertices removed, triangles dropped)`.
pub fn merge_vertices(
    mesh: &mut TriangleMesh,
    tolerance: f64,
) -> Result<(usize, usize), RepairError> {
    check_tolerance(tolerance)?;
    validate(mesh)?;

    let before_vertices = mesh.num_vertices();
    let before_triangles = mesh.num_triangles();

    let mut cells: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
    let mut out = TriangleMesh::new();
    let mut remap = vec![u32::MAX; before_vertices];

    for tri in mesh.indices.chunks(3) {
        let mut welded = [0u32; 3];
        for (slot, &old) in welded.iter_mut().zip(tri) {
            let old = old as usize;
            if remap[old] == u32::MAX {
                let p = mesh.vertex(old);
                let key = cell_of(&p, tolerance);
                remap[old] = match find_near(&cells, &out, key, &p, tolerance) {
                    Some(id) => id,
                    None => {
                        let id = out.push_vertex(p);
                        cells.entry(key).or_default().push(id);
                        id
                    }
                };
            }
            *slot = remap[old];
        }
        let [a, b, c] = welded;
        if a != b && b != c && a != c {
            out.push_triangle(a, b, c);
        }
    }

    let removed = before_vertices - out.num_vertices();
    let dropped = before_triangles - out.num_triangles();
    *mesh = out;
    Ok((removed, dropped))
}

fn cell_of(p: &Point3<f64>, tolerance: f64) -> [i64; 3] {
    [
        (p.x / tolerance).floor() as i64,
        (p.y / tolerance).floor() as i64,
        (p.z / tolerance).floor() as i64,
    ]
}

fn find_near(
    cells: &HashMap<[i64; 3], Vec<u32>>,
    mesh: &TriangleMesh,
    key: [i64; 3],
    p: &Point3<f64>,
    tolerance: f64,
) -> Option<u32> {
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                let Some(ids) = cells.get(&[key[0] + dx, key[1] + dy, key[2] + dz]) else {
                    continue;
                };
                if let Some(&id) = ids
                    .iter()
                    .find(|&&id| (mesh.vertex(id as usize) - *p).norm() <= tolerance)
                {
                    return Some(id);
                }
            }
        }
    }
    None
}

/// Close cracks where a vertex sits on another triangle's edge.
///
/// Polygon-splitting booleans leave T-junctions: a vertex on one side of an
/// edge with no matching vertex on the other. Triangles thinner than
/// `tolerance` are dropped first; then every triangle with a used vertex
/// within `tolerance` of the interior of one of its edges is split at that
/// vertex, until none remain. Winding is preserved. Returns the number of
/// splits.
///
/// Run [`merge_vertices`] first so coincident corners share an index.
pub fn close_t_junctions(mesh: &mut TriangleMesh, tolerance: f64) -> Result<usize, RepairError> {
    check_tolerance(tolerance)?;
    validate(mesh)?;

    let points: Vec<Point3<f64>> = (0..mesh.num_vertices()).map(|i| mesh.vertex(i)).collect();
    let kept: Vec<[u32; 3]> = mesh
        .indices
        .chunks(3)
        .map(|t| [t[0], t[1], t[2]])
        .filter(|t| !is_sliver(&points, t, tolerance))
        .collect();

    let mut used = vec![false; points.len()];
    for &i in kept.iter().flatten() {
        used[i as usize] = true;
    }
    let candidates: Vec<u32> = (0..points.len() as u32)
        .filter(|&i| used[i as usize])
        .collect();

    let mut pending: Vec<[u32; 3]> = kept.into_iter().rev().collect();
    let mut done = Vec::with_capacity(pending.len());
    let mut splits = 0;
    while let Some(tri) = pending.pop() {
        let [a, b, c] = tri;
        let halves = match find_split(&points, &candidates, tri, tolerance) {
            Some((0, v)) => ([a, v, c], [v, b, c]),
            Some((1, v)) => ([a, b, v], [a, v, c]),
            Some((_, v)) => ([a, b, v], [v, b, c]),
            None => {
                done.push(tri);
                continue;
            }
        };
        splits += 1;
        pending.push(halves.1);
        pending.push(halves.0);
    }

    mesh.indices = done.into_iter().flatten().collect();
    Ok(splits)
}

fn is_sliver(points: &[Point3<f64>], tri: &[u32; 3], tolerance: f64) -> bool {
    let [a, b, c] = (*tri).map(|i| points[i as usize]);
    let longest = (b - a).norm().max((c - b).norm()).max((a - c).norm());
    longest <= tolerance || (b - a).cross(&(c - a)).norm() / longest <= tolerance
}

/// First `(edge, vertex)` with the vertex strictly inside edge `edge`
/// (0 = a→b, 1 = b→c, 2 = c→a).
fn find_split(
    points: &[Point3<f64>],
    candidates: &[u32],
    tri: [u32; 3],
    tolerance: f64,
) -> Option<(usize, u32)> {
    for edge in 0..3 {
        let (i, j) = (tri[edge], tri[(edge + 1) % 3]);
        let (p, q) = (points[i as usize], points[j as usize]);
        let d = q - p;
        let len = d.norm();
        let (lo, hi) = (p.coords.inf(&q.coords), p.coords.sup(&q.coords));
        for &w in candidates {
            if w == i || w == j {
                continue;
            }
            let r = points[w as usize];
            if (0..3).any(|k| r[k] < lo[k] - tolerance || r[k] > hi[k] + tolerance) {
                continue;
            }
            let along = (r - p).dot(&d) / len;
            if along <= tolerance || along >= len - tolerance {
                continue;
            }
            if (r - p).cross(&d).norm() / len <= tolerance {
                return Some((edge, w));
            }
        }
    }
    None
}

/// Make every connected component wind outward.
///
/// Components are groups of triangles sharing vertex indices. A component
/// with negative signed volume is reversed as a whole. Returns the number
/// of components flipped.
pub fn fix_normals(mesh: &mut TriangleMesh) -> Result<usize, RepairError> {
    validate(mesh)?;

    let mut parent: Vec<usize> = (0..mesh.num_vertices()).collect();
    for tri in mesh.indices.chunks(3) {
        let root = find(&mut parent, tri[0] as usize);
        for &v in &tri[1..] {
            let other = find(&mut parent, v as usize);
            parent[other] = root;
        }
    }

    let mut volumes: HashMap<usize, f64> = HashMap::new();
    for t in 0..mesh.num_triangles() {
        let [v0, v1, v2] = mesh.triangle(t);
        let root = find(&mut parent, mesh.indices[t * 3] as usize);
        *volumes.entry(root).or_default() += v0.coords.dot(&v1.coords.cross(&v2.coords));
    }

    let mut flipped = 0;
    for (&root, &vol) in &volumes {
        if vol < 0.0 {
            flipped += 1;
            for t in 0..mesh.num_triangles() {
                if find(&mut parent, mesh.indices[t * 3] as usize) == root {
                    mesh.indices.swap(t * 3 + 1, t * 3 + 2);
                }
            }
        }
    }
    Ok(flipped)
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{cuboid, cylinder};
    use approx::assert_relative_eq;

    /// A cube whose 12 triangles each own their corners (36 vertices).
    fn soup_cube() -> TriangleMesh {
        let cube = cuboid(2.0, 2.0, 2.0);
        let mut soup = TriangleMesh::new();
        for [a, b, c] in cube.triangles() {
            let i = soup.push_vertex(a);
            let j = soup.push_vertex(b);
            let k = soup.push_vertex(c);
            soup.push_triangle(i, j, k);
        }
        soup
    }

    #[test]
    fn merge_welds_triangle_soup() {
        let mut soup = soup_cube();
        assert!(!soup.is_watertight());
        let (removed, dropped) = merge_vertices(&mut soup, MERGE_TOLERANCE).unwrap();
        assert_eq!(removed, 28);
        assert_eq!(dropped, 0);
        assert_eq!(soup.num_vertices(), 8);
        assert!(soup.is_watertight());
    }

    #[test]
    fn merge_drops_collapsed_triangles() {
        let mut mesh = cuboid(1.0, 1.0, 1.0);
        let sliver = [mesh.vertex(0), mesh.vertex(1)];
        let a = mesh.push_vertex(sliver[0]);
        let b = mesh.push_vertex(sliver[0]);
        let c = mesh.push_vertex(sliver[1]);
        mesh.push_triangle(a, b, c);
        let (_, dropped) = merge_vertices(&mut mesh, MERGE_TOLERANCE).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(mesh.num_triangles(), 12);
    }

    #[test]
    fn fix_normals_flips_inverted_component_only() {
        let good = cylinder(1.0, 1.0, 16);
        let mut bad = cuboid(1.0, 1.0, 1.0).translated(5.0, 0.0, 0.0);
        for tri in bad.indices.chunks_mut(3) {
            tri.swap(1, 2);
        }
        assert!(bad.signed_volume() < 0.0);

        let mut mesh = TriangleMesh::concatenate([&good, &bad]);
        let flipped = fix_normals(&mut mesh).unwrap();
        assert_eq!(flipped, 1);
        assert_relative_eq!(mesh.signed_volume(), good.volume() + 1.0, epsilon = 1e-9);
    }

    #[test]
    fn repair_reports_and_keeps_volume() {
        let mut soup = soup_cube();
        let report = repair(&mut soup).unwrap();
        assert_eq!(report.merged_vertices, 28);
        assert_eq!(report.flipped_components, 0);
        assert_relative_eq!(soup.volume(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn repair_rejects_bad_input_without_touching_it() {
        let mut empty = TriangleMesh::new();
        assert!(matches!(repair(&mut empty), Err(RepairError::EmptyMesh)));

        let mut cube = cuboid(1.0, 1.0, 1.0);
        cube.vertices[4] = f64::NAN;
        let before = cube.indices.clone();
        assert!(matches!(repair(&mut cube), Err(RepairError::NonFinite(1))));
        assert_eq!(cube.indices, before);
    }

    #[test]
    fn merge_rejects_bad_tolerance() {
        let mut cube = cuboid(1.0, 1.0, 1.0);
        assert!(matches!(
            merge_vertices(&mut cube, 0.0),
            Err(RepairError::BadTolerance(_))
        ));
    }

    #[test]
    fn merge_welds_near_misses_across_cell_boundaries() {
        let mut mesh = cuboid(1.0, 1.0, 1.0);
        let n = mesh.num_vertices();
        // Copies of corners nudged by less than the tolerance in every direction.
        let copies: Vec<u32> = (0..3)
            .map(|i| {
                let p = mesh.vertex(i);
                mesh.push_vertex(p + nalgebra::Vector3::new(4e-6, -4e-6, 4e-6))
            })
            .collect();
        mesh.push_triangle(copies[0], copies[1], copies[2]);
        let (removed, dropped) = merge_vertices(&mut mesh, 1e-5).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(dropped, 0);
        assert_eq!(mesh.num_vertices(), n);
    }

    /// Two unit squares side by side, the right one split at (1, 0.5).
    fn cracked_strip() -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        let v: Vec<u32> = [
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [2.0, 0.0],
            [2.0, 1.0],
            [1.0, 0.5],
        ]
        .iter()
        .map(|[x, y]| mesh.push_vertex(Point3::new(*x, *y, 0.0)))
        .collect();
        mesh.push_triangle(v[0], v[1], v[2]);
        mesh.push_triangle(v[0], v[2], v[3]);
        mesh.push_triangle(v[1], v[4], v[6]);
        mesh.push_triangle(v[6], v[4], v[5]);
        mesh.push_triangle(v[6], v[5], v[2]);
        mesh
    }

    fn edge_uses(mesh: &TriangleMesh) -> HashMap<(u32, u32), usize> {
        let mut uses = HashMap::new();
        for t in mesh.indices.chunks(3) {
            for k in 0..3 {
                let (a, b) = (t[k], t[(k + 1) % 3]);
                *uses.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }
        uses
    }

    #[test]
    fn t_junction_is_split() {
        let mut mesh = cracked_strip();
        assert_eq!(edge_uses(&mesh).get(&(1, 2)), Some(&1));

        let splits = close_t_junctions(&mut mesh, 1e-5).unwrap();
        assert_eq!(splits, 1);
        assert_eq!(mesh.num_triangles(), 6);
        let uses = edge_uses(&mesh);
        assert_eq!(uses.get(&(1, 2)), None);
        assert_eq!(uses.get(&(1, 6)), Some(&2));
        assert_eq!(uses.get(&(2, 6)), Some(&2));
        assert_relative_eq!(mesh.surface_area(), 2.0, epsilon = 1e-12);
        // Winding stays +Z everywhere.
        for [a, b, c] in mesh.triangles() {
            assert!((b - a).cross(&(c - a)).z > 0.0);
        }
    }

    #[test]
    fn t_junctions_leave_clean_meshes_alone() {
        let mut mesh = cylinder(2.0, 3.0, 24);
        let before = mesh.clone();
        assert_eq!(close_t_junctions(&mut mesh, 1e-5).unwrap(), 0);
        assert_eq!(mesh, before);
    }

    #[test]
    fn t_junctions_drop_slivers() {
        let mut mesh = cuboid(1.0, 1.0, 1.0);
        let [a, b] = [mesh.vertex(0), mesh.vertex(1)];
        let i = mesh.push_vertex(a);
        let j = mesh.push_vertex(b);
        let k = mesh.push_vertex(Point3::from((a.coords + b.coords) / 2.0));
        mesh.push_triangle(i, j, k);
        close_t_junctions(&mut mesh, 1e-5).unwrap();
        assert_eq!(mesh.num_triangles(), 12);
        assert!(mesh.is_watertight());
    }
}
