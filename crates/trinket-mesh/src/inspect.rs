//! Derived mesh properties: volume, area, bounds, centroid, closure.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use crate::TriangleMesh;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// An inverted box that any point expands.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
        }
    }

    /// Grow to include `p`.
    pub fn expand(&mut self, p: &Point3<f64>) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    /// Size along each axis.
    pub fn extents(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center point.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Whether `p` lies inside the box grown by `tol`.
    pub fn contains(&self, p: &Point3<f64>, tol: f64) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] - tol && p[i] <= self.max[i] + tol)
    }
}

impl TriangleMesh {
    /// Signed volume via the divergence theorem (positive for outward winding).
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|[v0, v1, v2]| v0.coords.dot(&v1.coords.cross(&v2.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Enclosed volume; positive for well-formed closed meshes.
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[v0, v1, v2]| (v1 - v0).cross(&(v2 - v0)).norm() / 2.0)
            .sum()
    }

    /// Axis-aligned bounding box of all vertices.
    pub fn bounding_box(&self) -> Aabb {
        let mut bb = Aabb::empty();
        for i in 0..self.num_vertices() {
            bb.expand(&self.vertex(i));
        }
        bb
    }

    /// Volume-weighted centroid, assuming uniform density.
    pub fn centroid(&self) -> Point3<f64> {
        let mut acc = Vector3::zeros();
        let mut total = 0.0;
        for [v0, v1, v2] in self.triangles() {
            let vol = v0.coords.dot(&v1.coords.cross(&v2.coords));
            total += vol;
            acc += (v0.coords + v1.coords + v2.coords) * vol;
        }
        if total.abs() < 1e-15 {
            return Point3::origin();
        }
        Point3::from(acc / (4.0 * total))
    }

    /// Number of edges not shared by exactly two triangles.
    pub fn open_edges(&self) -> usize {
        let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
        for tri in self.indices.chunks(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                *counts.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }
        counts.values().filter(|&&c| c != 2).count()
    }

    /// Closed two-manifold check on the index topology.
    pub fn is_watertight(&self) -> bool {
        !self.is_empty() && self.open_edges() == 0
    }

    /// Whether every vertex coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(|v| v.is_finite())
    }

    /// Test if a point is inside the mesh by ray casting.
    ///
    /// Casts a slightly tilted ray along +X (to avoid grazing edges and
    /// vertices) and counts crossings: odd = inside, even = outside.
    pub fn contains_point(&self, point: &Point3<f64>) -> bool {
        let dir = Vector3::new(1.0, 1e-7, 1.3e-7);
        let mut crossings = 0u32;

        for [v0, v1, v2] in self.triangles() {
            // Möller-Trumbore
            let edge1 = v1 - v0;
            let edge2 = v2 - v0;
            let h = dir.cross(&edge2);
            let a = edge1.dot(&h);
            if a.abs() < 1e-12 {
                continue;
            }
            let f = 1.0 / a;
            let s = *point - v0;
            let u = f * s.dot(&h);
            if !(0.0..=1.0).contains(&u) {
                continue;
            }
            let q = s.cross(&edge1);
            let v = f * dir.dot(&q);
            if v < 0.0 || u + v > 1.0 {
                continue;
            }
            if f * edge2.dot(&q) > 1e-10 {
                crossings += 1;
            }
        }

        crossings % 2 == 1
    }
}
