//! Hole subtraction with fallback.

use tracing::info;
use trinket_mesh::BooleanKernel;

use crate::{Generated, Solid};

/// Subtract `hole` from `base` with `kernel`.
///
/// If the kernel fails, the failure is logged and recorded on `out` and the
/// un-drilled base is returned, so a build always produces geometry.
pub fn subtract_hole<K: BooleanKernel + ?Sized>(
    base: &Solid,
    hole: &Solid,
    kernel: &K,
    out: &mut Generated,
) -> Solid {
    match kernel.difference(base.mesh(), hole.mesh()) {
        Ok(mesh) => {
            let drilled = Solid::new(base.name.clone(), mesh);
            info!(
                base = %base.name,
                hole = %hole.name,
                removed = base.volume() - drilled.volume(),
                "subtracted hole"
            );
            drilled
        }
        Err(e) => {
            out.warn(
                &format!(
                    "could not subtract '{}' from '{}', keeping it solid",
                    hole.name, base.name
                ),
                &e,
            );
            base.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trinket_mesh::primitives::{cuboid, cylinder, polygon_area};
    use trinket_mesh::{BooleanError, CsgKernel, TriangleMesh};

    struct Refuses;

    impl BooleanKernel for Refuses {
        fn difference(&self, _: &TriangleMesh, _: &TriangleMesh) -> Result<TriangleMesh, BooleanError> {
            Err(BooleanError::KernelPanic("refused".into()))
        }
    }

    fn plate() -> Solid {
        Solid::new("plate", cuboid(20.0, 20.0, 3.0))
    }

    fn bore() -> Solid {
        Solid::new("bore", cylinder(2.5, 4.0, 32))
    }

    #[test]
    fn successful_subtraction_removes_volume() {
        let mut out = Generated::new("test");
        let drilled = subtract_hole(&plate(), &bore(), &CsgKernel, &mut out);
        assert!(out.warnings.is_empty());
        assert_eq!(drilled.name, "plate");
        assert_relative_eq!(
            plate().volume() - drilled.volume(),
            polygon_area(2.5, 32) * 3.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn failure_falls_back_to_base() {
        let mut out = Generated::new("test");
        let kept = subtract_hole(&plate(), &bore(), &Refuses, &mut out);
        assert_eq!(kept, plate());
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("refused"));
        assert!(out.warnings[0].contains("'bore'"));
    }

    #[test]
    fn degenerate_hole_falls_back() {
        let mut out = Generated::new("test");
        let empty = Solid::new("nothing", TriangleMesh::new());
        let kept = subtract_hole(&plate(), &empty, &CsgKernel, &mut out);
        assert_relative_eq!(kept.volume(), 1200.0, epsilon = 1e-9);
        assert!(out.warnings[0].contains("tool operand is empty"));
    }

    #[test]
    fn drilled_solid_stays_watertight_and_drillable() {
        let mut out = Generated::new("test");
        let drilled = subtract_hole(&plate(), &bore(), &CsgKernel, &mut out);
        assert!(drilled.is_watertight());

        let second = Solid::new("bore2", cylinder(1.5, 4.0, 24).translated(-6.0, 4.0, 0.0));
        let twice = subtract_hole(&drilled, &second, &CsgKernel, &mut out);
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert!(twice.is_watertight());
        assert_relative_eq!(
            drilled.volume() - twice.volume(),
            polygon_area(1.5, 24) * 3.0,
            epsilon = 1e-6
        );
    }
}
