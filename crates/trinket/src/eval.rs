//! Evaluate IR primitives into triangle meshes.

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use trinket_ir::{Assembly, Placement, Primitive, Shape, Vec3};
use trinket_mesh::primitives::{check_dimension, cuboid, cylinder};
use trinket_mesh::{axis_angle, MeshError, TriangleMesh};

fn vector(v: &Vec3) -> Vector3<f64> {
    Vector3::new(v.x, v.y, v.z)
}

/// Rigid transform for a placement: rotation about the primitive's own
/// origin, then translation.
pub fn placement_isometry(placement: &Placement) -> Result<Isometry3<f64>, MeshError> {
    let rotation = match &placement.rotation {
        Some(r) => axis_angle(vector(&r.axis), r.degrees)?,
        None => UnitQuaternion::identity(),
    };
    let t = &placement.translation;
    Ok(Isometry3::from_parts(
        Translation3::new(t.x, t.y, t.z),
        rotation,
    ))
}

/// Tessellate one placed primitive.
pub fn primitive_mesh(primitive: &Primitive) -> Result<TriangleMesh, MeshError> {
    let local = match &primitive.shape {
        Shape::Box { extents } => {
            check_dimension("box.x", extents.x)?;
            check_dimension("box.y", extents.y)?;
            check_dimension("box.z", extents.z)?;
            cuboid(extents.x, extents.y, extents.z)
        }
        Shape::Cylinder {
            radius,
            height,
            segments,
        } => {
            check_dimension("cylinder.radius", *radius)?;
            check_dimension("cylinder.height", *height)?;
            cylinder(*radius, *height, *segments)
        }
    };
    Ok(local.transformed(&placement_isometry(&primitive.placement)?))
}

/// Tessellate every primitive of an assembly and concatenate in order.
pub fn assembly_mesh(assembly: &Assembly) -> Result<TriangleMesh, MeshError> {
    let meshes = assembly
        .primitives
        .iter()
        .map(primitive_mesh)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TriangleMesh::concatenate(&meshes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use trinket_ir::Role;

    #[test]
    fn box_lands_at_translation() {
        let mesh = primitive_mesh(&Primitive::cuboid("base", 50.0, 20.0, 3.0).at(25.0, 10.0, 1.5)).unwrap();
        let bb = mesh.bounding_box();
        assert_relative_eq!(bb.min.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(bb.max.x, 50.0, epsilon = 1e-12);
        assert_relative_eq!(bb.max.z, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn rotation_happens_before_translation() {
        let p = Primitive::cylinder("bar", 1.0, 10.0, 16)
            .rotated(Vec3::x_axis(), 90.0)
            .at(0.0, 20.0, 0.0);
        let bb = primitive_mesh(&p).unwrap().bounding_box();
        assert_relative_eq!(bb.min.y, 15.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.y, 25.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.z, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn bad_dimension_is_rejected() {
        let err = primitive_mesh(&Primitive::cylinder("c", -1.0, 1.0, 8)).unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidParameter {
                name: "cylinder.radius",
                ..
            }
        ));
    }

    #[test]
    fn zero_rotation_axis_is_rejected() {
        let p = Primitive::cuboid("b", 1.0, 1.0, 1.0).rotated(Vec3::zero(), 30.0);
        assert!(matches!(primitive_mesh(&p), Err(MeshError::DegenerateAxis)));
    }

    #[test]
    fn assembly_concatenates_in_order() {
        let assembly = Assembly::new("pair", Role::Accent)
            .with(Primitive::cylinder("a", 1.0, 1.0, 8))
            .with(Primitive::cuboid("b", 1.0, 1.0, 1.0).at(5.0, 0.0, 0.0));
        let mesh = assembly_mesh(&assembly).unwrap();
        assert_eq!(mesh.num_triangles(), 32 + 12);
        assert_eq!(mesh.num_vertices(), 18 + 8);
    }
}
