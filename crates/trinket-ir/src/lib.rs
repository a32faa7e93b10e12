#![warn(missing_docs)]

//! Intermediate representation for trinket designs.
//!
//! A design is described as a [`Plan`]: an ordered list of [`Assembly`]
//! values, each an ordered list of placed [`Primitive`] solids tagged with a
//! label and a [`Role`].
//!
//! The IR is purely declarative: no mesh data, just primitive placements.
//! Meshing is handled by `trinket-mesh`.

use serde::{Deserialize, Serialize};

/// Current plan format version.
pub const PLAN_VERSION: &str = "0.1";

/// 3D vector with f64 components (conventionally millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Unit X axis.
    pub fn x_axis() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

/// Rotation about an arbitrary axis through the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAngle {
    /// Rotation axis (need not be normalized, must be non-zero).
    pub axis: Vec3,
    /// Rotation angle in degrees (right-hand rule).
    pub degrees: f64,
}

/// Primitive shape kind with its shape parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    /// Axis-aligned box centered at origin.
    Box {
        /// Full size along each axis.
        extents: Vec3,
    },
    /// Cylinder along the Z axis, centered at origin.
    Cylinder {
        /// Radius of the cylinder.
        radius: f64,
        /// Height of the cylinder.
        height: f64,
        /// Number of radial segments.
        segments: u32,
    },
}

/// Rigid placement of a primitive: optional rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Offset applied after rotation.
    pub translation: Vec3,
    /// Rotation applied about the primitive's own origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<AxisAngle>,
}

impl Placement {
    /// Identity placement.
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zero(),
            rotation: None,
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

/// A named, placed primitive solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Human-readable name (e.g. "left_horn").
    pub name: String,
    /// Shape and its parameters.
    pub shape: Shape,
    /// Where the shape sits in the design.
    #[serde(default)]
    pub placement: Placement,
}

impl Primitive {
    /// A box with the given full extents, centered at origin.
    pub fn cuboid(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Box {
                extents: Vec3::new(x, y, z),
            },
            placement: Placement::identity(),
        }
    }

    /// A Z-axis cylinder centered at origin.
    pub fn cylinder(name: impl Into<String>, radius: f64, height: f64, segments: u32) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Cylinder {
                radius,
                height,
                segments,
            },
            placement: Placement::identity(),
        }
    }

    /// Place the primitive's center at `(x, y, z)`.
    pub fn at(mut self, x: f64, y: f64, z: f64) -> Self {
        self.placement.translation = Vec3::new(x, y, z);
        self
    }

    /// Rotate the primitive about `axis` by `degrees` before translating it.
    pub fn rotated(mut self, axis: Vec3, degrees: f64) -> Self {
        self.placement.rotation = Some(AxisAngle { axis, degrees });
        self
    }
}

/// Logical role of an assembly in a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Base or background body.
    Base,
    /// Accent/logo detail.
    Accent,
    /// Lettering and small details.
    Text,
    /// Material to subtract.
    Hole,
}

/// An ordered collection of primitives sharing a label and role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    /// Layer or color label (e.g. "black", "chain_hole").
    pub label: String,
    /// What the assembly is for.
    pub role: Role,
    /// Primitives in layering order.
    pub primitives: Vec<Primitive>,
}

impl Assembly {
    /// Create an empty assembly.
    pub fn new(label: impl Into<String>, role: Role) -> Self {
        Self {
            label: label.into(),
            role,
            primitives: Vec::new(),
        }
    }

    /// Append a primitive.
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Builder form of [`Assembly::push`].
    pub fn with(mut self, primitive: Primitive) -> Self {
        self.push(primitive);
        self
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Whether the assembly has no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// A complete design: every assembly needed to build its solids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Format version string.
    pub version: String,
    /// Design name (e.g. "austin_keychain").
    pub name: String,
    /// Assemblies in build order.
    pub assemblies: Vec<Assembly>,
}

impl Plan {
    /// Create an empty plan.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: PLAN_VERSION.to_string(),
            name: name.into(),
            assemblies: Vec::new(),
        }
    }

    /// Append an assembly.
    pub fn push(&mut self, assembly: Assembly) {
        self.assemblies.push(assembly);
    }

    /// Find an assembly by label.
    pub fn assembly(&self, label: &str) -> Option<&Assembly> {
        self.assemblies.iter().find(|a| a.label == label)
    }

    /// Total number of primitives over all assemblies.
    pub fn primitive_count(&self) -> usize {
        self.assemblies.iter().map(Assembly::len).sum()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
