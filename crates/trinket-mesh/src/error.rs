//! Error types for mesh operations.

use thiserror::Error;

/// Errors from constructing or transforming meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A rotation axis had zero length.
    #[error("rotation axis has zero length")]
    DegenerateAxis,

    /// A shape parameter was not positive/finite.
    #[error("invalid shape parameter {name} = {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
}

/// Errors from boolean operations.
#[derive(Error, Debug)]
pub enum BooleanError {
    /// One operand has no triangles.
    #[error("{0} operand is empty")]
    EmptyOperand(&'static str),

    /// One operand is not a closed two-manifold.
    #[error("{operand} operand is not watertight ({open_edges} open or non-manifold edges)")]
    NotWatertight {
        /// Which operand ("base" or "tool").
        operand: &'static str,
        /// Number of edges not shared by exactly two triangles.
        open_edges: usize,
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("{0} operand has non-finite coordinates")]
    NonFinite(&'static str),

    /// The kernel produced no geometry.
    #[error("boolean result is empty")]
    EmptyResult,

    /// The kernel panicked while evaluating.
    #[error("geometry kernel panicked: {0}")]
    KernelPanic(String),
}

/// Errors from best-effort mesh repair.
#[derive(Error, Debug)]
pub enum RepairError {
    /// Mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A vertex coordinate is NaN or infinite.
    #[error("mesh has non-finite vertex {0}")]
    NonFinite(usize),

    /// A merge tolerance was not positive.
    #[error("merge tolerance must be positive, got {0}")]
    BadTolerance(f64),
}

/// Errors from reading STL data.
#[derive(Error, Debug)]
pub enum StlError {
    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended before the declared triangle count.
    #[error("STL truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the header's triangle count.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },
}
