//! Error types shared across the RampLab crates.

use thiserror::Error;

/// Result type for ramp construction and geometry operations.
pub type RampResult<T> = Result<T, RampError>;

/// Errors that can occur while validating a ramp or building its geometry.
///
/// Validation errors are raised at construction time, before any mesh or
/// collision proxy exists. Geometry errors are raised by the collision proxy
/// builder when a mesh fails its structural invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RampError {
    /// Ramp width must be strictly positive.
    #[error("invalid ramp width: {0} (must be positive)")]
    NonPositiveWidth(f64),

    /// Ramp thickness must be strictly positive.
    #[error("invalid ramp thickness: {0} (must be positive)")]
    NonPositiveThickness(f64),

    /// At least one segment is required; zero would divide by zero.
    #[error("segment count must be at least 1")]
    ZeroSegments,

    /// A spiral ramp with zero turns has no defined helix.
    #[error("spiral turn count must be non-zero")]
    ZeroTurns,

    /// A coordinate was NaN or infinite.
    #[error("non-finite coordinate in {field}")]
    NonFiniteCoordinate {
        /// Which spec field held the bad value.
        field: &'static str,
    },

    /// The helix radius must leave room for the strip width.
    #[error("spiral radius {radius} too small for width {width}")]
    RadiusTooSmall {
        /// Horizontal distance from the helix axis to the start point.
        radius: f64,
        /// Requested strip width.
        width: f64,
    },

    /// A triangle index referenced a vertex that does not exist.
    ///
    /// Raised by mesh validation and by the collision proxy builder before
    /// handing geometry to a physics collaborator.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Vertex attribute arrays disagree in length.
    #[error("attribute length mismatch: {positions} positions, {attribute_len} {attribute}")]
    AttributeMismatch {
        /// Number of positions in the mesh.
        positions: usize,
        /// Name of the mismatched attribute array.
        attribute: &'static str,
        /// Length of the mismatched attribute array.
        attribute_len: usize,
    },

    /// Index buffer length is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    RaggedIndexBuffer(usize),
}

impl RampError {
    /// Check if this error came from parameter validation (as opposed to
    /// a malformed mesh).
    #[must_use]
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(
            self,
            Self::NonPositiveWidth(_)
                | Self::NonPositiveThickness(_)
                | Self::ZeroSegments
                | Self::ZeroTurns
                | Self::NonFiniteCoordinate { .. }
                | Self::RadiusTooSmall { .. }
        )
    }

    /// Check if this error describes degenerate geometry.
    #[must_use]
    pub fn is_degenerate_geometry(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::AttributeMismatch { .. }
                | Self::RaggedIndexBuffer(_)
        )
    }
}
