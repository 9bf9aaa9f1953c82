//! Error types for physics operations.
//!
//! Only construction and host-facing calls are fallible. Anomalies inside a
//! tick (degenerate sticks, parallel lines, unresolved penetration) degrade
//! gracefully and never surface here.

use thiserror::Error;

use crate::mover::MoverId;

/// Errors that can occur while building or driving the physics world.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Point index is out of bounds for the shape.
    #[error("point index {index} out of bounds (count: {count})")]
    PointOutOfBounds { index: usize, count: usize },

    /// A stick was requested between a point and itself.
    #[error("point {index} cannot be connected to itself")]
    SelfEdge { index: usize },

    /// Mover radius must be finite and non-negative.
    #[error("mover radius must be finite and non-negative")]
    InvalidRadius,

    /// The mover is not (or no longer) part of the roster.
    #[error("mover {0} is not in the roster")]
    UnknownMover(MoverId),

    /// Terrain generation needs at least one division.
    #[error("terrain needs at least one division")]
    InvalidDivisions,

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The notification bus was used before any event was ever registered.
    #[error("notification bus used before any event was registered")]
    BusUninitialized,
}

/// Convenience alias for `Result<T, PhysicsError>`.
pub type PhysicsResult<T> = Result<T, PhysicsError>;
