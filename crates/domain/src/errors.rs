//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Coordinate outside the valid longitude/latitude range
    #[error("Invalid coordinates ({x}, {y}): longitude must be -180 to 180, latitude -90 to 90")]
    InvalidCoordinates { x: f64, y: f64 },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
