//! Error types for flythrough-rs.

use thiserror::Error;

use crate::ids::EntityId;

/// The main error type for flythrough-rs operations.
#[derive(Error, Debug)]
pub enum FlythroughError {
    /// A quaternion was zero-length or contained NaN/infinite components.
    #[error("invalid pose: {0}")]
    InvalidPose(String),

    /// An action is already registered for the given entity.
    #[error("entity {0} already has a registered action")]
    EntityExists(EntityId),

    /// No action is registered for the given entity.
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// A camera frame with the given index does not exist in the scene graph.
    #[error("camera frame {0} not found")]
    FrameNotFound(usize),

    /// A configuration value is outside its accepted range.
    #[error("invalid setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for flythrough-rs operations.
pub type Result<T> = std::result::Result<T, FlythroughError>;
