//! Error types of the viewing session and capture pipeline.

use std::path::PathBuf;

use flythrough_core::{EntityId, FlythroughError};
use flythrough_render::RenderError;
use thiserror::Error;

/// Errors that abort a capture.
///
/// Whatever the variant, the video has been closed and the scene's markers
/// restored by the time the caller sees it.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The renderer failed on frame `index`.
    #[error("render of frame {index} failed ({frames_written} frames written): {source}")]
    RenderFailure {
        /// Path index of the frame that failed.
        index: usize,
        /// Frames fully written before the failure.
        frames_written: usize,
        /// Renderer error.
        #[source]
        source: RenderError,
    },

    /// A rendered frame could not be written as an image.
    #[error("failed to write image '{}': {source}", path.display())]
    ImageWrite {
        /// Target file.
        path: PathBuf,
        /// Sink error.
        #[source]
        source: RenderError,
    },

    /// The video sink failed to open, append, or close.
    #[error("video error: {0}")]
    Video(#[source] RenderError),

    /// Output directories could not be created.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path frame could not be resolved.
    #[error(transparent)]
    Core(#[from] FlythroughError),
}

/// Errors returned by [`crate::ViewingSession`] operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The event does not apply to the entity it targets.
    #[error("entity {entity} does not accept {event}")]
    UnexpectedEvent {
        /// Targeted entity.
        entity: EntityId,
        /// Kind of the rejected event.
        event: &'static str,
    },

    /// Bookkeeping error (unknown entity or frame, duplicate registration, I/O).
    #[error(transparent)]
    Core(#[from] FlythroughError),

    /// A capture failed.
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// A specialized Result type for session operations.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
