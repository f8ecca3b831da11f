//! Rendering error types.

use thiserror::Error;

/// Errors that can occur while rendering or persisting frames.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The renderer could not produce an image.
    #[error("render failed: {0}")]
    Failed(String),

    /// Timeout waiting for the renderer.
    #[error("timeout waiting for renderer")]
    Timeout,

    /// A frame did not have the size the sink was opened with.
    #[error("frame size mismatch: got {got:?}, expected {expected:?}")]
    SizeMismatch {
        got: (u32, u32),
        expected: (u32, u32),
    },

    /// Image file extension not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The video encoder failed.
    #[error("video encoder error: {0}")]
    Encoder(String),

    /// A sink was used before `open` or after `close`.
    #[error("video sink is not open")]
    SinkClosed,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding error.
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
