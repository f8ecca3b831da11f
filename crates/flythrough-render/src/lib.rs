//! Rendering seams for flythrough-rs.
//!
//! This crate provides:
//! - The [`Renderer`] and [`ViewerClient`] traits a session talks to
//! - Viewer camera state with transactional [`CameraUpdate`]s
//! - A CPU [`SplatRenderer`] and an in-process [`LoopbackClient`]
//! - Image and video sinks for captured frames

// Graphics code intentionally uses casts for pixel coordinates
#![allow(clippy::cast_precision_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod error;
pub mod renderer;
pub mod request;
pub mod screenshot;
pub mod splat;
pub mod video;

pub use camera::{world_to_camera, CameraUpdate, ViewerCamera};
pub use error::{RenderError, RenderResult};
pub use renderer::{LoopbackClient, Renderer, ViewerClient};
pub use request::RenderRequest;
pub use screenshot::{frame_file_name, save_image, FileImageSink, ImageSink};
pub use splat::SplatRenderer;
pub use video::{
    ensure_parent_dir, is_ffmpeg_on_path, FfmpegOptions, FfmpegVideoSink, InMemoryVideoSink,
    VideoConfig, VideoSession, VideoSink,
};

pub use image::RgbaImage;
