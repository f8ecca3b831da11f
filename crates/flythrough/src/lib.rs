//! flythrough: camera-path synthesis and novel-view capture for generated
//! 3D scenes.
//!
//! A [`ViewingSession`] holds one generated scene and lets a connected viewer
//! record a flythrough: the first "Generate Camera Path" fixes an anchor,
//! later ones append eased, spherically interpolated frames from the anchor
//! to wherever the viewer currently is. "Save Novel Views" then renders
//! every frame with the scene decorations hidden and writes numbered images
//! plus a video.
//!
//! # Quick Start
//!
//! ```no_run
//! use flythrough::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!
//!     let scene = ProceduralProducer::new(42).generate(&Prompt::text("a mountain lake"))?;
//!     let mut session = ViewingSession::new(SessionConfig::default());
//!     session.load_scene(scene)?;
//!
//!     let mut viewer = LoopbackClient::new(SplatRenderer::default());
//!     let controls = session.connect(&mut viewer)?.clone();
//!
//!     session.dispatch(Event::Click(controls.generate_path), &mut viewer)?;
//!     // ... move the viewer camera ...
//!     session.dispatch(Event::Click(controls.generate_path), &mut viewer)?;
//!     session.dispatch(Event::Click(controls.save_views), &mut viewer)?;
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod capture;
pub mod controls;
pub mod error;
pub mod producer;
pub mod session;

pub use capture::{capture, CaptureReport, OutputLayout};
pub use controls::{Control, ControlKind, Controls, CAMERA_PATH_FOLDER, RENDER_SETTINGS_FOLDER};
pub use error::{CaptureError, SessionError, SessionResult};
pub use producer::{ProceduralProducer, Prompt, SceneProducer};
pub use session::{Action, Event, ViewingSession, HANDLE_NAME};

// Re-export core types
pub use flythrough_core::{
    checked_slerp, slerp, smoothstep, EntityId, FlythroughError, OutputOptions, PathOptions,
    Pose, Quat, RenderSettings, Result, SessionConfig, Transform, TransformHandle, Vec3,
    DEFAULT_HANDLE_SCALE,
};

// Re-export render types
pub use flythrough_render::{
    is_ffmpeg_on_path, CameraUpdate, FfmpegOptions, FfmpegVideoSink, FileImageSink, ImageSink,
    InMemoryVideoSink, LoopbackClient, RenderError, RenderRequest, RenderResult, Renderer, RgbaImage, SplatRenderer,
    VideoConfig, VideoSession, VideoSink, ViewerCamera, ViewerClient,
};

// Re-export structures
pub use flythrough_structures::{
    with_clean_scene, CameraFrame, CameraIntrinsics, CameraPath, FrameId, PointCloud, Scene,
    SceneGraph, TriangleMesh,
};

/// Initializes `env_logger` from `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::debug!("flythrough logging initialized");
}
