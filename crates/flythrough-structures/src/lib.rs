//! Scene structures for flythrough-rs.
//!
//! This crate provides the objects a viewing session places in the scene:
//! - Generated scene content (splats or meshes)
//! - Camera frame markers (frustums) and the scene graph owning them
//! - Camera path synthesis between an anchor and the live viewer pose
//! - Scoped suppression of decorations for clean captures

// Graphics code intentionally uses casts for indices, colors, and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod camera_frame;
pub mod graph;
pub mod path;
pub mod scene;
pub mod visibility;

pub use camera_frame::{CameraFrame, CameraIntrinsics};
pub use graph::{FrameId, SceneGraph, ORIGINAL_CAMERA_NAME};
pub use path::{gradient_color, interpolate_poses, CameraPath, PathSample, ANCHOR_NAME};
pub use scene::{color_to_u8, PointCloud, Scene, TriangleMesh};
pub use visibility::{with_clean_scene, CleanScene};
