//! Core abstractions for flythrough-rs.
//!
//! This crate provides the math and bookkeeping shared by the other crates:
//! - [`Pose`] and the quaternion [`slerp`] used to synthesize camera paths
//! - [`smoothstep`] easing for ease-in-out motion
//! - [`Registry`] mapping interactive entities to actions
//! - Session configuration ([`SessionConfig`], [`RenderSettings`], [`PathOptions`])

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod ease;
pub mod error;
pub mod gizmo;
pub mod ids;
pub mod options;
pub mod pose;
pub mod registry;
pub mod slerp;

pub use ease::smoothstep;
pub use error::{FlythroughError, Result};
pub use gizmo::{Transform, TransformHandle, DEFAULT_HANDLE_SCALE};
pub use ids::{EntityId, IdAllocator};
pub use options::{OutputOptions, PathOptions, RenderSettings, SessionConfig};
pub use pose::Pose;
pub use registry::Registry;
pub use slerp::{checked_slerp, slerp};

// Re-export glam types for convenience
pub use glam::{Quat, Vec3};
