//! Viewer camera state and transactional updates.

use flythrough_core::Pose;
use glam::{Mat4, Quat, Vec3};

/// Camera state of one connected viewer.
///
/// The camera looks down its local `+Z` axis with `+Y` pointing down the
/// image (see [`flythrough_structures::camera_frame::axes`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerCamera {
    /// Orientation and position.
    pub pose: Pose,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for ViewerCamera {
    fn default() -> Self {
        Self {
            pose: Pose::IDENTITY,
            fov: std::f32::consts::FRAC_PI_2,
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl ViewerCamera {
    /// Applies every field of `update` at once.
    pub fn apply(&mut self, update: &CameraUpdate) {
        if let Some(orientation) = update.orientation {
            self.pose.orientation = orientation.normalize();
        }
        if let Some(position) = update.position {
            self.pose.position = position;
        }
        if let Some(fov) = update.fov {
            self.fov = fov;
        }
        if let Some(near) = update.near {
            self.near = near;
        }
        if let Some(far) = update.far {
            self.far = far;
        }
    }

    /// Returns the world-to-camera matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        world_to_camera(&self.pose)
    }
}

/// Returns the world-to-camera matrix for a camera pose.
#[must_use]
pub fn world_to_camera(pose: &Pose) -> Mat4 {
    Mat4::from_rotation_translation(pose.orientation, pose.position).inverse()
}

/// A set of camera fields written to a viewer in one transaction.
///
/// Viewers must apply all present fields before the next observer can see
/// the camera, so a teleport never exposes a new orientation paired with a
/// stale position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraUpdate {
    /// New orientation.
    pub orientation: Option<Quat>,
    /// New position.
    pub position: Option<Vec3>,
    /// New vertical field of view in radians.
    pub fov: Option<f32>,
    /// New near clipping plane.
    pub near: Option<f32>,
    /// New far clipping plane.
    pub far: Option<f32>,
}

impl CameraUpdate {
    /// Moves the camera to `pose` with the given field of view.
    pub fn teleport(pose: Pose, fov: f32) -> Self {
        Self {
            orientation: Some(pose.orientation),
            position: Some(pose.position),
            fov: Some(fov),
            ..Self::default()
        }
    }

    /// Changes only the field of view.
    pub fn fov(fov: f32) -> Self {
        Self {
            fov: Some(fov),
            ..Self::default()
        }
    }

    /// Sets the clipping planes.
    #[must_use]
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = Some(near);
        self.far = Some(far);
        self
    }

    /// Returns true if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
