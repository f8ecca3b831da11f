//! Camera poses (orientation + position).

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{FlythroughError, Result};

/// A viewpoint: unit orientation quaternion plus position in scene units.
///
/// The orientation is re-normalized whenever a pose is constructed. No unit
/// or handedness conversion is performed; poses live in the same frame as the
/// viewer camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Camera-to-world rotation.
    pub orientation: Quat,
    /// Camera center in world space.
    pub position: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// Identity orientation at the origin.
    pub const IDENTITY: Self = Self {
        orientation: Quat::IDENTITY,
        position: Vec3::ZERO,
    };

    /// Creates a pose, normalizing the orientation.
    ///
    /// The orientation must be non-zero; use [`Pose::validated`] when the
    /// input comes from an untrusted source.
    pub fn new(orientation: Quat, position: Vec3) -> Self {
        Self {
            orientation: orientation.normalize(),
            position,
        }
    }

    /// Creates a pose after checking that the orientation is usable.
    pub fn validated(orientation: Quat, position: Vec3) -> Result<Self> {
        validate_quat(orientation)?;
        if !position.is_finite() {
            return Err(FlythroughError::InvalidPose(format!(
                "position {position} is not finite"
            )));
        }
        Ok(Self::new(orientation, position))
    }

    /// Creates a pose from a scalar-first `(w, x, y, z)` quaternion and a position.
    pub fn from_wxyz(wxyz: [f32; 4], position: [f32; 3]) -> Self {
        let [w, x, y, z] = wxyz;
        Self::new(Quat::from_xyzw(x, y, z, w), Vec3::from(position))
    }

    /// Returns the orientation as a scalar-first `(w, x, y, z)` array.
    pub fn wxyz(&self) -> [f32; 4] {
        let q = self.orientation;
        [q.w, q.x, q.y, q.z]
    }

    /// Returns true if both components are within `tolerance` of `other`.
    ///
    /// Orientations are compared up to sign, since `q` and `-q` describe the
    /// same rotation.
    pub fn abs_diff_eq(&self, other: &Self, tolerance: f32) -> bool {
        let dot = self.orientation.dot(other.orientation).abs();
        (1.0 - dot).abs() <= tolerance && self.position.abs_diff_eq(other.position, tolerance)
    }
}

/// Checks that a quaternion is finite and non-zero.
pub fn validate_quat(q: Quat) -> Result<()> {
    if !q.is_finite() {
        return Err(FlythroughError::InvalidPose(format!(
            "quaternion {q} contains non-finite components"
        )));
    }
    if q.length_squared() <= f32::EPSILON {
        return Err(FlythroughError::InvalidPose(
            "quaternion has zero length".to_string(),
        ));
    }
    Ok(())
}
