//! Manipulation handle attached to the captured scene content.
//!
//! The handle lets a user translate and rotate the generated scene in the
//! viewer. Its on-screen footprint is controlled by `scale`; a scale of zero
//! suppresses it entirely, which is how captures keep it out of frame.

use glam::{Quat, Vec3};

/// Default footprint scale of a freshly attached handle.
pub const DEFAULT_HANDLE_SCALE: f32 = 2.0;

/// A rigid transformation represented as separate components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation component.
    pub translation: Vec3,
    /// Rotation component as a quaternion.
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Creates a new identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Creates a transform from a translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Applies the transform to a point.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }
}

/// Interactive transform handle bound to scene content.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformHandle {
    /// Scene-graph name of the handle.
    pub name: String,
    /// Footprint scale; zero hides the handle without detaching it.
    pub scale: f32,
    /// Current transform applied to the attached content.
    pub transform: Transform,
}

impl TransformHandle {
    /// Creates a handle with the default scale and an identity transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: DEFAULT_HANDLE_SCALE,
            transform: Transform::identity(),
        }
    }

    /// Returns true if the handle currently occupies screen space.
    pub fn is_shown(&self) -> bool {
        self.scale > 0.0
    }
}
