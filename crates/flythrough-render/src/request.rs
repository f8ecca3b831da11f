//! Render requests issued to a renderer.

use flythrough_core::{Pose, RenderSettings};

/// One frame to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    /// Image height in pixels.
    pub height: u32,
    /// Image width in pixels.
    pub width: u32,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Camera pose.
    pub pose: Pose,
}

impl RenderRequest {
    /// Pairs session render settings with a frame pose.
    ///
    /// Size and field of view always come from `settings`; whatever the frame
    /// itself stores is ignored.
    pub fn from_settings(settings: &RenderSettings, pose: Pose) -> Self {
        Self {
            height: settings.height,
            width: settings.width,
            fov: settings.fov,
            pose,
        }
    }

    /// Focal length in pixels for the vertical field of view.
    #[allow(clippy::cast_precision_loss)]
    pub fn focal_length(&self) -> f32 {
        (self.height as f32 / 2.0) / (self.fov / 2.0).tan()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_override_everything_but_pose() {
        let mut settings = RenderSettings::default();
        settings.set_height(480);
        settings.set_width(640);
        settings.set_fov_degrees(60.0);
        let pose = Pose::from_wxyz([1.0, 0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let request = RenderRequest::from_settings(&settings, pose);
        assert_eq!((request.height, request.width), (480, 640));
        assert_eq!(request.fov, settings.fov);
        assert_eq!(request.pose, pose);
    }

    #[test]
    fn test_focal_length() {
        let mut settings = RenderSettings::default();
        settings.set_height(200);
        settings.set_fov_degrees(90.0);
        let request = RenderRequest::from_settings(&settings, Pose::IDENTITY);
        assert!((request.focal_length() - 100.0).abs() < 1e-3);
    }
}
