//! Camera intrinsics carried by frustum markers.

/// Camera intrinsics parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl CameraIntrinsics {
    /// Creates new camera intrinsics.
    pub fn new(fov: f32, aspect: f32) -> Self {
        Self { fov, aspect }
    }

    /// Creates intrinsics from a vertical field of view in degrees.
    pub fn from_degrees(fov_degrees: f32, aspect: f32) -> Self {
        Self::new(fov_degrees.to_radians(), aspect)
    }

    /// Returns the vertical field of view in degrees.
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Half extents `(width, height)` of the image plane at `depth`.
    pub fn half_extents_at(&self, depth: f32) -> (f32, f32) {
        let half_height = depth * (self.fov / 2.0).tan();
        (self.aspect * half_height, half_height)
    }
}

impl Default for CameraIntrinsics {
    /// 90° vertical field of view, 16:9 aspect.
    fn default() -> Self {
        Self::from_degrees(90.0, 16.0 / 9.0)
    }
}
