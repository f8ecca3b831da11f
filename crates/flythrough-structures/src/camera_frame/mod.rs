//! Camera frame markers: named, visualized camera poses.

mod camera_parameters;

pub use camera_parameters::*;

use flythrough_core::{EntityId, Pose};
use glam::Vec3;

/// Viewer camera axes expressed in the camera's own frame.
///
/// The camera looks down `+Z` with `+X` to the right and `+Y` pointing down
/// the image, so "up" in the scene is `-Y` of the camera.
pub mod axes {
    use glam::Vec3;

    /// Viewing direction.
    pub const LOOK: Vec3 = Vec3::Z;
    /// Image right.
    pub const RIGHT: Vec3 = Vec3::X;
    /// Image up.
    pub const UP: Vec3 = Vec3::NEG_Y;
}

/// A camera pose placed in the scene as a clickable frustum marker.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    id: EntityId,
    name: String,

    /// Pose of the camera.
    pub pose: Pose,
    /// Intrinsics used to draw the frustum and restored on teleport.
    pub intrinsics: CameraIntrinsics,
    /// Depth of the drawn frustum, in scene units.
    pub scale: f32,
    /// Marker color.
    pub color: [u8; 3],
    /// Whether the marker is drawn.
    pub visible: bool,
}

impl CameraFrame {
    /// Creates a visible frame marker.
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        pose: Pose,
        intrinsics: CameraIntrinsics,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            pose,
            intrinsics,
            scale: 0.2,
            color: [0, 255, 0],
            visible: true,
        }
    }

    /// Sets the frustum scale.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the marker color.
    #[must_use]
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    /// Sets marker visibility.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Returns the entity id clicks on this marker are reported with.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the scene-graph name of this marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the camera frame as (look, up, right) in world space.
    pub fn camera_frame(&self) -> (Vec3, Vec3, Vec3) {
        let rotation = self.pose.orientation;
        (
            rotation * axes::LOOK,
            rotation * axes::UP,
            rotation * axes::RIGHT,
        )
    }

    /// Generates the frustum wireframe as nodes and edges.
    ///
    /// Nodes: 0 = camera center, 1-4 = image plane corners, 5-7 = the
    /// orientation triangle drawn above the image plane.
    pub fn wireframe(&self) -> (Vec<Vec3>, Vec<[u32; 2]>) {
        let root = self.pose.position;
        let (look_dir, up_dir, right_dir) = self.camera_frame();

        let frame_center = root + look_dir * self.scale;
        let (half_width, half_height) = self.intrinsics.half_extents_at(self.scale);
        let frame_up = up_dir * half_height;
        let frame_right = right_dir * half_width;

        let nodes = vec![
            root,
            frame_center + frame_up - frame_right,
            frame_center + frame_up + frame_right,
            frame_center - frame_up - frame_right,
            frame_center - frame_up + frame_right,
            frame_center + frame_up * 1.2 - frame_right * 0.7,
            frame_center + frame_up * 1.2 + frame_right * 0.7,
            frame_center + frame_up * 2.0,
        ];

        let edges = vec![
            // From root to corners
            [0, 1],
            [0, 2],
            [0, 3],
            [0, 4],
            // Frame rectangle
            [1, 2],
            [2, 4],
            [4, 3],
            [3, 1],
            // Orientation triangle
            [5, 6],
            [6, 7],
            [7, 5],
        ];

        (nodes, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_identity_camera_looks_down_z() {
        let frame = CameraFrame::new(EntityId(0), "/0", Pose::IDENTITY, CameraIntrinsics::default());
        let (look, up, right) = frame.camera_frame();
        assert!((look - Vec3::Z).length() < 1e-6);
        assert!((up - Vec3::NEG_Y).length() < 1e-6);
        assert!((right - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_wireframe_follows_pose() {
        let pose = Pose::new(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2), Vec3::ONE);
        let frame = CameraFrame::new(EntityId(3), "/3", pose, CameraIntrinsics::from_degrees(90.0, 1.0))
            .with_scale(0.5);
        let (nodes, edges) = frame.wireframe();
        assert_eq!(nodes.len(), 8);
        assert_eq!(edges.len(), 11);
        assert_eq!(nodes[0], Vec3::ONE);

        // Corners sit on the image plane, `scale` along the look direction.
        let (look, _, _) = frame.camera_frame();
        for corner in &nodes[1..5] {
            assert!(((*corner - nodes[0]).dot(look) - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_builders() {
        let frame = CameraFrame::new(EntityId(1), "/start_camera", Pose::IDENTITY, CameraIntrinsics::default())
            .with_color([0, 0, 0])
            .with_visible(false);
        assert_eq!(frame.name(), "/start_camera");
        assert_eq!(frame.id(), EntityId(1));
        assert_eq!(frame.color, [0, 0, 0]);
        assert!(!frame.visible);
    }
}
