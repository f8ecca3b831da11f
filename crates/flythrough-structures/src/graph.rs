//! Scene graph: scene content plus the markers and handles decorating it.

use flythrough_core::{EntityId, FlythroughError, IdAllocator, Pose, Result, TransformHandle};
use glam::Vec3;

use crate::camera_frame::{CameraFrame, CameraIntrinsics};
use crate::scene::Scene;

/// Stable index of a camera frame inside a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub usize);

/// Name of the marker showing the scene's original camera.
pub const ORIGINAL_CAMERA_NAME: &str = "original_camera";

/// Everything a viewer draws for one session.
///
/// Camera frames live in an append-only arena; a [`FrameId`] stays valid
/// until [`SceneGraph::reset`] is called.
#[derive(Debug)]
pub struct SceneGraph {
    ids: IdAllocator,
    content: Option<Scene>,
    background: Vec3,
    frames: Vec<CameraFrame>,
    original_camera: Option<FrameId>,
    handle: Option<TransformHandle>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self {
            ids: IdAllocator::new(),
            content: None,
            background: Vec3::ONE,
            frames: Vec::new(),
            original_camera: None,
            handle: None,
        }
    }
}

impl SceneGraph {
    /// Creates an empty scene graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an entity id that does not collide with any marker.
    pub fn allocate_id(&mut self) -> EntityId {
        self.ids.allocate()
    }

    /// Drops all content, markers, and handles. Entity ids are not reused.
    pub fn reset(&mut self) {
        self.content = None;
        self.background = Vec3::ONE;
        self.frames.clear();
        self.original_camera = None;
        self.handle = None;
    }

    /// Replaces the scene content.
    pub fn set_content(&mut self, scene: Scene) {
        self.content = Some(scene);
    }

    /// Returns the scene content, if any.
    pub fn content(&self) -> Option<&Scene> {
        self.content.as_ref()
    }

    /// Sets the background color.
    pub fn set_background(&mut self, color: Vec3) {
        self.background = color;
    }

    /// Returns the background color.
    pub fn background(&self) -> Vec3 {
        self.background
    }

    /// Adds a camera frame marker and returns its index.
    ///
    /// The closure receives the entity id allocated for the marker.
    pub fn add_frame(&mut self, build: impl FnOnce(EntityId) -> CameraFrame) -> FrameId {
        let id = self.allocate_id();
        let frame = build(id);
        log::debug!("added camera frame '{}' ({})", frame.name(), id);
        self.frames.push(frame);
        FrameId(self.frames.len() - 1)
    }

    /// Adds the (hidden) marker for the scene's original camera.
    pub fn add_original_camera(&mut self, intrinsics: CameraIntrinsics) -> FrameId {
        let frame = self.add_frame(|id| {
            CameraFrame::new(id, ORIGINAL_CAMERA_NAME, Pose::IDENTITY, intrinsics).with_visible(false)
        });
        self.original_camera = Some(frame);
        frame
    }

    /// Returns the original camera marker, if one was added.
    pub fn original_camera(&self) -> Option<FrameId> {
        self.original_camera
    }

    /// Gets a frame by index.
    pub fn frame(&self, id: FrameId) -> Result<&CameraFrame> {
        self.frames.get(id.0).ok_or(FlythroughError::FrameNotFound(id.0))
    }

    /// Gets a mutable frame by index.
    pub fn frame_mut(&mut self, id: FrameId) -> Result<&mut CameraFrame> {
        self.frames
            .get_mut(id.0)
            .ok_or(FlythroughError::FrameNotFound(id.0))
    }

    /// Finds the frame whose marker reports the given entity id.
    pub fn find_by_entity(&self, entity: EntityId) -> Option<FrameId> {
        self.frames.iter().position(|f| f.id() == entity).map(FrameId)
    }

    /// Iterates over all frames in insertion order.
    pub fn frames(&self) -> impl Iterator<Item = (FrameId, &CameraFrame)> {
        self.frames.iter().enumerate().map(|(i, f)| (FrameId(i), f))
    }

    /// Iterates mutably over all frames in insertion order.
    pub fn frames_mut(&mut self) -> impl Iterator<Item = (FrameId, &mut CameraFrame)> {
        self.frames
            .iter_mut()
            .enumerate()
            .map(|(i, f)| (FrameId(i), f))
    }

    /// Returns the number of frames.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Attaches a manipulation handle to the scene content.
    pub fn attach_handle(&mut self, handle: TransformHandle) {
        self.handle = Some(handle);
    }

    /// Returns the manipulation handle, if attached.
    pub fn handle(&self) -> Option<&TransformHandle> {
        self.handle.as_ref()
    }

    /// Returns the manipulation handle mutably, if attached.
    pub fn handle_mut(&mut self) -> Option<&mut TransformHandle> {
        self.handle.as_mut()
    }
}
