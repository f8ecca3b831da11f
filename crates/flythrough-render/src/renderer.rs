//! Renderer and viewer-client seams.

use flythrough_structures::SceneGraph;
use image::RgbaImage;

use crate::camera::{CameraUpdate, ViewerCamera};
use crate::error::RenderResult;
use crate::request::RenderRequest;
use crate::splat::SplatRenderer;

/// Produces an RGBA image of a scene graph as seen from a requested camera.
///
/// Implementations must return an image of exactly `request.width` by
/// `request.height` pixels and draw only what is visible in `scene`.
pub trait Renderer {
    /// Renders one frame.
    fn render(&mut self, scene: &SceneGraph, request: &RenderRequest) -> RenderResult<RgbaImage>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn render(&mut self, scene: &SceneGraph, request: &RenderRequest) -> RenderResult<RgbaImage> {
        (**self).render(scene, request)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, scene: &SceneGraph, request: &RenderRequest) -> RenderResult<RgbaImage> {
        (**self).render(scene, request)
    }
}

/// A connected viewer: a camera the session can read and move, plus the
/// ability to render on request.
pub trait ViewerClient: Renderer {
    /// Returns the current camera state.
    fn camera(&self) -> ViewerCamera;

    /// Applies every field of `update` before any other observer sees the camera.
    fn apply_camera(&mut self, update: CameraUpdate);
}

/// In-process viewer backed by a local renderer.
///
/// Camera updates are applied synchronously, so every update is atomic by
/// construction.
#[derive(Debug, Default)]
pub struct LoopbackClient<R = SplatRenderer> {
    camera: ViewerCamera,
    renderer: R,
    updates: usize,
}

impl<R: Renderer> LoopbackClient<R> {
    /// Creates a client with a default camera.
    pub fn new(renderer: R) -> Self {
        Self {
            camera: ViewerCamera::default(),
            renderer,
            updates: 0,
        }
    }

    /// Number of camera updates applied so far.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Returns the wrapped renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the wrapped renderer mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Moves the camera as if the user had navigated with the mouse.
    pub fn navigate(&mut self, camera: ViewerCamera) {
        self.camera = camera;
    }

    /// Renders what this viewer currently sees at the given size.
    pub fn render_view(&mut self, scene: &SceneGraph, width: u32, height: u32) -> RenderResult<RgbaImage> {
        let request = RenderRequest {
            height,
            width,
            fov: self.camera.fov,
            pose: self.camera.pose,
        };
        self.renderer.render(scene, &request)
    }
}

impl<R: Renderer> Renderer for LoopbackClient<R> {
    fn render(&mut self, scene: &SceneGraph, request: &RenderRequest) -> RenderResult<RgbaImage> {
        self.renderer.render(scene, request)
    }
}

impl<R: Renderer> ViewerClient for LoopbackClient<R> {
    fn camera(&self) -> ViewerCamera {
        self.camera
    }

    fn apply_camera(&mut self, update: CameraUpdate) {
        if update.is_empty() {
            return;
        }
        self.camera.apply(&update);
        self.updates += 1;
        log::trace!("viewer camera now at {:?}", self.camera.pose.position);
    }
}
