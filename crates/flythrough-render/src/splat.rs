//! CPU splat renderer.
//!
//! Projects scene points through a pinhole camera and draws them as small
//! depth-tested squares. Visible camera frame markers are drawn as frustum
//! wireframes and a shown manipulation handle as three axis lines, so the
//! output reflects exactly what a viewer would see.

use flythrough_core::{Transform, TransformHandle};
use flythrough_structures::{color_to_u8, SceneGraph};
use glam::{Mat4, Vec3};
use image::{Rgba, RgbaImage};

use crate::camera::world_to_camera;
use crate::error::{RenderError, RenderResult};
use crate::request::RenderRequest;
use crate::renderer::Renderer;

/// Points closer than this to the camera plane are culled.
const NEAR_PLANE: f32 = 1e-4;

/// Axis colors of the manipulation handle (x, y, z).
const HANDLE_AXIS_COLORS: [[u8; 3]; 3] = [[230, 50, 50], [50, 200, 50], [50, 80, 230]];

/// Fraction of the handle scale used as the drawn axis length.
const HANDLE_AXIS_LENGTH: f32 = 0.25;

/// Software renderer for point-cloud and mesh-vertex scenes.
#[derive(Debug, Clone)]
pub struct SplatRenderer {
    /// Half-size of each splat in pixels; 0 draws single pixels.
    pub point_radius: u32,
}

impl Default for SplatRenderer {
    fn default() -> Self {
        Self { point_radius: 1 }
    }
}

impl SplatRenderer {
    /// Creates a renderer with the given splat radius.
    pub fn new(point_radius: u32) -> Self {
        Self { point_radius }
    }
}

impl Renderer for SplatRenderer {
    fn render(&mut self, scene: &SceneGraph, request: &RenderRequest) -> RenderResult<RgbaImage> {
        if request.width == 0 || request.height == 0 {
            return Err(RenderError::Failed(format!(
                "cannot render a {}x{} image",
                request.width, request.height
            )));
        }
        if !(request.fov > 0.0 && request.fov < std::f32::consts::PI) {
            return Err(RenderError::Failed(format!(
                "field of view {} rad is out of range",
                request.fov
            )));
        }

        let mut target = Target::new(request, scene.background());

        if let Some(content) = scene.content() {
            let transform = scene
                .handle()
                .map_or_else(Transform::identity, |handle| handle.transform);
            for (position, color) in content.positions().iter().zip(content.colors()) {
                target.splat(transform.transform_point(*position), color_to_u8(*color), self.point_radius);
            }
        }

        for (_, frame) in scene.frames() {
            if !frame.visible {
                continue;
            }
            let (nodes, edges) = frame.wireframe();
            for [a, b] in edges {
                target.line(nodes[a as usize], nodes[b as usize], frame.color);
            }
        }

        if let Some(handle) = scene.handle().filter(|h| h.is_shown()) {
            draw_handle(&mut target, handle);
        }

        Ok(target.image)
    }
}

fn draw_handle(target: &mut Target, handle: &TransformHandle) {
    let origin = handle.transform.translation;
    let length = handle.scale * HANDLE_AXIS_LENGTH;
    for (axis, color) in [Vec3::X, Vec3::Y, Vec3::Z].into_iter().zip(HANDLE_AXIS_COLORS) {
        target.line(origin, origin + handle.transform.rotation * axis * length, color);
    }
}

/// Color and depth buffers plus the projection used to fill them.
struct Target {
    image: RgbaImage,
    depth: Vec<f32>,
    view: Mat4,
    focal: f32,
    center: (f32, f32),
}

impl Target {
    #[allow(clippy::cast_precision_loss)]
    fn new(request: &RenderRequest, background: Vec3) -> Self {
        let [r, g, b] = color_to_u8(background);
        Self {
            image: RgbaImage::from_pixel(request.width, request.height, Rgba([r, g, b, 255])),
            depth: vec![f32::INFINITY; request.width as usize * request.height as usize],
            view: world_to_camera(&request.pose),
            focal: request.focal_length(),
            center: (request.width as f32 / 2.0, request.height as f32 / 2.0),
        }
    }

    /// Projects a world point to (column, row, depth); `None` behind the camera.
    fn project(&self, world: Vec3) -> Option<(f32, f32, f32)> {
        let p = self.view.transform_point3(world);
        if p.z <= NEAR_PLANE {
            return None;
        }
        Some((
            self.focal * p.x / p.z + self.center.0,
            self.focal * p.y / p.z + self.center.1,
            p.z,
        ))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn plot(&mut self, x: i64, y: i64, depth: f32, color: [u8; 3]) {
        let (width, height) = self.image.dimensions();
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let index = y as usize * width as usize + x as usize;
        if depth < self.depth[index] {
            self.depth[index] = depth;
            self.image.put_pixel(x, y, Rgba([color[0], color[1], color[2], 255]));
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn splat(&mut self, world: Vec3, color: [u8; 3], radius: u32) {
        let Some((u, v, depth)) = self.project(world) else {
            return;
        };
        let (cx, cy) = (u.floor() as i64, v.floor() as i64);
        let r = i64::from(radius);
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                self.plot(x, y, depth, color);
            }
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
    fn line(&mut self, from: Vec3, to: Vec3, color: [u8; 3]) {
        let (Some(a), Some(b)) = (self.project(from), self.project(to)) else {
            return;
        };
        let (width, height) = self.image.dimensions();
        let span = (b.0 - a.0).abs().max((b.1 - a.1).abs());
        let limit = 4.0 * (width + height) as f32;
        let steps = span.ceil().clamp(1.0, limit) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = a.0 + (b.0 - a.0) * t;
            let y = a.1 + (b.1 - a.1) * t;
            let depth = a.2 + (b.2 - a.2) * t;
            self.plot(x.floor() as i64, y.floor() as i64, depth, color);
        }
    }
}
