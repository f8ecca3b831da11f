//! Scene producers: turn a prompt into scene content.

use std::f32::consts::{PI, TAU};

use flythrough_core::{FlythroughError, Result};
use flythrough_structures::{PointCloud, Scene, TriangleMesh};
use glam::{UVec3, Vec3};
use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Input to a scene producer.
#[derive(Debug, Clone, Default)]
pub struct Prompt {
    /// Text description of the scene.
    pub text: String,
    /// Optional reference image, e.g. an equirectangular panorama.
    pub image: Option<RgbImage>,
}

impl Prompt {
    /// Creates a text-only prompt.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    /// Adds a reference image.
    #[must_use]
    pub fn with_image(mut self, image: RgbImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Returns true if the prompt carries neither text nor an image.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.image.is_none()
    }
}

/// Anything that can generate a scene from a prompt.
pub trait SceneProducer {
    /// Generates scene content for `prompt`.
    fn generate(&mut self, prompt: &Prompt) -> Result<Scene>;
}

/// Generates a colored shell around the origin without any learned model.
///
/// Points lie on a sphere, so a viewer at the origin sees a full 360°
/// world. Colors come from the reference image when one is given (read as
/// an equirectangular panorama), otherwise from a sky/ground palette tinted
/// by the prompt text. Output is deterministic for a given seed and prompt.
#[derive(Debug, Clone)]
pub struct ProceduralProducer {
    rng: StdRng,
    /// Number of points generated for splat scenes.
    pub points: usize,
    /// Shell radius.
    pub radius: f32,
    /// Generate a vertex-colored mesh instead of splats.
    pub mesh: bool,
}

impl ProceduralProducer {
    /// Creates a producer with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            points: 20_000,
            radius: 10.0,
            mesh: false,
        }
    }

    /// Sets the number of splat points.
    #[must_use]
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Switches between splat and mesh output.
    #[must_use]
    pub fn with_mesh(mut self, mesh: bool) -> Self {
        self.mesh = mesh;
        self
    }

    fn splats(&mut self, palette: &Palette<'_>) -> PointCloud {
        let mut positions = Vec::with_capacity(self.points);
        let mut colors = Vec::with_capacity(self.points);
        for _ in 0..self.points {
            let y: f32 = self.rng.gen_range(-1.0..=1.0);
            let azimuth: f32 = self.rng.gen_range(0.0..TAU);
            let ring = (1.0 - y * y).max(0.0).sqrt();
            let direction = Vec3::new(ring * azimuth.cos(), y, ring * azimuth.sin());
            let distance = self.radius * self.rng.gen_range(0.95..=1.05);
            let jitter = self.rng.gen_range(-0.03..=0.03);

            positions.push(direction * distance);
            colors.push((palette.color(direction) + Vec3::splat(jitter)).clamp(Vec3::ZERO, Vec3::ONE));
        }
        PointCloud::new(positions, colors)
    }

    #[allow(clippy::cast_precision_loss)]
    fn sphere_mesh(&self, palette: &Palette<'_>) -> TriangleMesh {
        const RINGS: u32 = 32;
        const SEGMENTS: u32 = 64;

        let mut vertices = Vec::new();
        let mut colors = Vec::new();
        for ring in 0..=RINGS {
            // Ring 0 sits at the top of the scene (-Y).
            let polar = PI * ring as f32 / RINGS as f32;
            for segment in 0..=SEGMENTS {
                let azimuth = TAU * segment as f32 / SEGMENTS as f32;
                let direction = Vec3::new(
                    polar.sin() * azimuth.cos(),
                    -polar.cos(),
                    polar.sin() * azimuth.sin(),
                );
                vertices.push(direction * self.radius);
                colors.push(palette.color(direction));
            }
        }

        let mut faces = Vec::with_capacity((RINGS * SEGMENTS * 2) as usize);
        for ring in 0..RINGS {
            for segment in 0..SEGMENTS {
                let a = ring * (SEGMENTS + 1) + segment;
                let b = a + SEGMENTS + 1;
                faces.push(UVec3::new(a, b, a + 1));
                faces.push(UVec3::new(a + 1, b, b + 1));
            }
        }

        TriangleMesh {
            vertices,
            faces,
            colors,
        }
    }
}

impl SceneProducer for ProceduralProducer {
    fn generate(&mut self, prompt: &Prompt) -> Result<Scene> {
        if prompt.is_empty() {
            return Err(FlythroughError::InvalidSetting {
                name: "prompt",
                reason: "a text or image prompt is required".to_string(),
            });
        }

        let palette = Palette::new(prompt);
        let scene = if self.mesh {
            Scene::Mesh(self.sphere_mesh(&palette))
        } else {
            Scene::Splats(self.splats(&palette))
        };
        log::info!(
            "Generated {} scene with {} points for \"{}\"",
            if self.mesh { "mesh" } else { "splat" },
            scene.positions().len(),
            prompt.text
        );
        Ok(scene)
    }
}

/// Maps view directions to colors.
struct Palette<'a> {
    image: Option<&'a RgbImage>,
    tint: Vec3,
}

impl<'a> Palette<'a> {
    fn new(prompt: &'a Prompt) -> Self {
        let hash = prompt
            .text
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ u64::from(b)).wrapping_mul(0x100_0000_01b3));
        let mut rng = StdRng::seed_from_u64(hash);
        Self {
            image: prompt.image.as_ref().filter(|i| i.width() > 0 && i.height() > 0),
            tint: Vec3::new(rng.gen(), rng.gen(), rng.gen()),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn color(&self, direction: Vec3) -> Vec3 {
        if let Some(image) = self.image {
            let u = (direction.z.atan2(direction.x) / TAU).rem_euclid(1.0);
            let v = ((-direction.y).clamp(-1.0, 1.0).acos() / PI).clamp(0.0, 1.0);
            let x = ((u * image.width() as f32) as u32).min(image.width() - 1);
            let y = ((v * image.height() as f32) as u32).min(image.height() - 1);
            let [r, g, b] = image.get_pixel(x, y).0;
            return Vec3::new(f32::from(r), f32::from(g), f32::from(b)) / 255.0;
        }

        // Up is -Y.
        let height = -direction.y;
        if height >= 0.0 {
            let horizon = Vec3::new(0.85, 0.9, 0.95);
            let zenith = Vec3::new(0.25, 0.45, 0.85).lerp(self.tint, 0.3);
            horizon.lerp(zenith, height)
        } else {
            let near = Vec3::new(0.35, 0.3, 0.2).lerp(self.tint, 0.2);
            let far = Vec3::new(0.2, 0.35, 0.15);
            near.lerp(far, -height)
        }
    }
}
