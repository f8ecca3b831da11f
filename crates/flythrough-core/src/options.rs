//! Configuration options for flythrough sessions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Smallest and largest accepted number of interpolation steps.
pub const STEPS_RANGE: (u32, u32) = (1, 1000);
/// Smallest and largest accepted render height/width, in pixels.
pub const RENDER_SIZE_RANGE: (u32, u32) = (64, 4096);
/// Smallest and largest accepted render field of view, in degrees.
pub const RENDER_FOV_DEGREES_RANGE: (f32, f32) = (1.0, 179.0);
/// Smallest and largest accepted video frame rate.
pub const FPS_RANGE: (u32, u32) = (1, 240);

/// Camera path generation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    /// Number of interpolated frames appended per path generation.
    pub steps: u32,
    /// Display scale of path frustum markers.
    pub frustum_scale: f32,
    /// Marker color of the anchor frame.
    pub anchor_color: [u8; 3],
    /// Marker color of the first interpolated frame.
    pub start_color: [u8; 3],
    /// Marker color of the last interpolated frame.
    pub end_color: [u8; 3],
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            steps: 120,
            frustum_scale: 0.2,
            anchor_color: [0, 0, 0],
            start_color: [0, 150, 255],
            end_color: [0, 255, 0],
        }
    }
}

impl PathOptions {
    /// Sets the step count, clamped to [`STEPS_RANGE`].
    pub fn set_steps(&mut self, steps: u32) {
        self.steps = steps.clamp(STEPS_RANGE.0, STEPS_RANGE.1);
    }
}

/// Session-level render settings used by the capture pipeline.
///
/// These are decoupled from the live viewer: a capture always uses these
/// values, never the field of view or aspect stored on individual frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output height in pixels.
    pub height: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Video frame rate.
    pub fps: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            height: 1080,
            width: 1920,
            fov: 90f32.to_radians(),
            fps: 30,
        }
    }
}

impl RenderSettings {
    /// Sets the output height, clamped to [`RENDER_SIZE_RANGE`].
    pub fn set_height(&mut self, height: u32) {
        self.height = height.clamp(RENDER_SIZE_RANGE.0, RENDER_SIZE_RANGE.1);
    }

    /// Sets the output width, clamped to [`RENDER_SIZE_RANGE`].
    pub fn set_width(&mut self, width: u32) {
        self.width = width.clamp(RENDER_SIZE_RANGE.0, RENDER_SIZE_RANGE.1);
    }

    /// Sets the field of view from degrees, clamped to [`RENDER_FOV_DEGREES_RANGE`].
    /// NaN keeps the current value.
    pub fn set_fov_degrees(&mut self, degrees: f32) {
        if degrees.is_nan() {
            return;
        }
        self.fov = degrees
            .clamp(RENDER_FOV_DEGREES_RANGE.0, RENDER_FOV_DEGREES_RANGE.1)
            .to_radians();
    }

    /// Sets the video frame rate, clamped to [`FPS_RANGE`].
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.clamp(FPS_RANGE.0, FPS_RANGE.1);
    }

    /// Returns the field of view in degrees.
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    /// Returns width / height.
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Where captures are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Root output directory.
    pub output_dir: PathBuf,
    /// Subdirectory of `output_dir` receiving numbered frame images.
    pub image_dir_name: String,
    /// File name of the video inside `output_dir`.
    pub video_file_name: String,
    /// Whether a loaded scene is also written to `output_dir/splat.ply`.
    pub save_scene: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            image_dir_name: "images".to_string(),
            video_file_name: "rgb.mp4".to_string(),
            save_scene: false,
        }
    }
}

impl OutputOptions {
    /// Directory receiving numbered frame images.
    pub fn image_dir(&self) -> PathBuf {
        self.output_dir.join(&self.image_dir_name)
    }

    /// Path of the captured video.
    pub fn video_path(&self) -> PathBuf {
        self.output_dir.join(&self.video_file_name)
    }
}

/// Complete configuration of one viewing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Path generation options.
    pub path: PathOptions,
    /// Capture render settings.
    pub render: RenderSettings,
    /// Capture output locations.
    pub output: OutputOptions,
    /// Field of view (radians) of the scene's original camera; new path
    /// frames inherit it.
    pub original_fov: f32,
    /// Aspect ratio of the scene's original camera.
    pub original_aspect: f32,
    /// Near clipping plane applied to connecting viewers.
    pub near: f32,
    /// Far clipping plane applied to connecting viewers.
    pub far: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathOptions::default(),
            render: RenderSettings::default(),
            output: OutputOptions::default(),
            original_fov: 90f32.to_radians(),
            original_aspect: 1920.0 / 1080.0,
            near: 0.01,
            far: 10000.0,
        }
    }
}

impl SessionConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields take defaults and out-of-range values are clamped the
    /// same way the setters clamp them.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&text)?;
        if config.clamp_to_ranges() {
            log::warn!(
                "Clamped out-of-range settings loaded from {}",
                path.display()
            );
        }
        Ok(config)
    }

    /// Pulls every bounded value back into its accepted range.
    ///
    /// Returns true if anything changed.
    pub fn clamp_to_ranges(&mut self) -> bool {
        let before = self.clone();
        let defaults = Self::default();

        self.path.set_steps(self.path.steps);
        self.render.set_height(self.render.height);
        self.render.set_width(self.render.width);
        self.render.set_fps(self.render.fps);

        let (min, max) = RENDER_FOV_DEGREES_RANGE;
        let clamp_fov = |fov: f32, default: f32| {
            if fov.is_finite() {
                fov.clamp(min.to_radians(), max.to_radians())
            } else {
                default
            }
        };
        self.render.fov = clamp_fov(self.render.fov, defaults.render.fov);
        self.original_fov = clamp_fov(self.original_fov, defaults.original_fov);
        if !(self.original_aspect.is_finite() && self.original_aspect > 0.0) {
            self.original_aspect = defaults.original_aspect;
        }
        if !(self.near.is_finite() && self.near > 0.0) {
            self.near = defaults.near;
        }
        if !(self.far.is_finite() && self.far > self.near) {
            self.far = defaults.far.max(self.near * 2.0);
        }

        *self != before
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
