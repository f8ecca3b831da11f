//! Render capture: numbered images plus one video for a camera path.

use std::path::{Path, PathBuf};

use flythrough_core::{OutputOptions, RenderSettings};
use flythrough_render::{
    frame_file_name, ImageSink, RenderRequest, Renderer, VideoConfig, VideoSession, VideoSink,
};
use flythrough_structures::{CameraPath, SceneGraph};

use crate::error::CaptureError;

/// Where a capture writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Directory receiving `0000.png`, `0001.png`, ...
    pub image_dir: PathBuf,
    /// Video file.
    pub video_path: PathBuf,
}

impl OutputLayout {
    /// Creates a layout from explicit locations.
    pub fn new(image_dir: impl Into<PathBuf>, video_path: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            video_path: video_path.into(),
        }
    }

    /// Derives the layout from session output options.
    pub fn from_options(options: &OutputOptions) -> Self {
        Self::new(options.image_dir(), options.video_path())
    }

    /// File of the frame at path index `index`.
    pub fn image_path(&self, index: usize) -> PathBuf {
        self.image_dir.join(frame_file_name(index))
    }
}

/// Summary of a finished capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Number of frames rendered, written, and encoded.
    pub frames: usize,
    /// Directory holding the images.
    pub image_dir: PathBuf,
    /// Video file.
    pub video_path: PathBuf,
}

/// Renders every frame of `path`, in order, from `scene`.
///
/// Each frame is rendered with the size and field of view from `settings`
/// and the frame's own pose, written to `layout.image_path(i)` and appended
/// to `video`. Any failure aborts the capture; the video is closed exactly
/// once either way and whatever was already written stays on disk.
///
/// `scene` is rendered as given. Callers that want markers out of frame wrap
/// this in [`flythrough_structures::with_clean_scene`].
pub fn capture<R, I, V>(
    scene: &SceneGraph,
    path: &CameraPath,
    settings: &RenderSettings,
    renderer: &mut R,
    images: &mut I,
    video: &mut V,
    layout: &OutputLayout,
) -> Result<CaptureReport, CaptureError>
where
    R: Renderer + ?Sized,
    I: ImageSink + ?Sized,
    V: VideoSink + ?Sized,
{
    log::info!(
        "Starting to save novel views ({}x{}, FoV: {:.1}°)",
        settings.height,
        settings.width,
        settings.fov_degrees()
    );
    std::fs::create_dir_all(&layout.image_dir)?;
    ensure_parent(&layout.video_path)?;

    let config = VideoConfig {
        width: settings.width,
        height: settings.height,
        fps: settings.fps,
    };
    let mut session = VideoSession::open(video, config).map_err(CaptureError::Video)?;

    for (index, &frame_id) in path.frames().iter().enumerate() {
        let pose = scene.frame(frame_id)?.pose;
        let request = RenderRequest::from_settings(settings, pose);

        let image = renderer
            .render(scene, &request)
            .map_err(|source| CaptureError::RenderFailure {
                index,
                frames_written: session.frames(),
                source,
            })?;

        let image_path = layout.image_path(index);
        images
            .write(&image_path, &image)
            .map_err(|source| CaptureError::ImageWrite {
                path: image_path.clone(),
                source,
            })?;
        session.append(&image).map_err(CaptureError::Video)?;
        log::debug!("captured frame {index} -> {}", image_path.display());
    }

    let frames = session.finish().map_err(CaptureError::Video)?;
    log::info!(
        "Saved {frames} novel views to {} and {}",
        layout.image_dir.display(),
        layout.video_path.display()
    );
    Ok(CaptureReport {
        frames,
        image_dir: layout.image_dir.clone(),
        video_path: layout.video_path.clone(),
    })
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
