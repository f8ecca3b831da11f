//! Capture pipeline integration tests.
//!
//! Renderer, image sink, and video sink are recording stubs so each test can
//! check exactly which calls the pipeline made and in what order.

use std::path::{Path, PathBuf};

use flythrough::*;
use image::Rgba;

/// Renders flat frames and remembers every request; optionally fails on one call.
#[derive(Default)]
struct RecordingRenderer {
    requests: Vec<RenderRequest>,
    fail_at: Option<usize>,
    /// (any marker visible, handle scale) observed at each render.
    observed: Vec<(bool, Option<f32>)>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &SceneGraph, request: &RenderRequest) -> RenderResult<RgbaImage> {
        let call = self.requests.len();
        self.requests.push(*request);
        self.observed.push((
            scene.frames().any(|(_, f)| f.visible),
            scene.handle().map(|h| h.scale),
        ));
        if self.fail_at == Some(call) {
            return Err(RenderError::Timeout);
        }
        Ok(RgbaImage::from_pixel(
            request.width,
            request.height,
            Rgba([call as u8, 0, 0, 255]),
        ))
    }
}

#[derive(Default)]
struct RecordingImages {
    paths: Vec<PathBuf>,
}

impl ImageSink for RecordingImages {
    fn write(&mut self, path: &Path, _image: &RgbaImage) -> RenderResult<()> {
        self.paths.push(path.to_path_buf());
        Ok(())
    }
}

/// Logs the sink lifecycle as a sequence of call names.
#[derive(Default)]
struct RecordingVideo {
    calls: Vec<&'static str>,
    first_pixels: Vec<u8>,
}

impl VideoSink for RecordingVideo {
    fn open(&mut self, _config: VideoConfig) -> RenderResult<()> {
        self.calls.push("open");
        Ok(())
    }

    fn append(&mut self, frame: &RgbaImage) -> RenderResult<()> {
        self.calls.push("append");
        self.first_pixels.push(frame.get_pixel(0, 0).0[0]);
        Ok(())
    }

    fn close(&mut self) -> RenderResult<()> {
        self.calls.push("close");
        Ok(())
    }
}

impl RecordingVideo {
    fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| **c == name).count()
    }
}

fn settings() -> RenderSettings {
    let mut settings = RenderSettings::default();
    settings.set_width(96);
    settings.set_height(64);
    settings.set_fov_degrees(45.0);
    settings
}

/// Scene graph with a hidden original camera, a shown handle, and a path of
/// `1 + steps` frames from the origin to `(4, 0, 0)`.
fn path_scene(steps: u32) -> (SceneGraph, CameraPath) {
    let mut graph = SceneGraph::new();
    graph.add_original_camera(CameraIntrinsics::default());
    graph.attach_handle(TransformHandle::new(HANDLE_NAME));

    let options = PathOptions {
        steps,
        ..PathOptions::default()
    };
    let mut path = CameraPath::new();
    path.extend(&mut graph, Pose::IDENTITY, CameraIntrinsics::default(), &options)
        .unwrap();
    let live = Pose::new(Quat::from_rotation_y(0.8), Vec3::new(4.0, 0.0, 0.0));
    path.extend(&mut graph, live, CameraIntrinsics::default(), &options)
        .unwrap();
    (graph, path)
}

fn layout(name: &str) -> OutputLayout {
    let dir = std::env::temp_dir().join(name);
    OutputLayout::new(dir.join("images"), dir.join("rgb.mp4"))
}

#[test]
fn test_capture_renders_every_frame_in_order() {
    let (graph, path) = path_scene(4);
    let k = path.len();
    assert_eq!(k, 5);

    let mut renderer = RecordingRenderer::default();
    let mut images = RecordingImages::default();
    let mut video = RecordingVideo::default();
    let layout = layout("flythrough_capture_order");

    let report = capture(
        &graph,
        &path,
        &settings(),
        &mut renderer,
        &mut images,
        &mut video,
        &layout,
    )
    .unwrap();
    assert_eq!(report.frames, k);

    // K renders, in path order, all with the session's size and FoV.
    assert_eq!(renderer.requests.len(), k);
    for (request, frame) in renderer.requests.iter().zip(path.frames()) {
        assert_eq!(request.pose, graph.frame(*frame).unwrap().pose);
        assert_eq!((request.width, request.height), (96, 64));
        assert!((request.fov - 45f32.to_radians()).abs() < 1e-6);
    }

    // K images named by zero-padded index.
    let names: Vec<_> = images
        .paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["0000.png", "0001.png", "0002.png", "0003.png", "0004.png"]);
    assert!(images.paths.iter().all(|p| p.parent() == Some(layout.image_dir.as_path())));

    // open, K appends in render order, exactly one close at the end.
    assert_eq!(video.calls.first(), Some(&"open"));
    assert_eq!(video.count("append"), k);
    assert_eq!(video.count("close"), 1);
    assert_eq!(video.calls.last(), Some(&"close"));
    assert_eq!(video.first_pixels, [0, 1, 2, 3, 4]);
}

#[test]
fn test_render_failure_still_closes_video_once() {
    let (graph, path) = path_scene(4);
    let mut renderer = RecordingRenderer {
        fail_at: Some(2),
        ..RecordingRenderer::default()
    };
    let mut images = RecordingImages::default();
    let mut video = RecordingVideo::default();

    let err = capture(
        &graph,
        &path,
        &settings(),
        &mut renderer,
        &mut images,
        &mut video,
        &layout("flythrough_capture_failure"),
    )
    .unwrap_err();

    match err {
        CaptureError::RenderFailure {
            index,
            frames_written,
            source,
        } => {
            assert_eq!((index, frames_written), (2, 2));
            assert!(matches!(source, RenderError::Timeout));
        }
        other => panic!("unexpected error: {other}"),
    }

    // No render after the failure; the two finished frames are kept.
    assert_eq!(renderer.requests.len(), 3);
    assert_eq!(images.paths.len(), 2);
    assert_eq!(video.calls, ["open", "append", "append", "close"]);
}

#[test]
fn test_clean_scene_hides_markers_during_capture_only() {
    let (mut graph, path) = path_scene(3);
    let before: Vec<bool> = graph.frames().map(|(_, f)| f.visible).collect();

    let mut renderer = RecordingRenderer {
        fail_at: Some(1),
        ..RecordingRenderer::default()
    };
    let result = with_clean_scene(&mut graph, |scene| {
        capture(
            scene,
            &path,
            &settings(),
            &mut renderer,
            &mut RecordingImages::default(),
            &mut RecordingVideo::default(),
            &layout("flythrough_capture_clean"),
        )
    });
    assert!(result.is_err());

    assert!(renderer
        .observed
        .iter()
        .all(|&(any_visible, scale)| !any_visible && scale == Some(0.0)));

    let after: Vec<bool> = graph.frames().map(|(_, f)| f.visible).collect();
    assert_eq!(after, before);
    assert_eq!(graph.handle().unwrap().scale, DEFAULT_HANDLE_SCALE);
}

#[test]
fn test_capture_writes_real_png_files() {
    let (mut graph, path) = path_scene(2);
    graph.set_content(Scene::Splats(PointCloud::new(
        vec![Vec3::new(0.0, 0.0, 6.0), Vec3::new(1.0, 0.5, 7.0)],
        vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)],
    )));

    let layout = layout("flythrough_capture_png");
    let _ = std::fs::remove_dir_all(&layout.image_dir);
    let mut video = InMemoryVideoSink::default();

    let report = with_clean_scene(&mut graph, |scene| {
        capture(
            scene,
            &path,
            &settings(),
            &mut SplatRenderer::default(),
            &mut FileImageSink,
            &mut video,
            &layout,
        )
    })
    .unwrap();

    assert_eq!(report.frames, 3);
    for i in 0..3 {
        let image = image::open(layout.image_path(i)).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (96, 64));
        assert_eq!(&image, &video.frames[i]);
    }
    assert_eq!(video.close_calls, 1);
    assert_eq!(
        video.config,
        Some(VideoConfig {
            width: 96,
            height: 64,
            fps: 30
        })
    );
}
