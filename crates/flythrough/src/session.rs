//! Viewing session: one generated scene, its camera path, and the controls
//! of the connected viewer.
//!
//! Interactive objects never own callbacks. Every clickable marker and GUI
//! widget is an entity whose [`Action`] sits in a [`Registry`];
//! [`ViewingSession::dispatch`] looks the entity up and runs the action to
//! completion before returning.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use flythrough_core::{
    EntityId, FlythroughError, Pose, Registry, SessionConfig, TransformHandle,
};
use flythrough_render::{
    CameraUpdate, FfmpegOptions, FfmpegVideoSink, FileImageSink, ImageSink, VideoSink,
    ViewerClient,
};
use flythrough_structures::{
    with_clean_scene, CameraIntrinsics, CameraPath, FrameId, Scene, SceneGraph,
};

use crate::capture::{capture, CaptureReport, OutputLayout};
use crate::controls::Controls;
use crate::error::{SessionError, SessionResult};

/// Name of the manipulation handle attached to loaded content.
pub const HANDLE_NAME: &str = "/scene_controls";

/// What an entity does when it receives an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the viewer camera onto a frame marker.
    Teleport(FrameId),
    /// Extend the camera path towards the live viewer pose.
    GeneratePath,
    /// Capture the camera path to images and video.
    SaveViews,
    /// Change the number of interpolation steps.
    SetSteps,
    /// Change the capture field of view (degrees).
    SetRenderFov,
    /// Change the capture height.
    SetRenderHeight,
    /// Change the capture width.
    SetRenderWidth,
}

/// Input reported by the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A marker or button was clicked.
    Click(EntityId),
    /// A slider or number input changed.
    Update(EntityId, f64),
}

impl Event {
    /// Entity the event targets.
    pub fn entity(&self) -> EntityId {
        match *self {
            Event::Click(id) | Event::Update(id, _) => id,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Event::Click(_) => "click",
            Event::Update(..) => "update",
        }
    }
}

/// State of one connected viewing session.
pub struct ViewingSession<I = FileImageSink, V = FfmpegVideoSink> {
    config: SessionConfig,
    graph: SceneGraph,
    path: CameraPath,
    actions: Registry<Action>,
    controls: Option<Controls>,
    images: I,
    video: V,
}

impl ViewingSession {
    /// Creates a session writing PNG files and an ffmpeg-encoded video to
    /// the locations in `config.output`.
    pub fn new(config: SessionConfig) -> Self {
        let video = FfmpegVideoSink::new(FfmpegOptions::new(config.output.video_path()));
        Self::with_sinks(config, FileImageSink, video)
    }
}

impl<I: ImageSink, V: VideoSink> ViewingSession<I, V> {
    /// Creates a session with custom image and video sinks.
    ///
    /// Out-of-range values in `config` are clamped first.
    pub fn with_sinks(mut config: SessionConfig, images: I, video: V) -> Self {
        if config.clamp_to_ranges() {
            log::warn!("Session config had out-of-range values; clamped");
        }
        Self {
            config,
            graph: SceneGraph::new(),
            path: CameraPath::new(),
            actions: Registry::new(),
            controls: None,
            images,
            video,
        }
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the scene graph.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Returns the scene graph mutably, e.g. to move the manipulation handle.
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Returns the accumulated camera path.
    pub fn path(&self) -> &CameraPath {
        &self.path
    }

    /// Returns the action registry.
    pub fn actions(&self) -> &Registry<Action> {
        &self.actions
    }

    /// Returns the controls of the connected viewer, if any.
    pub fn controls(&self) -> Option<&Controls> {
        self.controls.as_ref()
    }

    /// Returns the image sink.
    pub fn image_sink(&self) -> &I {
        &self.images
    }

    /// Returns the video sink.
    pub fn video_sink(&self) -> &V {
        &self.video
    }

    /// Replaces the scene content and resets the camera path.
    ///
    /// Adds the hidden original-camera marker, attaches a manipulation
    /// handle, and derives the background color from the content. With
    /// `output.save_scene` set, the content is also written as PLY.
    pub fn load_scene(&mut self, scene: Scene) -> SessionResult<()> {
        if self.config.output.save_scene {
            self.save_scene(&scene)?;
        }

        self.graph.reset();
        self.path.clear();
        self.actions.retain(|_, action| !matches!(action, Action::Teleport(_)));

        if let Some(background) = scene.background_color() {
            self.graph.set_background(background);
        }
        let count = scene.positions().len();
        self.graph.set_content(scene);
        self.graph.attach_handle(TransformHandle::new(HANDLE_NAME));

        let intrinsics = CameraIntrinsics::new(self.config.original_fov, self.config.original_aspect);
        let original = self.graph.add_original_camera(intrinsics);
        self.register_teleport(original)?;

        log::info!("Loaded scene with {count} points");
        Ok(())
    }

    fn save_scene(&self, scene: &Scene) -> SessionResult<PathBuf> {
        let dir = &self.config.output.output_dir;
        std::fs::create_dir_all(dir).map_err(FlythroughError::from)?;
        let file_name = match scene {
            Scene::Splats(_) => "splat.ply",
            Scene::Mesh(_) => "mesh.ply",
        };
        let path = dir.join(file_name);

        let mut out = BufWriter::new(File::create(&path).map_err(FlythroughError::from)?);
        let bytes = scene.write_ply(&mut out)?;
        out.flush().map_err(FlythroughError::from)?;
        log::info!("Saved scene to {} ({bytes} bytes)", path.display());
        Ok(path)
    }

    /// Sets up a newly connected viewer.
    ///
    /// The viewer camera is placed at the origin with identity orientation,
    /// the original field of view, and the configured clip planes in a single
    /// update. The control panel is (re)built and its widgets registered.
    pub fn connect<C: ViewerClient + ?Sized>(&mut self, client: &mut C) -> SessionResult<&Controls> {
        client.apply_camera(
            CameraUpdate::teleport(Pose::IDENTITY, self.config.original_fov)
                .with_clip(self.config.near, self.config.far),
        );

        if let Some(old) = self.controls.take() {
            for control in old.iter() {
                self.actions.remove(control.id());
            }
        }

        self.config
            .render
            .set_fov_degrees(self.config.original_fov.to_degrees());
        let graph = &mut self.graph;
        let controls = Controls::build(&self.config, || graph.allocate_id());
        for (id, action) in [
            (controls.steps, Action::SetSteps),
            (controls.generate_path, Action::GeneratePath),
            (controls.render_fov, Action::SetRenderFov),
            (controls.render_height, Action::SetRenderHeight),
            (controls.render_width, Action::SetRenderWidth),
            (controls.save_views, Action::SaveViews),
        ] {
            self.actions.register(id, action)?;
        }

        log::info!("Viewer connected");
        Ok(self.controls.insert(controls))
    }

    /// Runs the action registered for the event's entity.
    pub fn dispatch<C: ViewerClient + ?Sized>(&mut self, event: Event, client: &mut C) -> SessionResult<()> {
        let entity = event.entity();
        let action = *self.actions.lookup(entity)?;
        log::debug!("{} on {entity} -> {action:?}", event.kind());

        match (event, action) {
            (Event::Click(_), Action::Teleport(frame)) => self.teleport(frame, client),
            (Event::Click(_), Action::GeneratePath) => self.generate_path(client).map(|_| ()),
            (Event::Click(_), Action::SaveViews) => self.save_views(client).map(|_| ()),
            (
                Event::Update(_, value),
                Action::SetSteps
                | Action::SetRenderFov
                | Action::SetRenderHeight
                | Action::SetRenderWidth,
            ) => {
                self.apply_setting(entity, action, value, client);
                Ok(())
            }
            (event, _) => Err(SessionError::UnexpectedEvent {
                entity,
                event: event.kind(),
            }),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn apply_setting<C: ViewerClient + ?Sized>(
        &mut self,
        entity: EntityId,
        action: Action,
        value: f64,
        client: &mut C,
    ) {
        let value = match self.controls.as_mut().and_then(|c| c.get_mut(entity)) {
            Some(control) => control.set_value(value),
            None => value,
        };
        if value.is_nan() {
            return;
        }

        let settings = &mut self.config;
        match action {
            Action::SetSteps => settings.path.set_steps(value.round().max(0.0) as u32),
            Action::SetRenderFov => {
                settings.render.set_fov_degrees(value as f32);
                client.apply_camera(CameraUpdate::fov(settings.render.fov));
            }
            Action::SetRenderHeight => settings.render.set_height(value.round().max(0.0) as u32),
            Action::SetRenderWidth => settings.render.set_width(value.round().max(0.0) as u32),
            Action::Teleport(_) | Action::GeneratePath | Action::SaveViews => {}
        }
    }

    /// Moves the viewer camera onto `frame`: orientation, position, and
    /// field of view change in one update.
    pub fn teleport<C: ViewerClient + ?Sized>(&self, frame: FrameId, client: &mut C) -> SessionResult<()> {
        let marker = self.graph.frame(frame)?;
        client.apply_camera(CameraUpdate::teleport(marker.pose, marker.intrinsics.fov));
        log::debug!("Teleported to '{}'", marker.name());
        Ok(())
    }

    /// Extends the camera path towards the viewer's current pose.
    ///
    /// The first call only sets the anchor. Every later call appends
    /// `config.path.steps` frames from the anchor to wherever the viewer is
    /// now, so the path keeps growing. Each new frame becomes clickable.
    pub fn generate_path<C: ViewerClient + ?Sized>(&mut self, client: &mut C) -> SessionResult<Vec<FrameId>> {
        let live = client.camera().pose;
        let live = Pose::validated(live.orientation, live.position)?;

        let intrinsics = self.original_intrinsics();
        let added = self
            .path
            .extend(&mut self.graph, live, intrinsics, &self.config.path)?;
        for &frame in &added {
            self.register_teleport(frame)?;
        }
        Ok(added)
    }

    /// Renders every path frame with markers and handle hidden, writing
    /// numbered images and a video.
    ///
    /// Markers and handle are restored whether or not the capture succeeds.
    pub fn save_views<C: ViewerClient + ?Sized>(&mut self, client: &mut C) -> SessionResult<CaptureReport> {
        let layout = OutputLayout::from_options(&self.config.output);
        let Self {
            config,
            graph,
            path,
            images,
            video,
            ..
        } = self;

        with_clean_scene(graph, |scene| {
            capture(scene, path, &config.render, client, images, video, &layout)
        })
        .map_err(|e| {
            log::error!("Saving novel views failed: {e}");
            SessionError::from(e)
        })
    }

    /// Clears the camera path. The next [`generate_path`](Self::generate_path)
    /// sets a new anchor.
    ///
    /// Markers of the old path are hidden and stop reacting to clicks.
    pub fn reset_path(&mut self) {
        for &frame in self.path.frames() {
            if let Ok(marker) = self.graph.frame_mut(frame) {
                marker.visible = false;
                self.actions.remove(marker.id());
            }
        }
        log::info!("Cleared camera path of {} cameras", self.path.len());
        self.path.clear();
    }

    fn original_intrinsics(&self) -> CameraIntrinsics {
        self.graph
            .original_camera()
            .and_then(|id| self.graph.frame(id).ok())
            .map_or_else(
                || CameraIntrinsics::new(self.config.original_fov, self.config.original_aspect),
                |frame| frame.intrinsics,
            )
    }

    fn register_teleport(&mut self, frame: FrameId) -> SessionResult<()> {
        let entity = self.graph.frame(frame)?.id();
        self.actions.register(entity, Action::Teleport(frame))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flythrough_render::{
        InMemoryVideoSink, LoopbackClient, RenderResult, RgbaImage, SplatRenderer, ViewerCamera,
    };
    use flythrough_structures::PointCloud;
    use glam::{Quat, Vec3};
    use std::path::Path;

    #[derive(Default)]
    struct DiscardImages(usize);

    impl ImageSink for DiscardImages {
        fn write(&mut self, _path: &Path, _image: &RgbaImage) -> RenderResult<()> {
            self.0 += 1;
            Ok(())
        }
    }

    fn session() -> ViewingSession<DiscardImages, InMemoryVideoSink> {
        let mut config = SessionConfig::default();
        config.output.output_dir = std::env::temp_dir().join("flythrough_session_unit");
        ViewingSession::with_sinks(config, DiscardImages::default(), InMemoryVideoSink::default())
    }

    fn cloud() -> Scene {
        Scene::Splats(PointCloud::new(
            vec![Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 0.0, 5.0)],
            vec![Vec3::new(0.2, 0.4, 0.6); 2],
        ))
    }

    #[test]
    fn test_load_scene_sets_up_graph() {
        let mut session = session();
        session.load_scene(cloud()).unwrap();
        let graph = session.graph();
        assert!((graph.background() - Vec3::new(0.2, 0.4, 0.6)).length() < 1e-6);
        assert_eq!(graph.handle().unwrap().name, HANDLE_NAME);
        let original = graph.original_camera().unwrap();
        assert!(!graph.frame(original).unwrap().visible);
        let entity = graph.frame(original).unwrap().id();
        assert_eq!(session.actions().get(entity), Some(&Action::Teleport(original)));
    }

    #[test]
    fn test_connect_initializes_camera_and_controls() {
        let mut session = session();
        let mut client = LoopbackClient::new(SplatRenderer::default());
        client.navigate(ViewerCamera {
            pose: Pose::new(Quat::from_rotation_x(1.0), Vec3::ONE),
            ..ViewerCamera::default()
        });
        let controls = session.connect(&mut client).unwrap().clone();

        let camera = client.camera();
        assert_eq!(camera.pose, Pose::IDENTITY);
        assert_eq!((camera.near, camera.far), (0.01, 10000.0));
        assert_eq!(client.updates(), 1);
        assert_eq!(session.actions().get(controls.save_views), Some(&Action::SaveViews));

        // Reconnecting swaps the widgets without leaking old registrations.
        session.connect(&mut client).unwrap();
        assert_eq!(session.actions().len(), 6);
        assert!(session.actions().get(controls.save_views).is_none());
    }

    #[test]
    fn test_update_events_clamp_and_apply() {
        let mut session = session();
        let mut client = LoopbackClient::new(SplatRenderer::default());
        let controls = session.connect(&mut client).unwrap().clone();

        session
            .dispatch(Event::Update(controls.steps, 5000.0), &mut client)
            .unwrap();
        assert_eq!(session.config().path.steps, 1000);

        session
            .dispatch(Event::Update(controls.render_height, 10.0), &mut client)
            .unwrap();
        assert_eq!(session.config().render.height, 64);

        session
            .dispatch(Event::Update(controls.render_fov, 60.0), &mut client)
            .unwrap();
        assert!((session.config().render.fov_degrees() - 60.0).abs() < 1e-4);
        assert!((client.camera().fov - 60f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_events_are_rejected() {
        let mut session = session();
        let mut client = LoopbackClient::new(SplatRenderer::default());
        let controls = session.connect(&mut client).unwrap().clone();

        assert!(matches!(
            session.dispatch(Event::Click(controls.steps), &mut client),
            Err(SessionError::UnexpectedEvent { event: "click", .. })
        ));
        assert!(matches!(
            session.dispatch(Event::Update(controls.save_views, 1.0), &mut client),
            Err(SessionError::UnexpectedEvent { event: "update", .. })
        ));
        assert!(matches!(
            session.dispatch(Event::Click(EntityId(9999)), &mut client),
            Err(SessionError::Core(FlythroughError::EntityNotFound(_)))
        ));
    }

    #[test]
    fn test_reset_path_starts_over() {
        let mut session = session();
        let mut client = LoopbackClient::new(SplatRenderer::default());
        session.load_scene(cloud()).unwrap();
        session.connect(&mut client).unwrap();
        session.generate_path(&mut client).unwrap();
        session.generate_path(&mut client).unwrap();
        assert_eq!(session.path().len(), 121);
        let registered = session.actions().len();

        let old_anchor = session.path().anchor().unwrap();
        session.reset_path();
        assert!(session.path().is_empty());
        assert_eq!(session.actions().len(), registered - 121);
        assert!(!session.graph().frame(old_anchor).unwrap().visible);

        let added = session.generate_path(&mut client).unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(session.path().anchor(), Some(added[0]));
    }

    #[test]
    fn test_out_of_range_config_is_clamped_on_construction() {
        let mut config = SessionConfig::default();
        config.path.steps = 0;
        config.render.height = 0;
        config.render.fps = 0;
        config.output.output_dir = std::env::temp_dir().join("flythrough_session_clamp");
        let mut session =
            ViewingSession::with_sinks(config, DiscardImages::default(), InMemoryVideoSink::default());
        assert_eq!(session.config().path.steps, 1);
        assert_eq!(session.config().render.height, 64);
        assert_eq!(session.config().render.fps, 1);

        let mut client = LoopbackClient::new(SplatRenderer::default());
        session.load_scene(cloud()).unwrap();
        session.connect(&mut client).unwrap();
        session.generate_path(&mut client).unwrap();

        let live = Pose::new(Quat::from_rotation_y(0.5), Vec3::new(2.0, 0.0, 1.0));
        client.navigate(ViewerCamera {
            pose: live,
            ..client.camera()
        });
        let added = session.generate_path(&mut client).unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(session.path().len(), 2);
        let last = session.graph().frame(added[0]).unwrap();
        assert!(last.pose.abs_diff_eq(&live, 1e-5));
    }

    #[test]
    fn test_save_scene_writes_ply() {
        let mut session = session();
        session.config.output.save_scene = true;
        session.load_scene(cloud()).unwrap();
        let written = session.config.output.output_dir.join("splat.ply");
        assert!(std::fs::metadata(written).unwrap().len() > 0);
    }
}
