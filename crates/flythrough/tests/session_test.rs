//! Viewing session integration tests: event dispatch, teleports, path
//! growth, and captures driven through the control panel.

use std::path::Path;

use flythrough::*;

/// Renderer that records requests and can be told to fail.
#[derive(Default)]
struct StubRenderer {
    requests: Vec<RenderRequest>,
    fail: bool,
}

impl Renderer for StubRenderer {
    fn render(&mut self, _scene: &SceneGraph, request: &RenderRequest) -> RenderResult<RgbaImage> {
        self.requests.push(*request);
        if self.fail {
            return Err(RenderError::Failed("viewer disconnected".to_string()));
        }
        Ok(RgbaImage::new(request.width, request.height))
    }
}

#[derive(Default)]
struct CountingImages(Vec<String>);

impl ImageSink for CountingImages {
    fn write(&mut self, path: &Path, _image: &RgbaImage) -> RenderResult<()> {
        self.0
            .push(path.file_name().unwrap().to_string_lossy().into_owned());
        Ok(())
    }
}

type TestSession = ViewingSession<CountingImages, InMemoryVideoSink>;

fn connected(name: &str) -> (TestSession, LoopbackClient<StubRenderer>, Controls) {
    let mut config = SessionConfig::default();
    config.output.output_dir = std::env::temp_dir().join(name);
    let mut session =
        ViewingSession::with_sinks(config, CountingImages::default(), InMemoryVideoSink::default());
    session
        .load_scene(Scene::Splats(PointCloud::new(
            vec![Vec3::new(0.0, 0.0, 5.0)],
            vec![Vec3::new(0.5, 0.5, 0.5)],
        )))
        .unwrap();
    let mut client = LoopbackClient::new(StubRenderer::default());
    let controls = session.connect(&mut client).unwrap().clone();
    (session, client, controls)
}

fn move_viewer(client: &mut LoopbackClient<StubRenderer>, pose: Pose) {
    let camera = ViewerCamera {
        pose,
        ..client.camera()
    };
    client.navigate(camera);
}

#[test]
fn test_end_to_end_scenario() {
    let (mut session, mut client, controls) = connected("flythrough_session_e2e");
    session
        .dispatch(Event::Update(controls.steps, 2.0), &mut client)
        .unwrap();

    // Viewer starts at the origin with identity orientation: that becomes the anchor.
    session
        .dispatch(Event::Click(controls.generate_path), &mut client)
        .unwrap();
    assert_eq!(session.path().len(), 1);

    let live = Pose::from_wxyz([0.0, 1.0, 0.0, 0.0], [10.0, 0.0, 0.0]);
    move_viewer(&mut client, live);
    session
        .dispatch(Event::Click(controls.generate_path), &mut client)
        .unwrap();

    let graph = session.graph();
    let poses: Vec<Pose> = session
        .path()
        .frames()
        .iter()
        .map(|id| graph.frame(*id).unwrap().pose)
        .collect();
    assert_eq!(poses.len(), 3);

    assert!(poses[0].abs_diff_eq(&Pose::IDENTITY, 1e-6));

    // ease(0.5) == 0.5: halfway in position, half of the 180° turn about x.
    assert!((poses[1].position - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    let half = slerp(Quat::IDENTITY, Quat::from_xyzw(1.0, 0.0, 0.0, 0.0), 0.5);
    assert!(poses[1].orientation.dot(half).abs() > 1.0 - 1e-5);
    let [w, x, y, z] = poses[1].wxyz();
    let s = std::f32::consts::FRAC_1_SQRT_2;
    assert!((w.abs() - s).abs() < 1e-5 && (x.abs() - s).abs() < 1e-5);
    assert!(y.abs() < 1e-6 && z.abs() < 1e-6);

    assert!(poses[2].abs_diff_eq(&live, 1e-5));
}

#[test]
fn test_path_grows_by_steps_on_every_generation() {
    let (mut session, mut client, controls) = connected("flythrough_session_growth");
    session
        .dispatch(Event::Update(controls.steps, 5.0), &mut client)
        .unwrap();

    session.generate_path(&mut client).unwrap();
    let anchor = session.path().anchor().unwrap();
    let anchor_pose = session.graph().frame(anchor).unwrap().pose;

    let mut expected = 1;
    for x in [1.0, 2.0, 3.0] {
        move_viewer(&mut client, Pose::new(Quat::IDENTITY, Vec3::new(x, 0.0, 0.0)));
        let added = session.generate_path(&mut client).unwrap();
        expected += 5;
        assert_eq!(added.len(), 5);
        assert_eq!(session.path().len(), expected);

        // The anchor never moves; each new segment ends at the live pose.
        assert_eq!(session.path().anchor(), Some(anchor));
        assert_eq!(session.graph().frame(anchor).unwrap().pose, anchor_pose);
        let last = session.graph().frame(*added.last().unwrap()).unwrap();
        assert!((last.pose.position.x - x).abs() < 1e-5);
    }

    // Interpolant names keep counting across generations.
    let names: Vec<&str> = session
        .path()
        .frames()
        .iter()
        .map(|id| session.graph().frame(*id).unwrap().name())
        .collect();
    assert_eq!(names[0], "/start_camera");
    assert_eq!(names[1], "/0");
    assert_eq!(names[15], "/14");
}

#[test]
fn test_clicking_a_marker_teleports_atomically() {
    let (mut session, mut client, controls) = connected("flythrough_session_teleport");
    session
        .dispatch(Event::Update(controls.steps, 3.0), &mut client)
        .unwrap();
    session.generate_path(&mut client).unwrap();
    move_viewer(
        &mut client,
        Pose::new(Quat::from_rotation_y(1.2), Vec3::new(0.0, -2.0, 6.0)),
    );
    let added = session.generate_path(&mut client).unwrap();

    // Viewer wanders off with a different field of view.
    client.navigate(ViewerCamera {
        pose: Pose::new(Quat::from_rotation_z(2.0), Vec3::splat(50.0)),
        fov: 0.3,
        ..client.camera()
    });

    let target = session.graph().frame(added[1]).unwrap().clone();
    let updates = client.updates();
    session
        .dispatch(Event::Click(target.id()), &mut client)
        .unwrap();

    assert_eq!(client.updates(), updates + 1);
    let camera = client.camera();
    assert!(camera.pose.abs_diff_eq(&target.pose, 1e-6));
    assert_eq!(camera.fov, target.intrinsics.fov);
}

#[test]
fn test_clicking_original_camera_returns_to_start() {
    let (mut session, mut client, _) = connected("flythrough_session_original");
    move_viewer(&mut client, Pose::new(Quat::from_rotation_x(0.4), Vec3::ONE));

    let original = session.graph().original_camera().unwrap();
    let entity = session.graph().frame(original).unwrap().id();
    session.dispatch(Event::Click(entity), &mut client).unwrap();

    assert_eq!(client.camera().pose, Pose::IDENTITY);
    assert!((client.camera().fov - session.config().original_fov).abs() < 1e-6);
}

#[test]
fn test_save_views_uses_render_settings() {
    let (mut session, mut client, controls) = connected("flythrough_session_save");
    for (id, value) in [
        (controls.steps, 3.0),
        (controls.render_fov, 30.0),
        (controls.render_width, 128.0),
        (controls.render_height, 72.0),
    ] {
        session.dispatch(Event::Update(id, value), &mut client).unwrap();
    }
    session.generate_path(&mut client).unwrap();
    move_viewer(&mut client, Pose::new(Quat::IDENTITY, Vec3::new(0.0, 0.0, 2.0)));
    session.generate_path(&mut client).unwrap();

    session
        .dispatch(Event::Click(controls.save_views), &mut client)
        .unwrap();

    let requests = &client.renderer().requests;
    assert_eq!(requests.len(), 4);
    for request in requests {
        assert_eq!((request.width, request.height), (128, 72));
        assert!((request.fov - 30f32.to_radians()).abs() < 1e-5);
    }
    assert_eq!(
        session.image_sink().0,
        ["0000.png", "0001.png", "0002.png", "0003.png"]
    );
    assert_eq!(session.video_sink().frames.len(), 4);
    assert_eq!(session.video_sink().close_calls, 1);

    // Markers are back after the capture.
    let anchor = session.path().anchor().unwrap();
    assert!(session.graph().frame(anchor).unwrap().visible);
    assert_eq!(session.graph().handle().unwrap().scale, DEFAULT_HANDLE_SCALE);
}

#[test]
fn test_failed_save_restores_scene_and_reports() {
    let (mut session, mut client, controls) = connected("flythrough_session_fail");
    session
        .dispatch(Event::Update(controls.steps, 2.0), &mut client)
        .unwrap();
    session.generate_path(&mut client).unwrap();
    session.generate_path(&mut client).unwrap();

    let visibility: Vec<bool> = session.graph().frames().map(|(_, f)| f.visible).collect();
    client.renderer_mut().fail = true;

    let err = session
        .dispatch(Event::Click(controls.save_views), &mut client)
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Capture(CaptureError::RenderFailure {
            index: 0,
            frames_written: 0,
            ..
        })
    ));

    assert_eq!(client.renderer().requests.len(), 1);
    assert_eq!(session.video_sink().close_calls, 1);
    let after: Vec<bool> = session.graph().frames().map(|(_, f)| f.visible).collect();
    assert_eq!(after, visibility);
    assert_eq!(session.graph().handle().unwrap().scale, DEFAULT_HANDLE_SCALE);
}

#[test]
fn test_loading_a_new_scene_resets_the_path() {
    let (mut session, mut client, controls) = connected("flythrough_session_reload");
    session.generate_path(&mut client).unwrap();
    session.generate_path(&mut client).unwrap();
    assert_eq!(session.path().len(), 121);

    let scene = ProceduralProducer::new(11)
        .with_points(50)
        .generate(&Prompt::text("snowy pass"))
        .unwrap();
    session.load_scene(scene).unwrap();

    assert!(session.path().is_empty());
    assert_eq!(session.graph().num_frames(), 1);
    // Controls survive; only the old markers were dropped.
    assert_eq!(session.actions().len(), 7);
    assert_eq!(
        session.actions().get(controls.generate_path),
        Some(&Action::GeneratePath)
    );
}
