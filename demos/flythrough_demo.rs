//! Demo of a full flythrough session without a remote viewer.
//!
//! Generates a procedural world, records a camera path by moving an
//! in-process viewer around, and saves the novel views as PNGs plus an MP4
//! (when `ffmpeg` is on `PATH`).
//!
//! Usage: `cargo run --example flythrough_demo -- --prompt "a beach" --save_scene`

use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;

use clap::Parser;
use flythrough::{
    init_logging, is_ffmpeg_on_path, Event, FileImageSink, ImageSink, InMemoryVideoSink,
    LoopbackClient, Pose, ProceduralProducer, Prompt, Quat, SceneProducer, SessionConfig,
    SplatRenderer, Vec3, VideoSink, ViewerCamera, ViewerClient, ViewingSession,
};

const DEFAULT_PROMPT: &str = "a lighthouse on a rocky coast";

#[derive(Parser, Debug)]
#[command(name = "flythrough_demo", about = "Record a flythrough of a generated world")]
struct Args {
    /// Prompt for world generation.
    #[arg(short, long)]
    prompt: Option<String>,

    /// Path to an input image.
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Path to an input panorama; takes precedence over `--image`.
    #[arg(long = "pano_image")]
    pano_image: Option<PathBuf>,

    /// Output directory for images, video, and saved scenes.
    #[arg(short, long = "output_dir")]
    output_dir: Option<PathBuf>,

    /// Generate a triangle mesh instead of splats.
    #[arg(long = "return_mesh", default_value_t = false)]
    return_mesh: bool,

    /// Also write the generated scene as PLY.
    #[arg(long = "save_scene", default_value_t = false)]
    save_scene: bool,

    /// Session configuration JSON; flags above override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed of the procedural world.
    #[arg(long, default_value_t = 2024)]
    seed: u64,
}

impl Args {
    fn session_config(&self) -> flythrough::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::from_json_file(path)?,
            None => {
                let mut config = SessionConfig::default();
                config.render.set_width(640);
                config.render.set_height(360);
                config.path.set_steps(60);
                config
            }
        };
        if let Some(dir) = &self.output_dir {
            config.output.output_dir.clone_from(dir);
        }
        config.output.save_scene |= self.save_scene;
        Ok(config)
    }

    fn prompt(&self) -> Result<Prompt, image::ImageError> {
        let text = match (&self.prompt, &self.image, &self.pano_image) {
            (Some(text), _, _) => text.clone(),
            (None, None, None) => DEFAULT_PROMPT.to_string(),
            _ => String::new(),
        };
        let prompt = Prompt::text(text);
        match self.pano_image.as_ref().or(self.image.as_ref()) {
            Some(path) => Ok(prompt.with_image(image::open(path)?.to_rgb8())),
            None => Ok(prompt),
        }
    }

    fn producer(&self) -> ProceduralProducer {
        ProceduralProducer::new(self.seed).with_mesh(self.return_mesh)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let args = Args::parse();
    let config = args.session_config()?;
    let scene = args.producer().generate(&args.prompt()?)?;

    if is_ffmpeg_on_path() {
        run(ViewingSession::new(config), scene)
    } else {
        log::warn!("ffmpeg not found on PATH; writing images only");
        let session = ViewingSession::with_sinks(config, FileImageSink, InMemoryVideoSink::default());
        run(session, scene)
    }
}

fn run<I: ImageSink, V: VideoSink>(
    mut session: ViewingSession<I, V>,
    scene: flythrough::Scene,
) -> Result<(), Box<dyn std::error::Error>> {
    session.load_scene(scene)?;

    let mut viewer = LoopbackClient::new(SplatRenderer::default());
    let controls = session.connect(&mut viewer)?.clone();

    // Anchor at the origin, then sweep a quarter turn while drifting forward.
    session.dispatch(Event::Click(controls.generate_path), &mut viewer)?;
    viewer.navigate(ViewerCamera {
        pose: Pose::new(Quat::from_rotation_y(FRAC_PI_2), Vec3::new(0.0, -0.5, 3.0)),
        ..viewer.camera()
    });
    session.dispatch(Event::Click(controls.generate_path), &mut viewer)?;

    // Preview the midpoint of the path.
    let middle = session.path().frames()[session.path().len() / 2];
    let marker = session.graph().frame(middle)?.id();
    session.dispatch(Event::Click(marker), &mut viewer)?;
    log::info!("Viewer now at {:?}", viewer.camera().pose.position);

    session.dispatch(Event::Click(controls.save_views), &mut viewer)?;
    println!(
        "Saved {} views to {}",
        session.path().len(),
        session.config().output.image_dir().display()
    );
    Ok(())
}
