//! Sequential video output.
//!
//! A [`VideoSink`] receives frames strictly in path order between one `open`
//! and one `close`. [`VideoSession`] scopes that lifecycle so the sink is
//! closed exactly once however the capture ends.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use image::RgbaImage;

use crate::error::{RenderError, RenderResult};

/// Parameters fixed for the lifetime of one video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
}

/// Sink contract for consuming rendered frames in order.
pub trait VideoSink {
    /// Prepares the sink for frames of the given shape.
    fn open(&mut self, config: VideoConfig) -> RenderResult<()>;
    /// Appends the next frame.
    fn append(&mut self, frame: &RgbaImage) -> RenderResult<()>;
    /// Flushes and finalizes the video.
    fn close(&mut self) -> RenderResult<()>;
}

/// An open video; closes its sink on [`finish`](Self::finish) or drop.
pub struct VideoSession<'a, S: VideoSink + ?Sized> {
    sink: &'a mut S,
    frames: usize,
    closed: bool,
}

impl<'a, S: VideoSink + ?Sized> VideoSession<'a, S> {
    /// Opens `sink`. If opening fails nothing needs closing and the error is returned.
    pub fn open(sink: &'a mut S, config: VideoConfig) -> RenderResult<Self> {
        sink.open(config)?;
        Ok(Self {
            sink,
            frames: 0,
            closed: false,
        })
    }

    /// Appends one frame.
    pub fn append(&mut self, frame: &RgbaImage) -> RenderResult<()> {
        self.sink.append(frame)?;
        self.frames += 1;
        Ok(())
    }

    /// Number of frames appended so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Closes the sink and returns the number of frames written.
    pub fn finish(mut self) -> RenderResult<usize> {
        self.closed = true;
        self.sink.close()?;
        Ok(self.frames)
    }
}

impl<S: VideoSink + ?Sized> Drop for VideoSession<'_, S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        match self.sink.close() {
            Ok(()) => log::warn!("video closed early after {} frames", self.frames),
            Err(e) => log::error!("failed to close video after {} frames: {e}", self.frames),
        }
    }
}

/// Keeps every frame in memory. Useful for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryVideoSink {
    /// Configuration passed to the last `open`.
    pub config: Option<VideoConfig>,
    /// Frames in append order.
    pub frames: Vec<RgbaImage>,
    /// Number of `close` calls seen.
    pub close_calls: usize,
}

impl VideoSink for InMemoryVideoSink {
    fn open(&mut self, config: VideoConfig) -> RenderResult<()> {
        self.config = Some(config);
        self.frames.clear();
        Ok(())
    }

    fn append(&mut self, frame: &RgbaImage) -> RenderResult<()> {
        if self.config.is_none() {
            return Err(RenderError::SinkClosed);
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn close(&mut self) -> RenderResult<()> {
        self.close_calls += 1;
        Ok(())
    }
}

/// Options for [`FfmpegVideoSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegOptions {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegOptions {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to stdin.
///
/// Frames are encoded as H.264/yuv420p; odd dimensions are padded by one
/// pixel since the chroma subsampling needs even sizes. A capture that
/// aborts early still closes the pipe, leaving a valid truncated file.
pub struct FfmpegVideoSink {
    opts: FfmpegOptions,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    config: Option<VideoConfig>,
}

impl FfmpegVideoSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegOptions) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            config: None,
        }
    }

    /// Output file path.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }
}

impl VideoSink for FfmpegVideoSink {
    fn open(&mut self, config: VideoConfig) -> RenderResult<()> {
        if config.fps == 0 {
            return Err(RenderError::Encoder("fps must be non-zero".to_string()));
        }
        if config.width == 0 || config.height == 0 {
            return Err(RenderError::Encoder(
                "video width/height must be non-zero".to_string(),
            ));
        }
        if self.child.is_some() {
            return Err(RenderError::Encoder("ffmpeg sink is already open".to_string()));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(RenderError::Encoder(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", config.width, config.height),
            "-r",
            &config.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            RenderError::Encoder(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RenderError::Encoder("failed to open ffmpeg stdin".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| RenderError::Encoder("failed to open ffmpeg stderr".to_string()))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        log::debug!(
            "spawned ffmpeg for {}x{} @ {} fps -> {}",
            config.width,
            config.height,
            config.fps,
            self.opts.out_path.display()
        );
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.config = Some(config);
        Ok(())
    }

    fn append(&mut self, frame: &RgbaImage) -> RenderResult<()> {
        let config = self.config.ok_or(RenderError::SinkClosed)?;
        if frame.dimensions() != (config.width, config.height) {
            return Err(RenderError::SizeMismatch {
                got: frame.dimensions(),
                expected: (config.width, config.height),
            });
        }
        let stdin = self.stdin.as_mut().ok_or(RenderError::SinkClosed)?;
        stdin.write_all(frame.as_raw()).map_err(|e| {
            RenderError::Encoder(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn close(&mut self) -> RenderResult<()> {
        // Every handle is released before anything below can fail.
        drop(self.stdin.take());
        self.config = None;
        let stderr_drain = self.stderr_drain.take();
        let Some(mut child) = self.child.take() else {
            let _ = join_stderr(stderr_drain);
            return Err(RenderError::SinkClosed);
        };

        let status = match child.wait() {
            Ok(status) => status,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = join_stderr(stderr_drain);
                return Err(RenderError::Encoder(format!(
                    "failed to wait for ffmpeg to finish: {e}"
                )));
            }
        };
        let stderr_bytes = join_stderr(stderr_drain)?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(RenderError::Encoder(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        log::info!("wrote video {}", self.opts.out_path.display());
        Ok(())
    }
}

fn join_stderr(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> RenderResult<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| RenderError::Encoder("ffmpeg stderr drain thread panicked".to_string()))?
            .map_err(|e| RenderError::Encoder(format!("ffmpeg stderr read failed: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> RenderResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
