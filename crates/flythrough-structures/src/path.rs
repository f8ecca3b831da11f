//! Camera path synthesis between a fixed anchor and the live viewer pose.

use flythrough_core::{slerp, smoothstep, FlythroughError, PathOptions, Pose, Result};

use crate::camera_frame::{CameraFrame, CameraIntrinsics};
use crate::graph::{FrameId, SceneGraph};

/// Name of the anchor marker.
pub const ANCHOR_NAME: &str = "/start_camera";

/// One interpolated pose and the progress it was generated at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    /// Linear progress `i / steps`.
    pub t: f32,
    /// Eased progress used for the pose.
    pub eased: f32,
    /// Interpolated pose.
    pub pose: Pose,
}

/// Interpolates `steps` poses from `anchor` (exclusive) to `live` (inclusive).
///
/// Sample `i` (1-based) sits at eased progress `smoothstep(i / steps)`:
/// position is blended linearly and orientation spherically, both with the
/// eased value. The anchor itself is not part of the output.
pub fn interpolate_poses(anchor: &Pose, live: &Pose, steps: u32) -> Vec<PathSample> {
    (1..=steps)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 / steps as f32;
            let eased = smoothstep(t);
            let position = anchor.position.lerp(live.position, eased);
            let orientation = slerp(anchor.orientation, live.orientation, eased);
            PathSample {
                t,
                eased,
                pose: Pose::new(orientation, position),
            }
        })
        .collect()
}

/// Linear blend between two marker colors, truncating towards zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn gradient_color(start: [u8; 3], end: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for (channel, (s, e)) in out.iter_mut().zip(start.iter().zip(end)) {
        *channel = (f32::from(*s) * (1.0 - t) + f32::from(e) * t) as u8;
    }
    out
}

/// Ordered camera path: the anchor at index 0 followed by every frame
/// generated since, in generation order.
///
/// The path only grows. Regenerating appends; [`CameraPath::clear`] is the
/// only way to start over.
#[derive(Debug, Default, Clone)]
pub struct CameraPath {
    frames: Vec<FrameId>,
}

impl CameraPath {
    /// Creates an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the anchor frame, if established.
    pub fn anchor(&self) -> Option<FrameId> {
        self.frames.first().copied()
    }

    /// Returns all frames in traversal order.
    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    /// Returns the number of frames, anchor included.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if not even the anchor exists.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Forgets every frame, anchor included. Markers stay in the scene graph.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Extends the path towards the live camera pose.
    ///
    /// Without an anchor, this call only records `live` as the anchor (using
    /// `intrinsics` for its marker) and returns it. Otherwise it appends
    /// `options.steps` interpolated frames ending at `live`, all sharing the
    /// anchor's field of view and aspect, and returns them.
    ///
    /// The call is not idempotent: each invocation appends again. Appending
    /// with `options.steps == 0` is rejected.
    pub fn extend(
        &mut self,
        graph: &mut SceneGraph,
        live: Pose,
        intrinsics: CameraIntrinsics,
        options: &PathOptions,
    ) -> Result<Vec<FrameId>> {
        let Some(anchor_id) = self.anchor() else {
            let anchor = graph.add_frame(|id| {
                CameraFrame::new(id, ANCHOR_NAME, live, intrinsics)
                    .with_scale(options.frustum_scale)
                    .with_color(options.anchor_color)
            });
            self.frames.push(anchor);
            log::info!("Set camera path anchor");
            return Ok(vec![anchor]);
        };

        if options.steps == 0 {
            return Err(FlythroughError::InvalidSetting {
                name: "steps",
                reason: "at least one step is needed to reach the live pose".to_string(),
            });
        }

        let anchor = graph.frame(anchor_id)?;
        let anchor_pose = anchor.pose;
        let anchor_intrinsics = anchor.intrinsics;

        let mut added = Vec::with_capacity(options.steps as usize);
        for sample in interpolate_poses(&anchor_pose, &live, options.steps) {
            let name = format!("/{}", self.frames.len() - 1);
            let color = gradient_color(options.start_color, options.end_color, sample.t);
            let frame = graph.add_frame(|id| {
                CameraFrame::new(id, name, sample.pose, anchor_intrinsics)
                    .with_scale(options.frustum_scale)
                    .with_color(color)
            });
            self.frames.push(frame);
            added.push(frame);
        }

        log::info!("Added camera path with {} cameras", options.steps + 1);
        Ok(added)
    }
}
