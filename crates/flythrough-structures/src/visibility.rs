//! Scoped suppression of scene decorations for clean captures.
//!
//! While a [`CleanScene`] guard is alive every camera frame marker is hidden
//! and the manipulation handle is shrunk to zero scale. Dropping the guard
//! restores the exact values seen at acquisition, on normal return, early
//! `?` return, and unwinding panic alike.

use std::ops::{Deref, DerefMut};

use crate::graph::{FrameId, SceneGraph};

/// Guard holding a scene graph in its render-clean state.
pub struct CleanScene<'a> {
    graph: &'a mut SceneGraph,
    saved_visibility: Vec<(FrameId, bool)>,
    saved_handle_scale: Option<f32>,
}

impl<'a> CleanScene<'a> {
    /// Hides all decorations of `graph` until the guard is dropped.
    pub fn acquire(graph: &'a mut SceneGraph) -> Self {
        let mut saved_visibility = Vec::with_capacity(graph.num_frames());
        for (id, frame) in graph.frames_mut() {
            saved_visibility.push((id, frame.visible));
            frame.visible = false;
        }

        let saved_handle_scale = graph.handle_mut().map(|handle| {
            let scale = handle.scale;
            handle.scale = 0.0;
            scale
        });

        log::debug!(
            "hid {} markers for capture (handle: {})",
            saved_visibility.len(),
            saved_handle_scale.is_some()
        );

        Self {
            graph,
            saved_visibility,
            saved_handle_scale,
        }
    }
}

impl Deref for CleanScene<'_> {
    type Target = SceneGraph;

    fn deref(&self) -> &SceneGraph {
        self.graph
    }
}

impl DerefMut for CleanScene<'_> {
    fn deref_mut(&mut self) -> &mut SceneGraph {
        self.graph
    }
}

impl Drop for CleanScene<'_> {
    fn drop(&mut self) {
        for &(id, visible) in &self.saved_visibility {
            if let Ok(frame) = self.graph.frame_mut(id) {
                frame.visible = visible;
            }
        }
        if let (Some(scale), Some(handle)) = (self.saved_handle_scale, self.graph.handle_mut()) {
            handle.scale = scale;
        }
        log::debug!("restored {} markers after capture", self.saved_visibility.len());
    }
}

/// Runs `operation` with all decorations hidden, restoring them afterwards
/// whatever the outcome.
pub fn with_clean_scene<R>(graph: &mut SceneGraph, operation: impl FnOnce(&mut SceneGraph) -> R) -> R {
    let mut clean = CleanScene::acquire(graph);
    operation(&mut clean)
}
