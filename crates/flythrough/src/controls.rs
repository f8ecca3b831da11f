//! GUI controls shown to a connected viewer.
//!
//! Controls are plain data: each carries the entity id its events arrive
//! with, and the session maps that id to an [`Action`](crate::Action).

use flythrough_core::options::{RENDER_FOV_DEGREES_RANGE, RENDER_SIZE_RANGE, STEPS_RANGE};
use flythrough_core::{EntityId, SessionConfig};

/// Folder holding the path controls.
pub const CAMERA_PATH_FOLDER: &str = "Camera Path";
/// Folder holding the capture controls.
pub const RENDER_SETTINGS_FOLDER: &str = "Render Settings";

/// Widget type and its value bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    /// Slider over an inclusive range.
    Slider { min: f64, max: f64, step: f64 },
    /// Numeric input over an inclusive range.
    Number { min: f64, max: f64, step: f64 },
    /// Push button.
    Button,
}

/// One GUI widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    id: EntityId,
    label: &'static str,
    folder: &'static str,
    kind: ControlKind,
    value: f64,
}

impl Control {
    fn new(id: EntityId, label: &'static str, folder: &'static str, kind: ControlKind, value: f64) -> Self {
        let mut control = Self {
            id,
            label,
            folder,
            kind,
            value: 0.0,
        };
        control.set_value(value);
        control
    }

    /// Entity id events from this widget carry.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Displayed label.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Folder the widget is grouped under.
    pub fn folder(&self) -> &'static str {
        self.folder
    }

    /// Widget type.
    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    /// Current value. Always 0 for buttons.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Stores `value` clamped to the widget's bounds and returns what was stored.
    pub fn set_value(&mut self, value: f64) -> f64 {
        self.value = match self.kind {
            ControlKind::Slider { min, max, .. } | ControlKind::Number { min, max, .. } => {
                if value.is_nan() {
                    self.value
                } else {
                    value.clamp(min, max)
                }
            }
            ControlKind::Button => 0.0,
        };
        self.value
    }
}

/// The full control panel of one connected viewer.
#[derive(Debug, Clone)]
pub struct Controls {
    /// "Interpolation Steps" slider.
    pub steps: EntityId,
    /// "Generate Camera Path" button.
    pub generate_path: EntityId,
    /// "Render FoV (deg)" input.
    pub render_fov: EntityId,
    /// "Render Height" input.
    pub render_height: EntityId,
    /// "Render Width" input.
    pub render_width: EntityId,
    /// "Save Novel Views" button.
    pub save_views: EntityId,
    items: Vec<Control>,
}

impl Controls {
    /// Builds the panel, taking ids from `allocate` and initial values from `config`.
    pub fn build(config: &SessionConfig, mut allocate: impl FnMut() -> EntityId) -> Self {
        let size = ControlKind::Number {
            min: f64::from(RENDER_SIZE_RANGE.0),
            max: f64::from(RENDER_SIZE_RANGE.1),
            step: 1.0,
        };

        let steps = Control::new(
            allocate(),
            "Interpolation Steps",
            CAMERA_PATH_FOLDER,
            ControlKind::Slider {
                min: f64::from(STEPS_RANGE.0),
                max: f64::from(STEPS_RANGE.1),
                step: 1.0,
            },
            f64::from(config.path.steps),
        );
        let generate_path = Control::new(
            allocate(),
            "Generate Camera Path",
            CAMERA_PATH_FOLDER,
            ControlKind::Button,
            0.0,
        );
        let render_fov = Control::new(
            allocate(),
            "Render FoV (deg)",
            RENDER_SETTINGS_FOLDER,
            ControlKind::Number {
                min: f64::from(RENDER_FOV_DEGREES_RANGE.0),
                max: f64::from(RENDER_FOV_DEGREES_RANGE.1),
                step: 5.0,
            },
            f64::from(config.render.fov_degrees()),
        );
        let render_height = Control::new(
            allocate(),
            "Render Height",
            RENDER_SETTINGS_FOLDER,
            size,
            f64::from(config.render.height),
        );
        let render_width = Control::new(
            allocate(),
            "Render Width",
            RENDER_SETTINGS_FOLDER,
            size,
            f64::from(config.render.width),
        );
        let save_views = Control::new(
            allocate(),
            "Save Novel Views",
            RENDER_SETTINGS_FOLDER,
            ControlKind::Button,
            0.0,
        );

        Self {
            steps: steps.id(),
            generate_path: generate_path.id(),
            render_fov: render_fov.id(),
            render_height: render_height.id(),
            render_width: render_width.id(),
            save_views: save_views.id(),
            items: vec![steps, generate_path, render_fov, render_height, render_width, save_views],
        }
    }

    /// Gets a control by entity id.
    pub fn get(&self, id: EntityId) -> Option<&Control> {
        self.items.iter().find(|c| c.id == id)
    }

    /// Gets a control mutably by entity id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Control> {
        self.items.iter_mut().find(|c| c.id == id)
    }

    /// Finds a control by its label.
    pub fn by_label(&self, label: &str) -> Option<&Control> {
        self.items.iter().find(|c| c.label == label)
    }

    /// Controls of one folder, in display order.
    pub fn folder<'a>(&'a self, folder: &'a str) -> impl Iterator<Item = &'a Control> + 'a {
        self.items.iter().filter(move |c| c.folder == folder)
    }

    /// All controls in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.items.iter()
    }
}
