use egui::Color32;
use serde::{Deserialize, Serialize};

/// Width change applied per wheel notch
pub const DEFAULT_WIDTH_STEP: f32 = 3.0;

/// Shape drawn at the open ends of a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Round,
    Square,
    Butt,
}

/// Shape drawn where two segments of a stroke meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    Miter,
}

/// Pen configuration read by the stroke renderer on every mutation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenState {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub color: Color32,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            width: min_width(DEFAULT_WIDTH_STEP),
            cap: LineCap::Round,
            join: LineJoin::Round,
            color: Color32::BLACK,
        }
    }
}

/// Smallest width a downward wheel can leave the pen at
pub fn min_width(step: f32) -> f32 {
    step - 1.0
}

impl PenState {
    /// Pen with the given width, clamped up to the floor for `step`
    pub fn with_width(width: f32, step: f32) -> Self {
        Self {
            width: width.max(min_width(step)),
            ..Self::default()
        }
    }

    /// Adjust the width by one wheel notch.
    ///
    /// A negative delta (wheel pushed away) grows the pen by `step`; a positive
    /// delta shrinks it, never below `step - 1`. A zero delta changes nothing.
    pub fn apply_wheel(&mut self, delta: f32, step: f32) {
        let floor = min_width(step);
        if delta < 0.0 {
            self.width += step;
        } else if delta > 0.0 && self.width > floor {
            self.width = (self.width - step).max(floor);
        }
    }

    /// Clamp the width up to the floor, used after loading stored preferences
    pub fn normalized(mut self, step: f32) -> Self {
        if !self.width.is_finite() || self.width < min_width(step) {
            self.width = min_width(step);
        }
        self
    }
}
