use egui::{Key, Modifiers};
use serde::{Deserialize, Serialize};

use crate::history::HistoryConfig;
use crate::pen::{DEFAULT_WIDTH_STEP, PenState};

/// A key pressed together with the platform command modifier (Ctrl, or Cmd on macOS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: Key,
    pub shift: bool,
}

impl KeyChord {
    pub const fn command(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub const fn command_shift(key: Key) -> Self {
        Self { key, shift: true }
    }

    /// Alt is never part of a chord, so Ctrl+Alt+Z does not trigger Ctrl+Z
    pub fn matches(&self, key: Key, modifiers: Modifiers) -> bool {
        key == self.key
            && (modifiers.command || modifiers.ctrl)
            && modifiers.shift == self.shift
            && !modifiers.alt
    }
}

/// Key chords bound to history navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortcuts {
    pub undo: Vec<KeyChord>,
    pub redo: Vec<KeyChord>,
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            undo: vec![KeyChord::command(Key::Z)],
            redo: vec![KeyChord::command_shift(Key::Z), KeyChord::command(Key::Y)],
        }
    }
}

impl Shortcuts {
    pub fn is_undo(&self, key: Key, modifiers: Modifiers) -> bool {
        self.undo.iter().any(|chord| chord.matches(key, modifiers))
    }

    pub fn is_redo(&self, key: Key, modifiers: Modifiers) -> bool {
        self.redo.iter().any(|chord| chord.matches(key, modifiers))
    }
}

/// Settings for one drawing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct SessionConfig {
    /// Pen width change per wheel notch
    pub width_step: f32,
    /// Pen used when the session is created
    pub initial_pen: PenState,
    pub history: HistoryConfig,
    pub shortcuts: Shortcuts,
    /// Commit the untouched surface before the first stroke so it can be undone
    pub baseline_snapshot: bool,
    /// Surface size as a fraction of the available window area
    pub surface_scale: [f32; 2],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width_step: DEFAULT_WIDTH_STEP,
            initial_pen: PenState::default(),
            history: HistoryConfig::default(),
            shortcuts: Shortcuts::default(),
            baseline_snapshot: true,
            surface_scale: [1.0 / 1.5, 1.0 / 1.1],
        }
    }
}

impl SessionConfig {
    /// Repair values that would break the pen invariants
    pub fn normalized(mut self) -> Self {
        if !self.width_step.is_finite() || self.width_step <= 1.0 {
            self.width_step = DEFAULT_WIDTH_STEP;
        }
        self.initial_pen = self.initial_pen.normalized(self.width_step);
        for scale in &mut self.surface_scale {
            if !scale.is_finite() || *scale <= 0.0 {
                *scale = 1.0;
            }
        }
        self
    }
}
