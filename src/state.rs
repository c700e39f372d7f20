use log::info;

use crate::config::SessionConfig;
use crate::handlers;
use crate::history::HistoryManager;
use crate::input::InputEvent;
use crate::pen::PenState;
use crate::stroke::StrokeRenderer;
use crate::surface::Surface;

/// What a handled event changed, so the host knows whether to re-upload the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    PenChanged,
    SurfaceChanged,
}

impl Outcome {
    pub fn surface_changed(self) -> bool {
        self == Self::SurfaceChanged
    }
}

/// All mutable state of one drawing widget: pen, in-progress stroke and history.
///
/// The widget owns one of these next to its surface and feeds every input
/// event through [`DrawingSessionState::dispatch`].
#[derive(Debug)]
pub struct DrawingSessionState {
    pub(crate) config: SessionConfig,
    pub(crate) pen: PenState,
    pub(crate) renderer: StrokeRenderer,
    pub(crate) history: HistoryManager,
}

impl Default for DrawingSessionState {
    fn default() -> Self {
        Self::create(SessionConfig::default())
    }
}

impl DrawingSessionState {
    /// Start a session with empty history
    pub fn create(config: SessionConfig) -> Self {
        let config = config.normalized();
        info!("Creating drawing session (pen width {})", config.initial_pen.width);
        Self {
            pen: config.initial_pen,
            renderer: StrokeRenderer::new(),
            history: HistoryManager::with_config(config.history),
            config,
        }
    }

    /// Route an event to its handler
    pub fn dispatch(&mut self, surface: &mut impl Surface, event: &InputEvent) -> Outcome {
        match *event {
            InputEvent::PointerDown { pos } => handlers::pointer_down(self, surface, pos),
            InputEvent::PointerMove { pos } => handlers::pointer_move(self, surface, pos),
            InputEvent::PointerUp { .. } => handlers::pointer_up(self, surface),
            InputEvent::Wheel { delta } => handlers::wheel(self, delta),
            InputEvent::KeyDown { key, modifiers } => handlers::key_down(self, surface, key, modifiers),
            InputEvent::Resize { width, height } => handlers::resize(self, surface, width, height),
            InputEvent::Clear => handlers::clear(self, surface),
        }
    }

    /// Empty the history and wipe the surface
    pub fn clear(&mut self, surface: &mut impl Surface) -> Outcome {
        handlers::clear(self, surface)
    }

    /// Step the surface back one completed stroke
    pub fn undo(&mut self, surface: &mut impl Surface) -> Outcome {
        handlers::undo(self, surface)
    }

    /// Re-apply the stroke most recently undone
    pub fn redo(&mut self, surface: &mut impl Surface) -> Outcome {
        handlers::redo(self, surface)
    }

    /// End the session, releasing every snapshot it holds
    pub fn destroy(self) {
        info!(
            "Destroying drawing session with {} history entries",
            self.history.len()
        );
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    /// Pen settings for UI controls; the width is re-clamped on the next wheel step
    pub fn pen_mut(&mut self) -> &mut PenState {
        &mut self.pen
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Returns true while a stroke is in progress
    pub fn is_drawing(&self) -> bool {
        self.renderer.is_active()
    }
}
