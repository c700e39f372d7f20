use egui::{Key, Modifiers, Pos2};
use log::{debug, trace};

use crate::pen::{LineCap, PenState};
use crate::snapshot::Snapshot;
use crate::state::{DrawingSessionState, Outcome};
use crate::surface::Surface;

pub(crate) fn pointer_down(
    state: &mut DrawingSessionState,
    surface: &mut impl Surface,
    pos: Pos2,
) -> Outcome {
    // A release we never saw leaves a stroke open; close it before starting over
    let outcome = finish_stroke(state, surface);

    if state.history.is_empty() && state.config.baseline_snapshot {
        debug!("Recording baseline snapshot");
        state.history.commit(surface.get_image());
    }

    state.renderer.begin_stroke(surface, pos);
    outcome
}

pub(crate) fn pointer_move(
    state: &mut DrawingSessionState,
    surface: &mut impl Surface,
    pos: Pos2,
) -> Outcome {
    match state.renderer.extend_stroke(surface, pos, &state.pen) {
        Ok(()) => Outcome::SurfaceChanged,
        Err(err) => {
            // Hovering without a button held lands here on every move
            trace!("Ignoring pointer move to {:?}: {}", pos, err);
            Outcome::Unchanged
        }
    }
}

pub(crate) fn pointer_up(state: &mut DrawingSessionState, surface: &mut impl Surface) -> Outcome {
    finish_stroke(state, surface)
}

pub(crate) fn wheel(state: &mut DrawingSessionState, delta: f32) -> Outcome {
    let before = state.pen.width;
    state.pen.apply_wheel(delta, state.config.width_step);
    if state.pen.width == before {
        Outcome::Unchanged
    } else {
        debug!("Pen width {} -> {}", before, state.pen.width);
        Outcome::PenChanged
    }
}

pub(crate) fn key_down(
    state: &mut DrawingSessionState,
    surface: &mut impl Surface,
    key: Key,
    modifiers: Modifiers,
) -> Outcome {
    if state.config.shortcuts.is_undo(key, modifiers) {
        undo(state, surface)
    } else if state.config.shortcuts.is_redo(key, modifiers) {
        redo(state, surface)
    } else {
        Outcome::Unchanged
    }
}

pub(crate) fn undo(state: &mut DrawingSessionState, surface: &mut impl Surface) -> Outcome {
    let finished = finish_stroke(state, surface);
    let before = state.history.cursor();
    let snapshot = state.history.undo().cloned();
    if state.history.cursor() == before {
        return finished;
    }
    restore(surface, snapshot.as_ref())
}

pub(crate) fn redo(state: &mut DrawingSessionState, surface: &mut impl Surface) -> Outcome {
    let finished = finish_stroke(state, surface);
    let before = state.history.cursor();
    let snapshot = state.history.redo().cloned();
    if state.history.cursor() == before {
        return finished;
    }
    restore(surface, snapshot.as_ref())
}

pub(crate) fn resize(
    state: &mut DrawingSessionState,
    surface: &mut impl Surface,
    width: u32,
    height: u32,
) -> Outcome {
    // Stroke continuity never spans a resize
    let finished = finish_stroke(state, surface);
    let before = surface.size();
    surface.resize(width, height);
    if surface.size() != before {
        Outcome::SurfaceChanged
    } else {
        finished
    }
}

pub(crate) fn clear(state: &mut DrawingSessionState, surface: &mut impl Surface) -> Outcome {
    if state.renderer.end_stroke().is_some() {
        debug!("Discarding in-progress stroke on clear");
    }
    state.history.clear();
    surface.begin_path();
    surface.clear();
    Outcome::SurfaceChanged
}

/// Complete the active stroke and commit the result as one history entry
fn finish_stroke(state: &mut DrawingSessionState, surface: &mut impl Surface) -> Outcome {
    let Some(stroke) = state.renderer.end_stroke() else {
        return Outcome::Unchanged;
    };
    if stroke.is_dot() {
        // A zero-length butt segment covers nothing, so a click would leave no mark
        let pen = match state.pen.cap {
            LineCap::Butt => PenState {
                cap: LineCap::Round,
                ..state.pen
            },
            _ => state.pen,
        };
        state.renderer.dot_stroke(surface, stroke.origin, &pen);
    }
    state.history.commit(surface.get_image());
    Outcome::SurfaceChanged
}

fn restore(surface: &mut impl Surface, snapshot: Option<&Snapshot>) -> Outcome {
    surface.clear();
    if let Some(snapshot) = snapshot {
        surface.put_image(snapshot);
    }
    Outcome::SurfaceChanged
}
