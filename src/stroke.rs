use egui::Pos2;
use log::debug;

use crate::error::StrokeError;
use crate::pen::PenState;
use crate::surface::Surface;

/// Summary of a stroke returned when it ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishedStroke {
    /// Where the pointer went down
    pub origin: Pos2,
    /// Last point the stroke reached
    pub last: Pos2,
    /// Number of segments drawn; zero means the pointer never moved
    pub segments: usize,
}

impl FinishedStroke {
    pub fn is_dot(&self) -> bool {
        self.segments == 0
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveStroke {
    origin: Pos2,
    last: Pos2,
    segments: usize,
}

/// Turns a sequence of pointer positions into connected segments on a surface
#[derive(Debug, Default)]
pub struct StrokeRenderer {
    active: Option<ActiveStroke>,
}

impl StrokeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Last point of the active stroke
    pub fn last_point(&self) -> Option<Pos2> {
        self.active.map(|stroke| stroke.last)
    }

    /// Start a new path at `pos` without leaving a mark
    pub fn begin_stroke(&mut self, surface: &mut impl Surface, pos: Pos2) {
        if self.active.is_some() {
            debug!("Beginning a stroke while another is active; dropping the old path");
        }
        surface.begin_path();
        surface.move_to(pos);
        self.active = Some(ActiveStroke {
            origin: pos,
            last: pos,
            segments: 0,
        });
    }

    /// Draw a straight segment from the last point to `pos`
    pub fn extend_stroke(
        &mut self,
        surface: &mut impl Surface,
        pos: Pos2,
        pen: &PenState,
    ) -> Result<(), StrokeError> {
        let stroke = self.active.as_mut().ok_or(StrokeError::NoActiveStroke)?;
        surface.set_pen(pen);
        surface.line_to(pos);
        surface.stroke();
        stroke.last = pos;
        stroke.segments += 1;
        Ok(())
    }

    /// Mark a stroke that never moved: a zero-length segment at `pos`
    pub fn dot_stroke(&mut self, surface: &mut impl Surface, pos: Pos2, pen: &PenState) {
        surface.set_pen(pen);
        surface.begin_path();
        surface.move_to(pos);
        surface.line_to(pos);
        surface.stroke();
    }

    /// End the active stroke, if any
    pub fn end_stroke(&mut self) -> Option<FinishedStroke> {
        self.active.take().map(|stroke| FinishedStroke {
            origin: stroke.origin,
            last: stroke.last,
            segments: stroke.segments,
        })
    }
}
