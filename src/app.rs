use egui::{TextureId, TextureOptions};
use log::info;

use crate::config::SessionConfig;
use crate::input::{CanvasFocus, InputEvent, InputHandler};
use crate::panels;
use crate::pen::PenState;
use crate::state::{DrawingSessionState, Outcome};
use crate::surface::{RasterSurface, Surface};

/// User preferences restored between runs. Drawings themselves are never stored.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct Preferences {
    config: SessionConfig,
    pen: Option<PenState>,
}

/// The drawing widget: one surface plus the session state that drives it
pub struct FreehandApp {
    session: DrawingSessionState,
    surface: RasterSurface,
    input: InputHandler,
    texture: Option<egui::TextureHandle>,
    surface_dirty: bool,
}

impl Default for FreehandApp {
    fn default() -> Self {
        Self::with_config(SessionConfig::default())
    }
}

impl FreehandApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let prefs: Preferences = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let mut app = Self::with_config(prefs.config);
        if let Some(pen) = prefs.pen {
            *app.session.pen_mut() = pen.normalized(app.session.config().width_step);
        }
        app
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            session: DrawingSessionState::create(config),
            // Sized to the panel on the first frame
            surface: RasterSurface::default(),
            input: InputHandler::new(),
            texture: None,
            surface_dirty: true,
        }
    }

    pub fn session(&self) -> &DrawingSessionState {
        &self.session
    }

    pub fn pen_mut(&mut self) -> &mut PenState {
        self.session.pen_mut()
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    /// Feed one event through the session
    pub fn apply(&mut self, event: InputEvent) -> Outcome {
        let outcome = self.session.dispatch(&mut self.surface, &event);
        self.mark(outcome)
    }

    pub fn undo(&mut self) -> Outcome {
        let outcome = self.session.undo(&mut self.surface);
        self.mark(outcome)
    }

    pub fn redo(&mut self) -> Outcome {
        let outcome = self.session.redo(&mut self.surface);
        self.mark(outcome)
    }

    pub fn clear(&mut self) -> Outcome {
        info!("Clearing surface and history");
        self.apply(InputEvent::Clear)
    }

    /// Translate this frame's egui input for the canvas described by `focus`
    pub(crate) fn handle_input(&mut self, ctx: &egui::Context, focus: CanvasFocus) {
        for event in self.input.process_input(ctx, focus) {
            self.apply(event);
        }
    }

    /// Texture showing the live surface, re-uploaded when it changed
    pub(crate) fn surface_texture(&mut self, ctx: &egui::Context) -> TextureId {
        if let Some(texture) = &mut self.texture {
            if self.surface_dirty {
                texture.set(self.surface.to_color_image(), TextureOptions::NEAREST);
                self.surface_dirty = false;
            }
            return texture.id();
        }

        let texture = ctx.load_texture(
            "freehand_surface",
            self.surface.to_color_image(),
            TextureOptions::NEAREST,
        );
        let id = texture.id();
        self.texture = Some(texture);
        self.surface_dirty = false;
        id
    }

    pub(crate) fn surface_size(&self) -> [u32; 2] {
        self.surface.size()
    }

    fn mark(&mut self, outcome: Outcome) -> Outcome {
        if outcome.surface_changed() {
            self.surface_dirty = true;
        }
        outcome
    }
}

impl eframe::App for FreehandApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let prefs = Preferences {
            config: self.session.config().clone(),
            pen: Some(*self.session.pen()),
        };
        eframe::set_value(storage, eframe::APP_KEY, &prefs);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_clear_marks_surface_dirty() {
        let mut app = FreehandApp::default();
        app.apply(InputEvent::Resize { width: 50, height: 50 });
        app.surface_dirty = false;

        assert_eq!(app.clear(), Outcome::SurfaceChanged);
        assert!(app.surface_dirty);
    }

    #[test]
    fn test_stroke_then_undo_through_app() {
        let mut app = FreehandApp::default();
        app.apply(InputEvent::Resize { width: 50, height: 50 });
        app.apply(InputEvent::PointerDown { pos: pos2(10.0, 10.0) });
        app.apply(InputEvent::PointerMove { pos: pos2(40.0, 10.0) });
        app.apply(InputEvent::PointerUp { pos: pos2(40.0, 10.0) });
        assert!(app.surface().is_painted(25, 10));

        app.undo();
        assert!(!app.surface().is_painted(25, 10));
        app.redo();
        assert!(app.surface().is_painted(25, 10));
    }
}
