use egui::{Color32, Rect, Sense, pos2, vec2};

use crate::FreehandApp;
use crate::input::{CanvasFocus, InputEvent};

pub(crate) fn central_panel(app: &mut FreehandApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        // Follow the window: the surface keeps a fixed fraction of the panel
        let available = ui.available_size();
        let [scale_x, scale_y] = app.session().config().surface_scale;
        let width = (available.x * scale_x).floor().max(1.0) as u32;
        let height = (available.y * scale_y).floor().max(1.0) as u32;
        if app.surface_size() != [width, height] {
            app.apply(InputEvent::Resize { width, height });
        }

        let [width, height] = app.surface_size();
        let (canvas_rect, response) =
            ui.allocate_exact_size(vec2(width as f32, height as f32), Sense::drag());

        // Popups over the canvas and focused fields keep their own input
        let focus = CanvasFocus {
            rect: canvas_rect,
            hovered: response.hovered(),
            keyboard_taken: ctx.wants_keyboard_input(),
        };
        app.handle_input(ctx, focus);

        let painter = ui.painter();
        painter.rect_filled(canvas_rect, 0.0, Color32::WHITE);
        let texture = app.surface_texture(ctx);
        painter.image(
            texture,
            canvas_rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    });
}
