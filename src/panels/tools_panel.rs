use egui::color_picker::{self, Alpha};

use crate::FreehandApp;
use crate::pen::{LineCap, LineJoin, min_width};

pub(crate) fn tools_panel(app: &mut FreehandApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("tools_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Clear").clicked() {
                app.clear();
            }

            ui.separator();

            let history = app.session().history();
            let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                app.undo();
            }
            if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                app.redo();
            }

            let history = app.session().history();
            let position = history.cursor().map_or(0, |cursor| cursor + 1);
            ui.label(format!("History: {}/{}", position, history.len()));

            ui.separator();

            let floor = min_width(app.session().config().width_step);
            let pen = app.pen_mut();
            ui.label("Width:");
            ui.add(egui::DragValue::new(&mut pen.width).range(floor..=200.0).speed(0.5));

            color_picker::color_edit_button_srgba(ui, &mut pen.color, Alpha::Opaque);

            egui::ComboBox::from_label("Cap")
                .selected_text(format!("{:?}", pen.cap))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut pen.cap, LineCap::Round, "Round");
                    ui.selectable_value(&mut pen.cap, LineCap::Square, "Square");
                    ui.selectable_value(&mut pen.cap, LineCap::Butt, "Butt");
                });

            egui::ComboBox::from_label("Join")
                .selected_text(format!("{:?}", pen.join))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut pen.join, LineJoin::Round, "Round");
                    ui.selectable_value(&mut pen.join, LineJoin::Bevel, "Bevel");
                    ui.selectable_value(&mut pen.join, LineJoin::Miter, "Miter");
                });
        });
        ui.small("Scroll to change the pen width. Ctrl+Z undoes, Ctrl+Shift+Z or Ctrl+Y redoes.");
    });
}
