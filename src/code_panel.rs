//! Gutter-and-highlight code panes: an editable one for the source buffer
//! and a read-only one for the transformed output.

use eframe::egui;

const TOP_BAR_BG: egui::Color32 = egui::Color32::from_rgb(37, 37, 38);
const TOP_BAR_STROKE: egui::Color32 = egui::Color32::from_rgb(51, 51, 51);
const GUTTER_BG: egui::Color32 = egui::Color32::from_rgb(30, 30, 30);
const GUTTER_FG: egui::Color32 = egui::Color32::from_rgb(133, 133, 133);

/// Editable pane. Returns true when the text changed this frame.
pub fn editor(ui: &mut egui::Ui, title: &str, code: &mut String) -> bool {
    let mut changed = false;
    pane(ui, title, code, true, false, &mut changed);
    changed
}

/// Read-only pane. `reset_scroll` jumps back to the top, used when the
/// content was just replaced.
pub fn viewer(ui: &mut egui::Ui, title: &str, code: &str, reset_scroll: bool) {
    let mut buffer = code.to_string();
    let mut changed = false;
    pane(ui, title, &mut buffer, false, reset_scroll, &mut changed);
}

fn pane(
    ui: &mut egui::Ui,
    title: &str,
    code: &mut String,
    editable: bool,
    reset_scroll: bool,
    changed: &mut bool,
) {
    // Header bar, VSCode-tab style.
    egui::Frame::none()
        .fill(TOP_BAR_BG)
        .inner_margin(egui::vec2(16.0, 8.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(title)
                        .color(egui::Color32::from_rgb(224, 224, 224))
                        .size(13.0),
                );
            });
        });

    let rect = ui.max_rect();
    ui.painter().hline(
        rect.x_range(),
        ui.cursor().top(),
        egui::Stroke::new(1.0, TOP_BAR_STROKE),
    );
    ui.add_space(1.0);

    let theme = egui_extras::syntax_highlighting::CodeTheme::from_memory(ui.ctx());
    let mut layouter = |ui: &egui::Ui, string: &str, _wrap_width: f32| {
        let mut layout_job =
            egui_extras::syntax_highlighting::highlight(ui.ctx(), &theme, string, "js");
        layout_job.wrap.max_width = f32::INFINITY; // no wrap, keeps line numbers in sync
        ui.fonts(|f| f.layout_job(layout_job))
    };

    let font_id = egui::TextStyle::Monospace.resolve(ui.style());
    let row_height = ui.fonts(|f| f.row_height(&font_id));
    let available_height = ui.available_height();

    let mut scroll = egui::ScrollArea::both()
        .id_source(title.to_string())
        .auto_shrink([false, false]);
    if reset_scroll {
        scroll = scroll.scroll_offset(egui::Vec2::ZERO);
    }

    scroll.show(ui, |ui| {
        ui.horizontal_top(|ui| {
            let spacing = ui.spacing_mut();
            spacing.item_spacing.x = 0.0;

            let num_lines = code.split('\n').count().max(1);

            let digits = num_lines.to_string().len().max(2);
            let gutter_width = digits as f32 * ui.fonts(|f| f.glyph_width(&font_id, '0')) + 24.0;

            let content_height = (num_lines as f32 * row_height).max(available_height);

            let (gutter_rect, _) = ui.allocate_exact_size(
                egui::vec2(gutter_width, content_height),
                egui::Sense::hover(),
            );
            ui.painter().rect_filled(gutter_rect, 0.0, GUTTER_BG);

            for i in 1..=num_lines {
                let y = gutter_rect.top() + (i - 1) as f32 * row_height;
                let galley = ui.fonts(|f| {
                    f.layout(format!("{}", i), font_id.clone(), GUTTER_FG, gutter_width - 8.0)
                });
                // Right-aligned inside the gutter.
                let x = gutter_rect.right() - 12.0 - galley.rect.width();
                ui.painter()
                    .galley(egui::pos2(x, y), galley, egui::Color32::PLACEHOLDER);
            }

            ui.add_space(4.0);

            let available_size = ui.available_size();
            let (text_rect, _) = ui.allocate_exact_size(
                egui::vec2(available_size.x, content_height),
                egui::Sense::click(),
            );

            let mut text_output = None;
            ui.allocate_ui_at_rect(text_rect, |ui| {
                let output = egui::TextEdit::multiline(code)
                    .font(egui::TextStyle::Monospace)
                    .frame(false)
                    .desired_width(f32::INFINITY)
                    .margin(egui::vec2(0.0, 0.0))
                    .lock_focus(editable)
                    .interactive(editable)
                    .layouter(&mut layouter);
                text_output = Some(output.show(ui));
            });

            if let Some(text_out) = text_output {
                // A click in the empty area below the text focuses the editor.
                if editable
                    && ui.rect_contains_pointer(text_rect)
                    && ui.input(|i| i.pointer.primary_clicked())
                {
                    text_out.response.request_focus();
                }
                if text_out.response.changed() {
                    *changed = true;
                }
            }
        });
    });
}
