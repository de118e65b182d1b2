use eframe::egui;

use crate::app_state::{AppState, OutputState};
use crate::code_panel;
use crate::console_panel;
use crate::lang::Dialect;
use crate::transform::EqualityMode;

const PROPOSAL_URL: &str = "https://github.com/tc39/proposal-record-tuple";
const POLYFILL_URL: &str = "https://github.com/bloomberg/record-tuple-polyfill";

pub struct MyApp {
    state: AppState,
    /// Revision of the output last shown; a mismatch resets the viewer
    /// scroll for one frame.
    shown_revision: u64,
}

pub fn create_app() -> MyApp {
    MyApp {
        state: AppState::default(),
        shown_revision: 0,
    }
}

impl eframe::App for MyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = &mut self.state;

        let now = ctx.input(|i| i.time);
        state.tick(now);
        state.poll();

        // 1. Controls strip
        egui::TopBottomPanel::top("controls_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Record & Tuple Playground");
                ui.separator();

                let mut dialect = state.dialect;
                egui::ComboBox::from_label("syntax")
                    .selected_text(dialect.label())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut dialect, Dialect::Hash, Dialect::Hash.label());
                        ui.selectable_value(&mut dialect, Dialect::Bar, Dialect::Bar.label());
                    });
                state.set_dialect(dialect);

                let mut equality = state.equality;
                egui::ComboBox::from_label("equality")
                    .selected_text(equality.label())
                    .show_ui(ui, |ui| {
                        for mode in [
                            EqualityMode::Strict,
                            EqualityMode::SameValueZero,
                            EqualityMode::Off,
                        ] {
                            ui.selectable_value(&mut equality, mode, mode.label());
                        }
                    });
                state.set_equality(equality);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.hyperlink_to("polyfill", POLYFILL_URL);
                    ui.hyperlink_to("proposal", PROPOSAL_URL);
                });
            });
            ui.add_space(4.0);
        });

        // 2. Status line
        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(state.pipeline.state.label())
                        .monospace()
                        .weak(),
                );
                if state.last_edit_time.is_some() {
                    ui.label(egui::RichText::new("edit pending…").weak());
                }
            });
        });

        // 3. Input editor
        egui::SidePanel::left("input_panel")
            .resizable(true)
            .default_width(ctx.screen_rect().width() * 0.5)
            .show(ctx, |ui| {
                if code_panel::editor(ui, "📄 input", &mut state.source) {
                    state.on_edit(now);
                }
            });

        // 4. Output code above the console feed
        egui::CentralPanel::default().show(ctx, |ui| {
            let reset_scroll = state.output_revision != self.shown_revision;
            self.shown_revision = state.output_revision;

            let console_height = ui.available_height() * 0.35;
            egui::TopBottomPanel::bottom("console_panel")
                .resizable(true)
                .default_height(console_height)
                .show_inside(ui, |ui| {
                    console_panel::show(ui, &state.sink.borrow());
                });

            egui::CentralPanel::default().show_inside(ui, |ui| match &state.output {
                OutputState::Empty => {
                    ui.centered_and_justified(|ui| {
                        ui.label(egui::RichText::new("transforming…").weak());
                    });
                }
                OutputState::Code(code) => {
                    code_panel::viewer(ui, "📄 output", code, reset_scroll);
                }
                OutputState::Error(text) => {
                    ui.add_space(12.0);
                    ui.label(
                        egui::RichText::new(text)
                            .color(egui::Color32::from_rgb(229, 83, 75))
                            .monospace(),
                    );
                }
            });
        });

        if state.busy() {
            // Wake up again so the debounce flush and poll run without input.
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}
