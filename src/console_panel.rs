//! Render of the captured console feed.

use eframe::egui;

use crate::console::{ConsoleSink, Level, ValueKind};

const PANEL_BG: egui::Color32 = egui::Color32::from_rgb(30, 30, 30);
const ERROR_FG: egui::Color32 = egui::Color32::from_rgb(229, 83, 75);
const INFO_FG: egui::Color32 = egui::Color32::from_rgb(120, 160, 255);
const NUMBER_FG: egui::Color32 = egui::Color32::from_rgb(181, 206, 168);
const STRING_FG: egui::Color32 = egui::Color32::from_rgb(206, 145, 120);
const BOOL_FG: egui::Color32 = egui::Color32::from_rgb(86, 156, 214);
const NULLISH_FG: egui::Color32 = egui::Color32::from_rgb(133, 133, 133);
const PLAIN_FG: egui::Color32 = egui::Color32::from_rgb(212, 212, 212);

fn value_color(level: Level, kind: ValueKind) -> egui::Color32 {
    if level == Level::Error {
        return ERROR_FG;
    }
    match kind {
        ValueKind::Number => NUMBER_FG,
        ValueKind::String => PLAIN_FG,
        ValueKind::Boolean => BOOL_FG,
        ValueKind::Nullish => NULLISH_FG,
        ValueKind::Composite => STRING_FG,
        ValueKind::Function => INFO_FG,
    }
}

pub fn show(ui: &mut egui::Ui, sink: &ConsoleSink) {
    egui::Frame::none()
        .fill(PANEL_BG)
        .inner_margin(egui::vec2(8.0, 6.0))
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_source("console")
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for entry in sink.entries() {
                        // Only the channels the feed displays; the rest
                        // are captured but hidden.
                        if !matches!(entry.level, Level::Log | Level::Info | Level::Error) {
                            continue;
                        }
                        ui.horizontal_wrapped(|ui| {
                            ui.spacing_mut().item_spacing.x = 6.0;
                            if entry.level == Level::Error {
                                ui.label(
                                    egui::RichText::new("✖").color(ERROR_FG).monospace(),
                                );
                            }
                            for part in &entry.parts {
                                ui.label(
                                    egui::RichText::new(&part.text)
                                        .color(value_color(entry.level, part.kind))
                                        .monospace(),
                                );
                            }
                        });
                    }
                });
        });
}
