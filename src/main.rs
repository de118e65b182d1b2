mod app_state;
mod code_panel;
mod console;
mod console_panel;
mod engine;
mod lang;
mod pipeline;
mod snippets;
mod transform;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    let native_options = eframe::NativeOptions::default();
    let _ = eframe::run_native(
        "Record & Tuple Playground",
        native_options,
        Box::new(|_cc| Box::new(ui::create_app())),
    );
    Ok(())
}
