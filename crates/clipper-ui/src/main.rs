#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod context;
mod helpers;
mod modules;
mod theme;

fn main() -> eframe::Result {
    let _log_guard = helpers::log::init_logging();

    // Probe and preview report their own errors if this fails; export only
    // needs the CLI, so the window still opens.
    if let Err(e) = ffmpeg_the_third::init() {
        tracing::error!("FFmpeg init failed: {e}");
    }

    let native_options = eframe::NativeOptions {
        centered: true,
        viewport: egui::ViewportBuilder::default()
            .with_title("✂ Clipper")
            .with_inner_size([760.0, 560.0])
            .with_min_inner_size([560.0, 440.0])
            .with_resizable(true)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    tracing::info!("starting Clipper");
    eframe::run_native(
        "Clipper",
        native_options,
        Box::new(|cc| Ok(Box::new(app::ClipperApp::new(cc)))),
    )
}
