mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::AnalyzerApp;
use config::AnalyzerConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AnalyzerConfig::load();
    let mut state = AppState::new(config.clone());

    // Optional file to open at launch.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.load_path(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Dataset Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(AnalyzerApp::new(state)))),
    )
}
