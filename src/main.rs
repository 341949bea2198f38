mod audio;
mod config;
mod consts;
mod gui;
mod visual_engine;

use std::sync::{Arc, Mutex};

use audio::{Player, SpectrumAnalyzer};
use log::info;

use crate::config::PlayerConfig;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting up...");

    // === Shared State ===
    let analyzer = Arc::new(Mutex::new(SpectrumAnalyzer::new()));
    let player = Player::new(PlayerConfig::default(), analyzer.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 500.0])
            .with_title("freqbar"),
        ..Default::default()
    };

    eframe::run_native(
        "freqbar audio visualizer",
        options,
        Box::new(move |_cc| Ok(Box::new(gui::AppState::new(player, analyzer)))),
    )
}
