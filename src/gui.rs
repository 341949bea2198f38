use std::sync::{Arc, Mutex};

use eframe::egui;
use log::{info, warn};

use crate::audio::{PlaybackState, Player, SpectrumAnalyzer};
use crate::config::APP_VERSION;
use crate::visual_engine::VisualEngine;

pub struct AppState {
    player: Player,
    visual: VisualEngine,
    tracks: Vec<String>,
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.player.poll();

        self.render_top_panel(ctx);
        self.render_bottom_panel(ctx);
        self.render_central_panel(ctx);
    }
}

impl AppState {
    pub fn new(player: Player, analyzer: Arc<Mutex<SpectrumAnalyzer>>) -> Self {
        let tracks = player.available_tracks();
        info!("Found {} playable tracks", tracks.len());

        Self {
            player,
            visual: VisualEngine::new(analyzer),
            tracks,
        }
    }

    /// Entry point wired to the track buttons: load and play the named
    /// track, then start visualizing.
    pub fn play_song(&mut self, file_name: &str) {
        match self.player.play_song(file_name) {
            Ok(()) => self.visual.start(),
            Err(err) => warn!("Failed to play {file_name}: {err:#}"),
        }
    }

    fn render_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(format!("freqbar {APP_VERSION}"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.player.state() {
                        PlaybackState::Playing => {
                            ui.colored_label(egui::Color32::GREEN, "Playing");
                        }
                        PlaybackState::Paused => {
                            ui.colored_label(egui::Color32::YELLOW, "Paused");
                        }
                        PlaybackState::Stopped => {
                            ui.colored_label(egui::Color32::GRAY, "Stopped");
                        }
                    }
                });
            });
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            // Track Selection
            let mut clicked: Option<String> = None;
            ui.horizontal_wrapped(|ui| {
                for track in &self.tracks {
                    if ui.button(track).clicked() {
                        clicked = Some(track.clone());
                    }
                }
                if self.tracks.is_empty() {
                    ui.colored_label(egui::Color32::GRAY, "No playable tracks found");
                }
            });
            if let Some(track) = clicked {
                self.play_song(&track);
            }
            ui.add_space(4.0);
        });
    }

    fn render_bottom_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.add_space(4.0);

                let toggle_label = match self.player.state() {
                    PlaybackState::Playing => "⏸ Pause",
                    _ => "▶ Resume",
                };
                if ui.button(toggle_label).clicked() {
                    self.player.toggle();
                }

                if ui.button("⏹ Stop").clicked() {
                    self.player.stop();
                    self.visual.stop();
                }

                ui.separator();

                ui.label("Volume:");
                let mut volume = self.player.volume();
                if ui
                    .add(egui::Slider::new(&mut volume, 0.0..=1.0).show_value(false))
                    .changed()
                {
                    self.player.set_volume(volume);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(track) = self.player.current_track() {
                        ui.label(track);
                    }
                });
            });
            ui.add_space(8.0);
        });
    }

    fn render_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .fill(egui::Color32::BLACK)
                    .inner_margin(0.0),
            )
            .show(ctx, |ui| {
                self.visual.render(ui);
            });
    }
}
