use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::audio::SpectrumAnalyzer;
use crate::consts;

/// Per-frame bar renderer. Runs only between `start` and `stop`: while
/// running it pulls fresh magnitudes and schedules the next frame, otherwise
/// the last snapshot just sits on screen and no repaints are requested.
pub struct VisualEngine {
    analyzer: Arc<Mutex<SpectrumAnalyzer>>,
    snapshot: Vec<u8>,
    running: bool,
}

impl VisualEngine {
    pub fn new(analyzer: Arc<Mutex<SpectrumAnalyzer>>) -> Self {
        let bin_count = analyzer.lock().unwrap().bin_count();
        Self {
            analyzer,
            snapshot: vec![0; bin_count],
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn render(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
        let rect = response.rect;

        if self.running {
            self.analyzer
                .lock()
                .unwrap()
                .byte_frequency_data(&mut self.snapshot);
        }

        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

        let bin_count = self.snapshot.len();
        let width = bar_width(rect.width(), bin_count);
        let mut x = rect.left();

        for (i, &magnitude) in self.snapshot.iter().enumerate() {
            let height = bar_height(magnitude);
            let bar = egui::Rect::from_min_max(
                egui::pos2(x, rect.bottom() - height),
                egui::pos2(x + width, rect.bottom()),
            );
            painter.rect_filled(bar, 0.0, bar_color(height, i, bin_count));

            x += width + consts::BAR_GAP;
        }

        if self.running {
            ui.ctx().request_repaint();
        }
    }
}

pub fn bar_width(canvas_width: f32, bin_count: usize) -> f32 {
    canvas_width / bin_count as f32 * consts::BAR_WIDTH_FACTOR
}

pub fn bar_height(magnitude: u8) -> f32 {
    magnitude as f32 / 2.0
}

/// Bars shift from red toward green across the spectrum; the red channel
/// additionally brightens with the bar's own height.
pub fn bar_color(bar_height: f32, index: usize, bin_count: usize) -> egui::Color32 {
    let position = index as f32 / bin_count as f32;
    let r = (bar_height + 25.0 * position).clamp(0.0, 255.0) as u8;
    let g = (250.0 * position) as u8;
    egui::Color32::from_rgb(r, g, 50)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_width_follows_canvas_and_bin_count() {
        assert_eq!(bar_width(1280.0, 128), 25.0);
        assert_eq!(bar_width(640.0, 128), 12.5);
        assert_eq!(bar_width(256.0, 256), 2.5);
    }

    #[test]
    fn total_drawn_width_is_magnitude_independent() {
        let canvas = 800.0;
        let n = consts::BIN_COUNT;
        let width = bar_width(canvas, n);

        let total = n as f32 * (width + consts::BAR_GAP);
        let expected = canvas * consts::BAR_WIDTH_FACTOR + n as f32 * consts::BAR_GAP;
        assert!((total - expected).abs() < 1e-3);
    }

    #[test]
    fn green_channel_never_decreases_across_bins() {
        let n = consts::BIN_COUNT;
        let mut last = 0;
        for i in 0..n {
            let g = bar_color(0.0, i, n).g();
            assert!(g >= last, "green dropped at bin {i}");
            last = g;
        }
    }

    #[test]
    fn zero_magnitudes_paint_flat_tinted_bars() {
        let n = consts::BIN_COUNT;
        for i in [0, 1, 64, n - 1] {
            assert_eq!(bar_height(0), 0.0);
            let color = bar_color(bar_height(0), i, n);
            let position = i as f32 / n as f32;
            assert_eq!(color.r(), (25.0 * position) as u8);
            assert_eq!(color.g(), (250.0 * position) as u8);
            assert_eq!(color.b(), 50);
        }
    }

    #[test]
    fn bar_height_halves_the_magnitude() {
        assert_eq!(bar_height(0), 0.0);
        assert_eq!(bar_height(100), 50.0);
        assert_eq!(bar_height(255), 127.5);
    }

    #[test]
    fn red_channel_clamps_at_full_scale() {
        let color = bar_color(255.0, consts::BIN_COUNT - 1, consts::BIN_COUNT);
        assert_eq!(color.r(), 255);
    }

    #[test]
    fn engine_starts_idle_and_toggles() {
        let analyzer = Arc::new(Mutex::new(SpectrumAnalyzer::new()));
        let mut engine = VisualEngine::new(analyzer);

        assert!(!engine.is_running());
        engine.start();
        assert!(engine.is_running());
        engine.stop();
        assert!(!engine.is_running());
    }

    #[test]
    fn snapshot_matches_analyzer_bin_count() {
        let analyzer = Arc::new(Mutex::new(SpectrumAnalyzer::new()));
        let engine = VisualEngine::new(analyzer);
        assert_eq!(engine.snapshot.len(), consts::BIN_COUNT);
    }
}
