use rustfft::{FftPlanner, num_complex::Complex};

use crate::consts;

pub struct SpectrumAnalyzer {
    buffer: Vec<f32>,
    fft_planner: FftPlanner<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(consts::FFT_SIZE),
            fft_planner: FftPlanner::new(),
            scratch: vec![Complex::new(0.0, 0.0); consts::FFT_SIZE],
            smoothed: vec![0.0; consts::BIN_COUNT],
        }
    }

    pub fn add_samples(&mut self, samples: &[f32]) {
        self.buffer.extend_from_slice(samples);

        // Keep only the most recent samples
        if self.buffer.len() > consts::FFT_SIZE {
            self.buffer
                .drain(0..self.buffer.len() - consts::FFT_SIZE);
        }
    }

    pub fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Recomputes the spectrum and writes the current byte magnitudes into
    /// `out`, one byte per bin, overwriting it in place.
    pub fn byte_frequency_data(&mut self, out: &mut [u8]) {
        self.update_spectrum();

        for (slot, &level) in out.iter_mut().zip(self.smoothed.iter()) {
            *slot = magnitude_to_byte(level);
        }
    }

    fn update_spectrum(&mut self) {
        if self.buffer.len() < consts::FFT_SIZE {
            // Not enough audio yet: let whatever is on screen decay.
            for level in &mut self.smoothed {
                *level *= consts::SMOOTHING_TIME_CONSTANT;
            }
            return;
        }

        let window_start = self.buffer.len() - consts::FFT_SIZE;
        for (i, (&sample, slot)) in self.buffer[window_start..]
            .iter()
            .zip(self.scratch.iter_mut())
            .enumerate()
        {
            // Hann window
            let window = 0.5
                * (1.0
                    - (2.0 * std::f32::consts::PI * i as f32 / consts::FFT_SIZE as f32).cos());
            *slot = Complex::new(sample * window, 0.0);
        }

        let fft = self.fft_planner.plan_fft_forward(consts::FFT_SIZE);
        fft.process(&mut self.scratch);

        let fft_norm = 1.0 / consts::FFT_SIZE as f32;
        for (level, bin) in self.smoothed.iter_mut().zip(self.scratch.iter()) {
            let magnitude = bin.norm() * fft_norm;
            *level = consts::SMOOTHING_TIME_CONSTANT * *level
                + (1.0 - consts::SMOOTHING_TIME_CONSTANT) * magnitude;
        }
    }
}

/// Maps a linear magnitude onto the [MIN_DECIBELS, MAX_DECIBELS] dB range,
/// scaled to a 0-255 byte.
fn magnitude_to_byte(magnitude: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }

    let db = 20.0 * magnitude.log10();
    let scaled =
        255.0 * (db - consts::MIN_DECIBELS) / (consts::MAX_DECIBELS - consts::MIN_DECIBELS);
    scaled.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_window(bin: usize) -> Vec<f32> {
        (0..consts::FFT_SIZE)
            .map(|i| {
                (2.0 * std::f32::consts::PI * bin as f32 * i as f32 / consts::FFT_SIZE as f32)
                    .sin()
            })
            .collect()
    }

    #[test]
    fn bin_count_is_half_the_transform_size() {
        let analyzer = SpectrumAnalyzer::new();
        assert_eq!(analyzer.bin_count(), consts::FFT_SIZE / 2);
    }

    #[test]
    fn buffer_keeps_only_newest_samples() {
        let mut analyzer = SpectrumAnalyzer::new();
        let samples: Vec<f32> = (0..consts::FFT_SIZE + 50).map(|i| i as f32).collect();
        analyzer.add_samples(&samples);

        assert_eq!(analyzer.buffer.len(), consts::FFT_SIZE);
        assert_eq!(analyzer.buffer[0], 50.0);
        assert_eq!(*analyzer.buffer.last().unwrap(), (consts::FFT_SIZE + 49) as f32);
    }

    #[test]
    fn silence_produces_all_zero_bytes() {
        let mut analyzer = SpectrumAnalyzer::new();
        analyzer.add_samples(&vec![0.0; consts::FFT_SIZE]);

        let mut out = vec![0xffu8; consts::BIN_COUNT];
        analyzer.byte_frequency_data(&mut out);

        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn sine_peaks_at_its_own_bin() {
        let mut analyzer = SpectrumAnalyzer::new();
        analyzer.add_samples(&sine_window(10));

        let mut out = vec![0u8; consts::BIN_COUNT];
        analyzer.byte_frequency_data(&mut out);

        assert!(out[10] >= 200, "peak bin too quiet: {}", out[10]);
        assert!(out[64] <= 10, "far bin too loud: {}", out[64]);
        assert!(out[10] > out[64]);
    }

    #[test]
    fn magnitudes_decay_once_input_goes_silent() {
        let mut analyzer = SpectrumAnalyzer::new();
        analyzer.add_samples(&sine_window(10));

        let mut out = vec![0u8; consts::BIN_COUNT];
        analyzer.byte_frequency_data(&mut out);
        let loud = analyzer.smoothed[10];
        assert!(loud > 0.0);

        analyzer.add_samples(&vec![0.0; consts::FFT_SIZE]);
        analyzer.byte_frequency_data(&mut out);
        let quieter = analyzer.smoothed[10];
        analyzer.byte_frequency_data(&mut out);
        let quietest = analyzer.smoothed[10];

        assert!(quieter < loud);
        assert!(quietest < quieter);
    }

    #[test]
    fn partial_buffer_only_decays() {
        let mut analyzer = SpectrumAnalyzer::new();
        analyzer.add_samples(&sine_window(10));

        let mut out = vec![0u8; consts::BIN_COUNT];
        analyzer.byte_frequency_data(&mut out);
        let before = analyzer.smoothed.clone();

        // Fresh analyzer state with a short buffer never runs the FFT.
        let mut short = SpectrumAnalyzer::new();
        short.smoothed = before.clone();
        short.add_samples(&[0.1; 16]);
        short.byte_frequency_data(&mut out);

        for (now, then) in short.smoothed.iter().zip(before.iter()) {
            assert!((now - then * consts::SMOOTHING_TIME_CONSTANT).abs() < 1e-6);
        }
    }

    #[test]
    fn byte_mapping_clamps_to_range() {
        assert_eq!(magnitude_to_byte(0.0), 0);
        assert_eq!(magnitude_to_byte(-1.0), 0);
        assert_eq!(magnitude_to_byte(1.0), 255);
        // -100 dB is the floor
        assert_eq!(magnitude_to_byte(1e-6), 0);
    }
}
