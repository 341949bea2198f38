use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Source;

use crate::audio::analyzer::SpectrumAnalyzer;
use crate::consts;

/// Pass-through source that feeds a mono downmix of everything it plays
/// into the shared analyzer.
pub struct TapSource<S> {
    inner: S,
    analyzer: Arc<Mutex<SpectrumAnalyzer>>,
    channels: u16,
    sample_rate: u32,
    frame_sum: f32,
    frame_fill: u16,
    chunk: Vec<f32>,
}

impl<S> TapSource<S>
where
    S: Source<Item = f32>,
{
    pub fn new(source: S, analyzer: Arc<Mutex<SpectrumAnalyzer>>) -> Self {
        let channels = source.channels();
        let sample_rate = source.sample_rate();
        Self {
            inner: source,
            analyzer,
            channels,
            sample_rate,
            frame_sum: 0.0,
            frame_fill: 0,
            chunk: Vec::with_capacity(consts::FFT_SIZE),
        }
    }

    fn push_mono(&mut self, sample: f32) {
        self.chunk.push(sample);

        // One lock per chunk, not per sample
        if self.chunk.len() >= consts::FFT_SIZE {
            self.analyzer.lock().unwrap().add_samples(&self.chunk);
            self.chunk.clear();
        }
    }
}

impl<S> Iterator for TapSource<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(sample) = self.inner.next() else {
            // Flush the tail so short tracks still reach the analyzer
            if !self.chunk.is_empty() {
                self.analyzer.lock().unwrap().add_samples(&self.chunk);
                self.chunk.clear();
            }
            return None;
        };

        self.frame_sum += sample;
        self.frame_fill += 1;
        if self.frame_fill == self.channels {
            let mono = self.frame_sum / self.channels as f32;
            self.frame_sum = 0.0;
            self.frame_fill = 0;
            self.push_mono(mono);
        }

        Some(sample)
    }
}

impl<S> Source for TapSource<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}
