use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, info};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::audio::analyzer::SpectrumAnalyzer;
use crate::audio::tap::TapSource;
use crate::config::PlayerConfig;

const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "wav", "ogg", "flac", "m4a"];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Owns the platform output stream playback sinks attach to.
/// Constructed at most once per player and reused across track changes.
pub struct AudioGraph {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioGraph {
    pub fn new() -> Result<Self, anyhow::Error> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

pub struct Player {
    config: PlayerConfig,
    analyzer: Arc<Mutex<SpectrumAnalyzer>>,
    graph: Option<AudioGraph>,
    sink: Option<Sink>,
    current_track: Option<String>,
    state: PlaybackState,
}

impl Player {
    pub fn new(config: PlayerConfig, analyzer: Arc<Mutex<SpectrumAnalyzer>>) -> Self {
        Self {
            config,
            analyzer,
            graph: None,
            sink: None,
            current_track: None,
            state: PlaybackState::Stopped,
        }
    }

    /// Loads the named track from the audio directory and starts playing it,
    /// replacing whatever was playing before.
    pub fn play_song(&mut self, file_name: &str) -> Result<(), anyhow::Error> {
        self.ensure_graph()?;
        let graph = match self.graph.as_ref() {
            Some(graph) => graph,
            None => return Err(anyhow::anyhow!("audio graph unavailable")),
        };

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        let path = self.resolve_track(file_name);
        info!("Playing {}", path.display());

        let file = File::open(&path)?;
        let decoder = Decoder::new(BufReader::new(file))?;
        let source = TapSource::new(decoder.convert_samples::<f32>(), self.analyzer.clone());

        let sink = Sink::try_new(&graph.handle)?;
        sink.set_volume(self.config.volume);
        sink.append(source);
        // Unpause in case the output was left suspended
        sink.play();

        self.sink = Some(sink);
        self.current_track = Some(file_name.to_string());
        self.state = PlaybackState::Playing;
        Ok(())
    }

    pub fn toggle(&mut self) {
        if let Some(sink) = &self.sink {
            match self.state {
                PlaybackState::Playing => {
                    sink.pause();
                    self.state = PlaybackState::Paused;
                }
                PlaybackState::Paused => {
                    sink.play();
                    self.state = PlaybackState::Playing;
                }
                PlaybackState::Stopped => {}
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.state = PlaybackState::Stopped;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.config.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    /// Detects the active track running out and settles back into Stopped.
    pub fn poll(&mut self) {
        if self.state == PlaybackState::Playing
            && self.sink.as_ref().is_some_and(|sink| sink.empty())
        {
            debug!("Track finished");
            self.sink = None;
            self.state = PlaybackState::Stopped;
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_track(&self) -> Option<&str> {
        self.current_track.as_deref()
    }

    pub fn volume(&self) -> f32 {
        self.config.volume
    }

    pub fn resolve_track(&self, file_name: &str) -> PathBuf {
        self.config.audio_dir.join(file_name)
    }

    pub fn available_tracks(&self) -> Vec<String> {
        scan_tracks(&self.config.audio_dir)
    }

    fn ensure_graph(&mut self) -> Result<(), anyhow::Error> {
        if self.graph.is_none() {
            info!("Initializing audio output graph");
            self.graph = Some(AudioGraph::new()?);
        }
        Ok(())
    }
}

/// Lists the playable files in `dir`, sorted by name.
pub fn scan_tracks(dir: &Path) -> Vec<String> {
    let mut tracks: Vec<String> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_audio_file(name))
        .collect();
    tracks.sort();
    tracks
}

fn is_audio_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
