use std::path::PathBuf;

pub const APP_VERSION: &str = "v0.1.0";

#[derive(Clone, PartialEq, Debug)]
pub struct PlayerConfig {
    /// Directory the track buttons are populated from and track names are
    /// resolved against. Relative to the working directory.
    pub audio_dir: PathBuf,

    /// Initial playback volume, 0.0 (silent) to 1.0 (full scale).
    pub volume: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            audio_dir: PathBuf::from("audios"),
            volume: 0.8,
        }
    }
}
