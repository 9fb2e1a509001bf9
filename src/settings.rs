//! Game settings and preferences
//!
//! Persisted as JSON next to the executable's working directory. Gameplay
//! balance lives in [`Tuning`](crate::tuning::Tuning), nested here so one file
//! configures a run.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning::Tuning;
use crate::voice::{DEFAULT_TRIGGER_WORD, KeywordDetector, Transcriber};

/// Default settings file name
pub const SETTINGS_FILE: &str = "flappy_settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value {field} = {value}")]
    Invalid { field: &'static str, value: f32 },
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Ring the bell on every jump, not only on death
    pub jump_sound: bool,

    // === Voice ===
    /// Word that triggers a jump when voice input is available
    pub trigger_word: String,

    // === Run ===
    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            jump_sound: false,

            trigger_word: DEFAULT_TRIGGER_WORD.to_string(),

            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults if it is missing
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject tuning values the simulation cannot run with
    ///
    /// JSON numbers beyond `f32` range parse as infinity, so every field must
    /// be finite and the tick period positive.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let t = &self.tuning;
        let fields = [
            ("play_width", t.play_width),
            ("play_height", t.play_height),
            ("ground_height", t.ground_height),
            ("avatar_x", t.avatar_x),
            ("avatar_width", t.avatar_width),
            ("avatar_height", t.avatar_height),
            ("avatar_start_y", t.avatar_start_y),
            ("gravity", t.gravity),
            ("jump_force", t.jump_force),
            ("pipe_width", t.pipe_width),
            ("pipe_gap", t.pipe_gap),
            ("pipe_speed", t.pipe_speed),
            ("pipe_spawn_rate", t.pipe_spawn_rate),
            ("pipe_min_top", t.pipe_min_top),
            ("pipe_max_top", t.pipe_max_top),
            ("pipe_prune_x", t.pipe_prune_x),
            ("tick_ms", t.tick_ms),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SettingsError::Invalid { field, value });
        }
        if t.tick_ms <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "tick_ms",
                value: t.tick_ms,
            });
        }
        Ok(())
    }

    /// Keyword detector listening for the configured trigger word
    pub fn detector<T: Transcriber>(&self, transcriber: T) -> KeywordDetector<T> {
        KeywordDetector::with_keyword(transcriber, self.trigger_word.as_str())
    }

    /// Save settings as pretty-printed JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::{AudioSample, TriggerDetector, VoiceError};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("flappy-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load_from(temp_path("missing")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved");
        let mut settings = Settings::default();
        settings.muted = true;
        settings.seed = Some(99);
        settings.tuning.pipe_gap = 180.0;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "trigger_word": "jump", "tuning": { "gravity": 0.3 } }"#).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.trigger_word, "jump");
        assert_eq!(loaded.tuning.gravity, 0.3);
        assert_eq!(loaded.tuning.jump_force, Tuning::default().jump_force);
        assert_eq!(loaded.master_volume, 0.8);
    }

    #[test]
    fn test_out_of_range_tick_is_rejected() {
        let path = temp_path("infinite");
        fs::write(&path, r#"{ "tuning": { "tick_ms": 1e39 } }"#).unwrap();
        let result = Settings::load_from(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(
            result,
            Err(SettingsError::Invalid { field: "tick_ms", .. })
        ));

        let mut settings = Settings::default();
        settings.tuning.tick_ms = 0.0;
        assert!(settings.validate().is_err());
        settings.tuning.tick_ms = 16.0;
        settings.tuning.gravity = f32::NAN;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "gravity", .. })
        ));
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_detector_uses_trigger_word() {
        struct Heard(&'static str);

        impl Transcriber for Heard {
            fn transcribe(&self, _sample: &AudioSample) -> Result<String, VoiceError> {
                Ok(self.0.to_string())
            }
        }

        let sample = AudioSample::new(Vec::new(), "audio/webm");
        let mut settings = Settings::default();
        assert_eq!(settings.detector(Heard("hey")).keyword(), "hey");

        settings.trigger_word = "flap".to_string();
        let detector = settings.detector(Heard("flap"));
        assert_eq!(detector.keyword(), "flap");
        assert!(detector.detect(&sample));
        assert!(!settings.detector(Heard("hey")).detect(&sample));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_path("malformed");
        fs::write(&path, "{ not json").unwrap();
        let result = Settings::load_from(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }
}
