// crates/clipper-core/src/config.rs
//
// User settings. clipper-ui persists this struct through eframe's storage
// (one JSON blob under SETTINGS_KEY) and restores it on the next launch.
// Every field has a serde default so older or partial blobs still load.
//
// Environment overrides are applied after loading and are never written
// back, so a one-off CLIPPER_FFMPEG=... run does not stick.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::export::ExportFormat;

pub const SETTINGS_KEY: &str = "clipper_settings";

pub const ENV_ENGINE:     &str = "CLIPPER_FFMPEG";
pub const ENV_OUTPUT_DIR: &str = "CLIPPER_OUTPUT_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Where exports are written. Relative paths resolve against the
    /// working directory.
    #[serde(default = "default_output_dir")]
    pub output_dir:       PathBuf,
    /// Program name or path of the transcoding engine.
    #[serde(default = "default_engine")]
    pub engine:           PathBuf,
    #[serde(default = "default_format")]
    pub default_format:   ExportFormat,
    #[serde(default = "default_output_name")]
    pub last_output_name: String,
}

fn default_output_dir()  -> PathBuf      { PathBuf::from("VideoFinal") }
fn default_engine()      -> PathBuf      { PathBuf::from("ffmpeg") }
fn default_format()      -> ExportFormat { ExportFormat::Mp4 }
fn default_output_name() -> String       { "clip".to_string() }

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir:       default_output_dir(),
            engine:           default_engine(),
            default_format:   default_format(),
            last_output_name: default_output_name(),
        }
    }
}

impl Settings {
    /// Apply `CLIPPER_FFMPEG` / `CLIPPER_OUTPUT_DIR` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::with_env_overrides`] with an injectable lookup.
    /// Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(engine) = lookup(ENV_ENGINE).filter(|v| !v.trim().is_empty()) {
            tracing::info!(engine = %engine, "engine overridden from environment");
            self.engine = PathBuf::from(engine);
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.trim().is_empty()) {
            tracing::info!(dir = %dir, "output directory overridden from environment");
            self.output_dir = PathBuf::from(dir);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_launch() {
        let s = Settings::default();
        assert_eq!(s.output_dir, PathBuf::from("VideoFinal"));
        assert_eq!(s.engine, PathBuf::from("ffmpeg"));
        assert_eq!(s.default_format, ExportFormat::Mp4);
        assert_eq!(s.last_output_name, "clip");
    }

    #[test]
    fn partial_blob_fills_missing_fields() {
        let s: Settings = serde_json::from_str(r#"{ "default_format": "Flac" }"#).unwrap();
        assert_eq!(s.default_format, ExportFormat::Flac);
        assert_eq!(s.output_dir, PathBuf::from("VideoFinal"));
        assert_eq!(s.last_output_name, "clip");
    }

    #[test]
    fn round_trips_through_json() {
        let s = Settings {
            output_dir:       PathBuf::from("/tmp/out"),
            engine:           PathBuf::from("/opt/ffmpeg/bin/ffmpeg"),
            default_format:   ExportFormat::Wav,
            last_output_name: "intro".into(),
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<Settings>(&json).unwrap(), s);
    }

    #[test]
    fn overrides_replace_engine_and_dir_but_skip_blanks() {
        let s = Settings::default().with_overrides(|key| match key {
            ENV_ENGINE     => Some("/usr/local/bin/ffmpeg".into()),
            ENV_OUTPUT_DIR => Some("  ".into()),
            _              => None,
        });
        assert_eq!(s.engine, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert_eq!(s.output_dir, PathBuf::from("VideoFinal"));
    }
}
