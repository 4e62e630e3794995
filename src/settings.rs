//! Harness settings
//!
//! Stored as JSON next to the binary or passed with `--config`. Missing keys
//! fall back to their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_SPAWN_BAND, MAX_SUBSTEPS, SIM_DT};

/// Failure to read or write a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Headless run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the simulation's random stream
    pub seed: u64,

    // === Timestep ===
    /// Fixed simulation delta (seconds)
    pub fixed_dt: f32,
    /// Cap on steps run per frame to catch up with wall time
    pub max_substeps: u32,

    // === Run length ===
    /// Wall-clock seconds to measure (benchmark) or simulated seconds to play
    pub duration_secs: f32,
    /// Unmeasured wall-clock seconds before a benchmark measurement starts
    pub warmup_secs: f32,

    // === Benchmark scene ===
    /// Share of every pool's capacity to fill (0..=100)
    pub density: i32,
    /// Fraction of the playfield width where recycled enemies reappear
    pub spawn_band: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,

            fixed_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,

            duration_secs: 10.0,
            warmup_secs: 2.0,

            density: 100,
            spawn_band: DEFAULT_SPAWN_BAND,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.sanitized())
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Replace unusable values with defaults and clamp ranges
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            log::warn!("Ignoring fixed_dt {}, using {}", self.fixed_dt, defaults.fixed_dt);
            self.fixed_dt = defaults.fixed_dt;
        }
        self.max_substeps = self.max_substeps.max(1);
        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            self.duration_secs = defaults.duration_secs;
        }
        if !self.warmup_secs.is_finite() || self.warmup_secs < 0.0 {
            self.warmup_secs = 0.0;
        }
        self.density = self.density.clamp(0, 100);
        if self.spawn_band.is_nan() || self.spawn_band <= 0.0 {
            self.spawn_band = defaults.spawn_band;
        }
        self.spawn_band = self.spawn_band.min(1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("space-impact-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.fixed_dt, SIM_DT);
        assert_eq!(settings.max_substeps, MAX_SUBSTEPS);
        assert_eq!(settings.density, 100);
        assert_eq!(settings.spawn_band, DEFAULT_SPAWN_BAND);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "seed": 7, "density": 40 }"#).expect("parse");
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.density, 40);
        assert_eq!(settings.max_substeps, MAX_SUBSTEPS);
    }

    #[test]
    fn test_sanitize_clamps() {
        let settings = Settings {
            fixed_dt: -1.0,
            max_substeps: 0,
            density: 300,
            spawn_band: f32::NAN,
            warmup_secs: -3.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.fixed_dt, SIM_DT);
        assert_eq!(settings.max_substeps, 1);
        assert_eq!(settings.density, 100);
        assert_eq!(settings.spawn_band, DEFAULT_SPAWN_BAND);
        assert_eq!(settings.warmup_secs, 0.0);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save-load");
        let settings = Settings {
            seed: 1234,
            density: 50,
            ..Settings::default()
        };
        settings.save(&path).expect("save");
        let loaded = Settings::load(&path).expect("load");
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_errors_name_the_file() {
        let missing = temp_path("missing");
        let err = Settings::load(&missing).expect_err("missing file");
        assert!(matches!(err, SettingsError::Io { .. }));
        assert!(err.to_string().contains("space-impact-missing"));

        let broken = temp_path("broken");
        fs::write(&broken, "{ not json").expect("write");
        let err = Settings::load(&broken).expect_err("bad json");
        let _ = fs::remove_file(&broken);
        assert!(matches!(err, SettingsError::Parse { .. }));
    }
}
