use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::kernel::time::{
    millis, CROSSFADE_MS, EFFECT_COOLDOWN_MS, POLL_INTERVAL_MS, STOP_FADE_MS, TEARDOWN_GRACE_MS,
};
use crate::library::TrackId;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub engine: EngineConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub poll_interval_ms: u64,
    /// Characters of transcript tail sent for ambience classification.
    pub ambience_window_chars: usize,
    /// Words of transcript tail sent for effect classification.
    pub effect_window_tokens: usize,
    pub min_ambience_chars: usize,
    pub min_effect_tokens: usize,
    pub effect_cooldown_ms: u64,
    pub log_capacity: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL_MS,
            ambience_window_chars: 400,
            effect_window_tokens: 3,
            min_ambience_chars: 10,
            min_effect_tokens: 2,
            effect_cooldown_ms: EFFECT_COOLDOWN_MS,
            log_capacity: 50,
        }
    }
}

impl AnalyzerConfig {
    pub fn poll_interval(&self) -> Duration {
        millis(self.poll_interval_ms)
    }

    pub fn effect_cooldown(&self) -> Duration {
        millis(self.effect_cooldown_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub crossfade_ms: u64,
    pub stop_fade_ms: u64,
    pub teardown_grace_ms: u64,
    pub master_volume: f32,
    pub default_track: TrackId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            crossfade_ms: CROSSFADE_MS,
            stop_fade_ms: STOP_FADE_MS,
            teardown_grace_ms: TEARDOWN_GRACE_MS,
            master_volume: 0.7,
            default_track: TrackId::ConteFees,
        }
    }
}

impl EngineConfig {
    pub fn crossfade(&self) -> Duration {
        millis(self.crossfade_ms)
    }

    pub fn stop_fade(&self) -> Duration {
        millis(self.stop_fade_ms)
    }

    pub fn teardown_grace(&self) -> Duration {
        millis(self.teardown_grace_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8788".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        millis(self.timeout_ms)
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading configuration from {path:?}");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}
