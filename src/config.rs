use crate::defaults;
use crate::error::{ReadaloudError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub speech: SpeechConfig,
    pub chunker: ChunkerSettings,
    pub generation: GenerationConfig,
    pub playback: PlaybackConfig,
}

/// PlayAI API credentials and endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub api_key: String,
    pub user_id: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

/// Voice and delivery settings, applied session-wide
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    /// Voice identifier; empty means the catalog default.
    pub voice: String,
    pub temperature: f32,
    pub speed: f32,
}

/// Text chunking bounds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkerSettings {
    pub min_size: usize,
    pub max_size: usize,
    pub single_chunk_factor: f32,
}

/// Generation run pacing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub inter_request_delay_ms: u64,
}

/// End-of-track detection thresholds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    pub end_window_ms: u64,
    pub min_play_time_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            user_id: String::new(),
            endpoint: defaults::TTS_ENDPOINT.to_string(),
            timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice: String::new(),
            temperature: defaults::TEMPERATURE,
            speed: defaults::SPEED,
        }
    }
}

impl Default for ChunkerSettings {
    fn default() -> Self {
        Self {
            min_size: defaults::MIN_CHUNK_SIZE,
            max_size: defaults::MAX_CHUNK_SIZE,
            single_chunk_factor: defaults::SINGLE_CHUNK_FACTOR,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            inter_request_delay_ms: defaults::INTER_REQUEST_DELAY.as_millis() as u64,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            end_window_ms: defaults::END_WINDOW.as_millis() as u64,
            min_play_time_ms: defaults::MIN_PLAY_TIME.as_millis() as u64,
        }
    }
}

impl GenerationConfig {
    pub fn inter_request_delay(&self) -> Duration {
        Duration::from_millis(self.inter_request_delay_ms)
    }
}

impl PlaybackConfig {
    pub fn end_window(&self) -> Duration {
        Duration::from_millis(self.end_window_ms)
    }

    pub fn min_play_time(&self) -> Duration {
        Duration::from_millis(self.min_play_time_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values; invalid TOML is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReadaloudError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ReadaloudError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults only when the file is
    /// missing. Invalid TOML or out-of-range values are still errors.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ReadaloudError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents =
            toml::to_string_pretty(self).map_err(|e| ReadaloudError::Other(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - PLAYAI_API_KEY → api.api_key
    /// - PLAYAI_USER_ID → api.user_id
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(defaults::API_KEY_ENV) {
            if !key.is_empty() {
                self.api.api_key = key;
            }
        }

        if let Ok(user) = std::env::var(defaults::USER_ID_ENV) {
            if !user.is_empty() {
                self.api.user_id = user;
            }
        }

        self
    }

    /// Range-check tunables that the service or the chunker would otherwise
    /// reject at a worse time.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.speech.temperature) {
            return Err(ReadaloudError::ConfigInvalidValue {
                key: "speech.temperature".to_string(),
                message: format!("{} is outside 0.0..=1.0", self.speech.temperature),
            });
        }
        if !(0.5..=2.0).contains(&self.speech.speed) {
            return Err(ReadaloudError::ConfigInvalidValue {
                key: "speech.speed".to_string(),
                message: format!("{} is outside 0.5..=2.0", self.speech.speed),
            });
        }
        if self.chunker.min_size == 0 || self.chunker.min_size >= self.chunker.max_size {
            return Err(ReadaloudError::ConfigInvalidValue {
                key: "chunker.min_size".to_string(),
                message: format!(
                    "min_size {} must be nonzero and below max_size {}",
                    self.chunker.min_size, self.chunker.max_size
                ),
            });
        }
        if self.chunker.single_chunk_factor < 1.0 {
            return Err(ReadaloudError::ConfigInvalidValue {
                key: "chunker.single_chunk_factor".to_string(),
                message: format!("{} must be at least 1.0", self.chunker.single_chunk_factor),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/readaloud/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("readaloud")
            .join("config.toml")
    }
}
