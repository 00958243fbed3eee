//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Whisper transcription settings
    #[serde(default)]
    pub whisper: WhisperSettings,

    /// Speaker diarization settings
    #[serde(default)]
    pub diarization: DiarizationSettings,

    /// Zero-shot classifier settings
    #[serde(default)]
    pub classifier: ClassifierSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Data directory for downloaded models
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Path to the ffmpeg binary (empty = resolve from PATH)
    #[serde(default)]
    pub ffmpeg_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSettings {
    /// Whisper model to use (tiny, base, small, medium, large)
    #[serde(default = "default_model")]
    pub model: String,

    /// Path to model files directory
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Language for transcription (empty = auto-detect)
    #[serde(default)]
    pub language: String,

    /// Number of threads for inference (0 = auto)
    #[serde(default)]
    pub threads: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationSettings {
    /// AssemblyAI API key (empty = diarization unavailable, alternating
    /// speaker fallback is used instead)
    #[serde(default)]
    pub api_key: String,

    /// API endpoint
    #[serde(default = "default_diarization_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_remote_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum time to wait for the remote transcript to finish, in seconds
    #[serde(default = "default_poll_deadline_secs")]
    pub poll_deadline_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSettings {
    /// Hugging Face API token
    #[serde(default)]
    pub api_key: String,

    /// Zero-shot classification model
    #[serde(default = "default_classifier_model")]
    pub model: String,

    /// API endpoint
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_remote_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "callscribe", "callscribe")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/callscribe"))
}

fn default_models_dir() -> PathBuf {
    let mut dir = default_data_dir();
    dir.push("models");
    dir
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model() -> String {
    "base".to_string()
}

fn default_diarization_endpoint() -> String {
    "https://api.assemblyai.com/v2".to_string()
}

fn default_classifier_model() -> String {
    "facebook/bart-large-mnli".to_string()
}

fn default_classifier_endpoint() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_remote_timeout_secs() -> u64 {
    30
}

fn default_poll_deadline_secs() -> u64 {
    600
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            ffmpeg_path: String::new(),
        }
    }
}

impl Default for WhisperSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            models_dir: default_models_dir(),
            language: String::new(),
            threads: 0,
        }
    }
}

impl Default for DiarizationSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_diarization_endpoint(),
            timeout_secs: default_remote_timeout_secs(),
            poll_deadline_secs: default_poll_deadline_secs(),
        }
    }
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_classifier_model(),
            endpoint: default_classifier_endpoint(),
            timeout_secs: default_remote_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            whisper: WhisperSettings::default(),
            diarization: DiarizationSettings::default(),
            classifier: ClassifierSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides for secrets.
    fn apply_env_overrides(&mut self) {
        if self.diarization.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("ASSEMBLYAI_API_KEY") {
                if !key.trim().is_empty() {
                    self.diarization.api_key = key;
                }
            }
        }

        if self.classifier.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("HF_API_TOKEN") {
                if !key.trim().is_empty() {
                    self.classifier.api_key = key;
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "callscribe", "callscribe")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to a whisper model file
    pub fn model_path(&self) -> PathBuf {
        self.whisper
            .models_dir
            .join(format!("ggml-{}.bin", self.whisper.model))
    }
}
