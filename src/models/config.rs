use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::params::GenerationParameters;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Where and how to reach the palette engine
    #[serde(default)]
    pub engine: EngineConfig,

    /// Quiet period after the last parameter change before generating
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Memory budget handed to every analysis call
    #[serde(default = "default_analysis_max_memory")]
    pub analysis_max_memory: f64,

    /// Address the HTTP surface binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Parameters the pipeline starts with
    #[serde(default)]
    pub defaults: GenerationParameters,
}

/// Configuration for the engine client
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    /// Base URL of the engine service
    #[serde(default = "default_engine_url")]
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_analysis_max_memory() -> f64 {
    4.0
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_engine_url() -> String {
    "http://127.0.0.1:8700".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_engine_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            debounce_ms: default_debounce_ms(),
            analysis_max_memory: default_analysis_max_memory(),
            bind_addr: default_bind_addr(),
            defaults: GenerationParameters::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults.
    ///
    /// A missing or unparseable file is logged and never fatal. Starting
    /// parameters that fail validation are replaced by the built-in ones.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file configured, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(mut config) => {
                    if let Err(e) = config.defaults.validate() {
                        tracing::warn!(
                            %e,
                            path = %path.display(),
                            "Invalid default parameters, using built-in defaults"
                        );
                        config.defaults = GenerationParameters::default();
                    }
                    tracing::info!(
                        path = %path.display(),
                        engine = %config.engine.url,
                        debounce_ms = config.debounce_ms,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        %e,
                        path = %path.display(),
                        "Failed to parse config, using defaults"
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    %e,
                    path = %path.display(),
                    "Failed to read config, using defaults"
                );
                Self::default()
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.engine.timeout_secs)
    }
}
