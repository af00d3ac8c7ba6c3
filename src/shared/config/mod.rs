//! Application configuration module
//!
//! Configuration is layered:
//!
//! 1. Built-in defaults (suitable for local development)
//! 2. An optional TOML file named by `STAMPBOOK_CONFIG`
//! 3. Environment variables (a `.env` file is loaded by the server binary)
//!
//! Collaborator credentials are optional. A missing key disables the
//! collaborator instead of aborting startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::pages::SeedPolicy;

/// Environment variable naming the TOML configuration file
pub const CONFIG_PATH_ENV: &str = "STAMPBOOK_CONFIG";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// TCP port the server binds on all interfaces
    pub port: u16,
    /// PostgreSQL URL; in-memory store and identity when unset
    pub database_url: Option<String>,
    /// Externally visible base URL, used to build media links
    pub public_base_url: String,
    /// Directory backing the local object store
    pub media_dir: PathBuf,
    pub hyperbolic_api_key: Option<String>,
    pub hyperbolic_base_url: String,
    pub image_model: String,
    pub vision_model: String,
    pub google_api_key: Option<String>,
    pub places_base_url: String,
    /// Model name passed to genai for attraction suggestions
    pub suggestion_model: String,
    /// Attractions requested per recommendation
    pub attraction_count: usize,
    pub seed_policy: SeedPolicy,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: None,
            public_base_url: "http://127.0.0.1:3000".to_string(),
            media_dir: PathBuf::from("media"),
            hyperbolic_api_key: None,
            hyperbolic_base_url: "https://api.hyperbolic.xyz".to_string(),
            image_model: "FLUX.1-dev".to_string(),
            vision_model: "meta-llama/Llama-3.2-90B-Vision-Instruct".to_string(),
            google_api_key: None,
            places_base_url: "https://places.googleapis.com".to_string(),
            suggestion_model: "gpt-4o-mini".to_string(),
            attraction_count: 5,
            seed_policy: SeedPolicy::Append,
            http_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load defaults, then the TOML file (if any), then the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file; absent keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Override fields from environment variables found through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                value: port,
            })?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(url) = lookup("PUBLIC_BASE_URL") {
            self.public_base_url = url;
        }
        if let Some(dir) = lookup("MEDIA_DIR") {
            self.media_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("HYPERBOLIC_API_KEY") {
            self.hyperbolic_api_key = Some(key);
        }
        if let Some(url) = lookup("HYPERBOLIC_BASE_URL") {
            self.hyperbolic_base_url = url;
        }
        if let Some(model) = lookup("IMAGE_MODEL") {
            self.image_model = model;
        }
        if let Some(model) = lookup("VISION_MODEL") {
            self.vision_model = model;
        }
        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.google_api_key = Some(key);
        }
        if let Some(url) = lookup("PLACES_BASE_URL") {
            self.places_base_url = url;
        }
        if let Some(model) = lookup("SUGGESTION_MODEL") {
            self.suggestion_model = model;
        }
        if let Some(count) = lookup("ATTRACTION_COUNT") {
            self.attraction_count = count.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ATTRACTION_COUNT",
                value: count,
            })?;
        }
        if let Some(policy) = lookup("SEED_POLICY") {
            self.seed_policy = policy.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SEED_POLICY",
                value: policy,
            })?;
        }
        if let Some(secs) = lookup("HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HTTP_TIMEOUT_SECS",
                value: secs,
            })?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.public_base_url.starts_with("http://") && !self.public_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(self.public_base_url.clone()));
        }
        for url in [&self.hyperbolic_base_url, &self.places_base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }
        if self.attraction_count == 0 || self.attraction_count > 20 {
            return Err(ConfigError::InvalidValue {
                key: "attraction_count",
                value: self.attraction_count.to_string(),
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::MissingValue("http_timeout_secs"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn public_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.public_base_url = url.into();
        self
    }

    pub fn media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.media_dir = dir.into();
        self
    }

    pub fn hyperbolic_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.hyperbolic_api_key = Some(key.into());
        self
    }

    pub fn google_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.google_api_key = Some(key.into());
        self
    }

    pub fn attraction_count(mut self, count: usize) -> Self {
        self.config.attraction_count = count;
        self
    }

    pub fn seed_policy(mut self, policy: SeedPolicy) -> Self {
        self.config.seed_policy = policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}
