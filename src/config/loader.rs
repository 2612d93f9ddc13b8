//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.critiq.toml` in the working directory
//! 4. `~/.config/critiq/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::models::ProviderName;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub review: ReviewConfig,
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
}

/// Review-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Token budget for the code portion of the prompt.
    pub token_budget: usize,
    /// Default focus areas when none are given on the command line.
    pub focus: Vec<String>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            token_budget: constants::DEFAULT_TOKEN_BUDGET,
            focus: Vec::new(),
        }
    }
}

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: constants::DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// LLM provider configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub name: ProviderName,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: ProviderName::Gemini,
            model: "gemini-2.0-flash-lite".to_string(),
            base_url: None,
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, then local config, then applies
    /// environment variable overrides.
    pub fn load(working_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: local config
        if let Some(dir) = working_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for
    /// non-default values).
    fn merge(&mut self, other: Config) {
        let default_review = ReviewConfig::default();
        if other.review.token_budget != default_review.token_budget {
            self.review.token_budget = other.review.token_budget;
        }
        if other.review.focus != default_review.focus {
            self.review.focus = other.review.focus;
        }

        let default_provider = ProviderConfig::default();
        if other.provider.name != default_provider.name {
            self.provider.name = other.provider.name;
        }
        if other.provider.model != default_provider.model {
            self.provider.model = other.provider.model;
        }
        if other.provider.base_url.is_some() {
            self.provider.base_url = other.provider.base_url;
        }
        if other.provider.api_key.is_some() {
            self.provider.api_key = other.provider.api_key;
        }

        let default_cache = CacheConfig::default();
        if other.cache.enabled != default_cache.enabled {
            self.cache.enabled = other.cache.enabled;
        }
        if other.cache.ttl_secs != default_cache.ttl_secs {
            self.cache.ttl_secs = other.cache.ttl_secs;
        }
    }

    /// Apply environment variable overrides.
    ///
    /// `CRITIQ_API_KEY` takes precedence over config-file keys; when no
    /// key is set anywhere, the provider-specific variable (e.g.
    /// `GEMINI_API_KEY`) is consulted as a fallback.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(provider) = env.var(constants::ENV_PROVIDER) {
            if let Ok(name) = provider.parse::<ProviderName>() {
                self.provider.name = name;
            }
        }
        if let Ok(model) = env.var(constants::ENV_MODEL) {
            self.provider.model = model;
        }
        if let Ok(base_url) = env.var(constants::ENV_BASE_URL) {
            self.provider.base_url = Some(base_url);
        }
        if let Ok(api_key) = env.var(constants::ENV_API_KEY) {
            self.provider.api_key = Some(api_key);
        } else if self.provider.api_key.is_none() {
            if let Ok(api_key) = env.var(self.provider.name.api_key_env_var()) {
                self.provider.api_key = Some(api_key);
            }
        }
        if let Ok(ttl) = env.var(constants::ENV_CACHE_TTL) {
            if let Ok(secs) = ttl.trim().parse::<u64>() {
                self.cache.ttl_secs = secs;
            }
        }
    }
}
