//! Permy configuration.
//!
//! Configuration can be deserialized from JSON (every field has a default)
//! or loaded from environment variables.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::filters::MiddlewareMode;
use crate::labels::TemplateLabels;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Middleware filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    /// Middleware/filter names whose routes are permission-gated.
    pub fillable: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            fillable: vec!["permy".to_string()],
        }
    }
}

/// Permy configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PermyConfig {
    /// Filter allow-list.
    pub filters: FilterConfig,

    /// Raise catalog persistence failures instead of ignoring them.
    pub debug: bool,

    /// Root of the localization directory tree.
    pub lang_path: PathBuf,

    /// Locale whose catalog is maintained.
    pub locale: String,

    /// Where route middleware is looked up.
    pub middleware_strategy: MiddlewareMode,

    /// Default label templates for new entries.
    pub labels: TemplateLabels,
}

impl Default for PermyConfig {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            debug: false,
            lang_path: PathBuf::from("resources/lang"),
            locale: "en".to_string(),
            middleware_strategy: MiddlewareMode::default(),
            labels: TemplateLabels::default(),
        }
    }
}

impl PermyConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PERMY_FILTERS`: Comma-separated filter names (default: permy)
    /// - `PERMY_DEBUG`: Raise persistence failures (default: false)
    /// - `PERMY_LANG_PATH`: Localization root (default: resources/lang)
    /// - `PERMY_LOCALE`: Catalog locale (default: en)
    /// - `PERMY_MIDDLEWARE`: `route_only` or `controller_options` (default: controller_options)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any `PERMY_*` variable source.
    ///
    /// `lookup` returns the value for a variable name, or `None` when unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        let middleware_strategy = match lookup("PERMY_MIDDLEWARE") {
            Some(s) => MiddlewareMode::parse(&s).ok_or_else(|| ConfigError::InvalidValue {
                key: "PERMY_MIDDLEWARE".to_string(),
                message: format!("unknown middleware strategy '{}'", s),
            })?,
            None => default.middleware_strategy,
        };

        let config = Self {
            filters: FilterConfig {
                fillable: lookup("PERMY_FILTERS")
                    .map(|s| parse_list(&s))
                    .unwrap_or(default.filters.fillable),
            },
            debug: lookup("PERMY_DEBUG")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(default.debug),
            lang_path: lookup("PERMY_LANG_PATH")
                .map(PathBuf::from)
                .unwrap_or(default.lang_path),
            locale: lookup("PERMY_LOCALE").unwrap_or(default.locale),
            middleware_strategy,
            labels: default.labels,
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locale.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "locale".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.filters.fillable.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "filters.fillable".to_string(),
                message: "filter names must not be blank".to_string(),
            });
        }
        Ok(())
    }

    /// Strict mode: persistence failures are returned to the caller.
    pub fn strict(&self) -> bool {
        self.debug
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
