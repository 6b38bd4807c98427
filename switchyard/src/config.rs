//! Configuration loading.
//!
//! Layers, lowest priority first:
//!
//! 1. embedded defaults (`config/default.toml`, compiled into the binary)
//! 2. `switchyard.toml` in the working directory, if present
//! 3. an explicit file passed to [`Settings::load`]
//! 4. environment variables: `SWITCHYARD_<SECTION>__<KEY>`, e.g.
//!    `SWITCHYARD_DISPATCH__DEFAULT_TIMEOUT_MS=5000` or
//!    `SWITCHYARD_DISPATCH__MODES__CRON=first-match`

use crate::{DispatchMode, DispatcherConfig, Kind};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::{collections::HashMap, path::Path, time::Duration};
use thiserror::Error;

/// Embedded default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range or malformed.
    #[error("invalid configuration value `{key}`: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Listener settings.
    pub server: ServerSettings,
    /// Dispatcher tuning.
    pub dispatch: DispatchSettings,
    /// HTTP ingress settings.
    pub http: HttpSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind: String,
}

/// Dispatcher tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchSettings {
    /// Timeout for handlers without their own budget, in milliseconds.
    pub default_timeout_ms: u64,
    /// Fan-out concurrency bound. `0` is unbounded.
    pub max_fanout_concurrency: usize,
    /// Per-kind dispatch mode overrides, keyed by kind tag.
    #[serde(default)]
    pub modes: HashMap<String, String>,
}

/// HTTP ingress settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// Largest accepted request body.
    pub max_body_bytes: usize,
    /// Whether `/docs` and `/docs/openapi.yaml` are served.
    pub docs_enabled: bool,
}

/// Log output.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Settings {
    /// Load settings from every layer.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = defaults().add_source(File::with_name("switchyard").required(false));
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("SWITCHYARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        finish(builder)
    }

    /// The embedded defaults overlaid with a TOML document, ignoring the
    /// environment.
    pub fn from_toml(overrides: &str) -> Result<Self, ConfigError> {
        finish(defaults().add_source(File::from_str(overrides, FileFormat::Toml)))
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind.trim().is_empty() {
            return Err(invalid("server.bind", "must not be empty"));
        }
        if self.dispatch.default_timeout_ms == 0 {
            return Err(invalid("dispatch.default_timeout_ms", "must be greater than zero"));
        }
        if self.http.max_body_bytes == 0 {
            return Err(invalid("http.max_body_bytes", "must be greater than zero"));
        }
        self.dispatch.mode_overrides().map(|_| ())
    }

    /// Build the dispatcher configuration.
    pub fn dispatcher_config(&self) -> Result<DispatcherConfig, ConfigError> {
        let mut config = DispatcherConfig::default()
            .with_default_timeout(Duration::from_millis(self.dispatch.default_timeout_ms));
        if self.dispatch.max_fanout_concurrency > 0 {
            config = config.with_max_fanout_concurrency(self.dispatch.max_fanout_concurrency);
        }
        config.modes = self.dispatch.mode_overrides()?;
        Ok(config)
    }
}

impl DispatchSettings {
    /// Parse the mode overrides into typed kinds and modes.
    pub fn mode_overrides(&self) -> Result<HashMap<Kind, DispatchMode>, ConfigError> {
        self.modes
            .iter()
            .map(|(tag, mode)| {
                let key = format!("dispatch.modes.{tag}");
                let kind = Kind::new(tag.clone()).map_err(|err| invalid(&key, err.to_string()))?;
                let mode = mode.parse::<DispatchMode>().map_err(|err| invalid(&key, err.to_string()))?;
                Ok((kind, mode))
            })
            .collect()
    }
}

fn defaults() -> ConfigBuilder<DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_owned(),
        reason: reason.into(),
    }
}
