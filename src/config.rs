//! # Configuration
//!
//! Layered configuration loaded through the `config` crate:
//!
//! 1. built-in defaults (`HookbotConfig::default()`)
//! 2. an optional file (TOML, YAML or JSON, picked by extension)
//! 3. environment variables prefixed with `HOOKBOT_`
//!
//! Nested keys use a double underscore, e.g. `HOOKBOT_LOGGING__LOG_LEVEL=debug`.
//! `HOOKBOT_PLUGINS` takes a comma-separated list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HookbotError, HookbotResult};

pub const ENV_PREFIX: &str = "HOOKBOT";

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookbotConfig {
    /// App identifier used for outbound authentication
    pub app_id: Option<u64>,
    /// PEM-encoded private key, inline
    pub private_key: Option<String>,
    /// Path to the PEM-encoded private key; ignored when `private_key` is set
    pub private_key_path: Option<PathBuf>,
    /// Shared secret used to verify webhook signatures
    pub webhook_secret: String,
    /// Route that receives webhook deliveries
    pub webhook_path: String,
    pub port: u16,
    /// Lifetime of shared cache entries
    pub cache_ttl_secs: u64,
    /// Plugins to load in addition to the built-ins
    pub plugins: Vec<String>,
    /// Sentry DSN; error-level records are reported there when set
    pub sentry_dsn: Option<String>,
    pub logging: LoggingConfig,
}

impl Default for HookbotConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            private_key: None,
            private_key_path: None,
            webhook_secret: "development".to_string(),
            webhook_path: "/".to_string(),
            port: 3000,
            cache_ttl_secs: 60 * 60,
            plugins: Vec::new(),
            sentry_dsn: None,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `hookbot=trace,tower_http=warn`
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl HookbotConfig {
    /// Load from an optional file plus the process environment
    pub fn load(path: Option<&Path>) -> HookbotResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Load with an explicit environment map instead of the process environment.
    ///
    /// Keys in `env` use the same `HOOKBOT_` names as real environment variables.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> HookbotResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("plugins")
                .try_parsing(true)
                .source(env),
        );

        let config: HookbotConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            config = %config.sanitized(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    pub fn validate(&self) -> HookbotResult<()> {
        if self.port == 0 {
            return Err(HookbotError::Configuration(
                "port must be greater than zero".to_string(),
            ));
        }
        if !self.webhook_path.starts_with('/') {
            return Err(HookbotError::Configuration(format!(
                "webhook_path must start with '/', got '{}'",
                self.webhook_path
            )));
        }
        if self.webhook_secret.is_empty() {
            return Err(HookbotError::Configuration(
                "webhook_secret must not be empty".to_string(),
            ));
        }
        if self.cache_ttl_secs == 0 {
            return Err(HookbotError::Configuration(
                "cache_ttl_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(dsn) = self.sentry_dsn.as_deref().filter(|dsn| !dsn.trim().is_empty()) {
            dsn.trim()
                .parse::<sentry::types::Dsn>()
                .map_err(|e| HookbotError::Configuration(format!("invalid sentry_dsn: {e}")))?;
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// JSON view of the configuration with secrets masked, for logging
    pub fn sanitized(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let Some(object) = value.as_object_mut() {
            for key in ["webhook_secret", "private_key", "sentry_dsn"] {
                if object.get(key).is_some_and(|v| !v.is_null()) {
                    object.insert(key.to_string(), serde_json::json!("***"));
                }
            }
        }
        value
    }
}

impl std::fmt::Debug for HookbotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HookbotConfig({})", self.sanitized())
    }
}
