//! # Credential Provider
//!
//! Robots receive a credential provider at creation so they can authenticate
//! outbound calls. The dispatch core never looks inside it; it only threads
//! the configured app identity through to each robot.

use std::sync::Arc;

use crate::config::HookbotConfig;
use crate::error::{HookbotError, HookbotResult};

/// Authentication material for one outbound call
#[derive(Clone)]
pub struct AuthContext {
    pub app_id: u64,
    pub installation_id: Option<u64>,
    pub private_key: Option<Arc<str>>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("app_id", &self.app_id)
            .field("installation_id", &self.installation_id)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Supplies authentication context to robots.
pub trait CredentialProvider: Send + Sync {
    /// The configured app id, if any
    fn app_id(&self) -> Option<u64>;

    /// Authentication context for acting as the app, or as one installation of it
    fn auth_context(&self, installation_id: Option<u64>) -> HookbotResult<AuthContext>;
}

/// Credentials taken from configuration.
#[derive(Clone, Default)]
pub struct AppCredentials {
    app_id: Option<u64>,
    private_key: Option<Arc<str>>,
}

impl AppCredentials {
    pub fn new(app_id: Option<u64>, private_key: Option<String>) -> Self {
        Self {
            app_id,
            private_key: private_key.map(Arc::from),
        }
    }

    /// Build from configuration, reading the key file when only a path is given
    pub fn from_config(config: &HookbotConfig) -> HookbotResult<Self> {
        let private_key = match (&config.private_key, &config.private_key_path) {
            (Some(key), _) => Some(key.clone()),
            (None, Some(path)) => Some(std::fs::read_to_string(path).map_err(|e| {
                HookbotError::Credentials(format!(
                    "Failed to read private key {}: {e}",
                    path.display()
                ))
            })?),
            (None, None) => None,
        };

        Ok(Self::new(config.app_id, private_key))
    }

    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }
}

impl CredentialProvider for AppCredentials {
    fn app_id(&self) -> Option<u64> {
        self.app_id
    }

    fn auth_context(&self, installation_id: Option<u64>) -> HookbotResult<AuthContext> {
        let app_id = self.app_id.ok_or_else(|| {
            HookbotError::Credentials("No app id configured".to_string())
        })?;

        Ok(AuthContext {
            app_id,
            installation_id,
            private_key: self.private_key.clone(),
        })
    }
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}
