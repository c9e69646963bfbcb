//! Error types for the hookbot system.
//!

use thiserror::Error;

/// Errors raised by bootstrap, configuration and the transport layer.
///
/// Handler failures never surface as a `HookbotError`; they are captured per
/// robot as a [`HandlerError`] inside the dispatch result.
#[derive(Debug, Error)]
pub enum HookbotError {
    /// A named plugin source has no entry in the loader table
    #[error("Unknown plugin '{name}' (available: {available:?})")]
    UnknownPlugin {
        name: String,
        available: Vec<String>,
    },
    /// A plugin factory failed while constructing its robot
    #[error("Plugin '{name}' failed to initialize: {reason}")]
    PluginInit { name: String, reason: String },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Credentials error: {0}")]
    Credentials(String),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl From<config::ConfigError> for HookbotError {
    fn from(error: config::ConfigError) -> Self {
        HookbotError::Configuration(error.to_string())
    }
}

/// Failures detected while accepting an inbound webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("missing signature header")]
    MissingSignature,
    #[error("signature does not match payload")]
    InvalidSignature,
    #[error("missing event name header")]
    MissingEventName,
    #[error("payload is not valid JSON: {0}")]
    InvalidPayload(String),
}

/// The failure value recorded for a single robot invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The robot's `receive` returned an error
    #[error("handler failed: {0}")]
    Failed(String),
    /// The robot's `receive` panicked; the panic was contained
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    pub fn message(&self) -> &str {
        match self {
            HandlerError::Failed(msg) | HandlerError::Panicked(msg) => msg,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, HandlerError::Panicked(_))
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(error: anyhow::Error) -> Self {
        HandlerError::Failed(format!("{error:#}"))
    }
}

pub type HookbotResult<T> = std::result::Result<T, HookbotError>;
