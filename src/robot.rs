//! # Robots
//!
//! A robot is one independently loaded handler unit. Every registered robot
//! receives every dispatched event; what it does with it, including which
//! event names it cares about, is entirely its own business.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use crate::cache::SharedCache;
use crate::credentials::CredentialProvider;
use crate::events::Event;

/// A handler unit receiving every dispatched event.
///
/// `receive` is invoked concurrently with the other robots' invocations for
/// the same event. Errors and panics are contained by the dispatcher and
/// never reach sibling robots.
#[async_trait]
pub trait Robot: Send + Sync {
    /// Name used in logs, failure records and dispatch results
    fn name(&self) -> &str;

    /// React to one event
    async fn receive(&self, event: &Event) -> anyhow::Result<()>;

    /// HTTP routes this robot mounts on the server, if any
    fn routes(&self) -> Option<Router> {
        None
    }
}

/// Capabilities injected into every robot at creation.
#[derive(Clone)]
pub struct RobotContext {
    pub cache: SharedCache,
    pub credentials: Arc<dyn CredentialProvider>,
}

impl RobotContext {
    pub fn new(cache: SharedCache, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { cache, credentials }
    }
}

impl std::fmt::Debug for RobotContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RobotContext")
            .field("cache", &self.cache)
            .field("app_id", &self.credentials.app_id())
            .finish()
    }
}
