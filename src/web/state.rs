//! # Web Application State
//!
//! Shared state handed to the webhook handler.

use std::sync::Arc;

use crate::dispatch::{Dispatcher, FailureSink};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub sink: Arc<dyn FailureSink>,
    pub webhook_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        dispatcher: Dispatcher,
        sink: Arc<dyn FailureSink>,
        webhook_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            dispatcher,
            sink,
            webhook_secret: webhook_secret.into(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("dispatcher", &self.dispatcher)
            .field("webhook_secret", &"***")
            .finish()
    }
}
