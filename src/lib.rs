#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Hookbot Core
//!
//! Webhook event dispatch to independently loaded robots.
//!
//! ## Overview
//!
//! A delivery arrives over HTTP, is verified and normalized into an
//! [`Event`], and is handed to every registered [`Robot`] at once. Robots run
//! concurrently and in isolation: one robot's error or panic is captured in
//! its own slot of the [`DispatchResult`] and reported to the
//! [`FailureSink`], and never disturbs the others.
//!
//! ## Architecture
//!
//! ```text
//! Bootstrap ──▶ PluginLoader ──▶ HandlerRegistry
//!                                      │ snapshot
//! HTTP ──▶ signature ──▶ normalize ──▶ Dispatcher ──join_all──▶ robots
//!                                      │
//!                                      ▼
//!                            DispatchResult / FailureSink
//! ```
//!
//! ## Module Organization
//!
//! - [`events`] - Canonical event type and legacy-shape normalization
//! - [`registry`] - Plugin loader and append-only handler registry
//! - [`dispatch`] - Concurrent dispatch, failure sinks, unhandled-panic hook
//! - [`bootstrap`] - The [`Hookbot`] handle wiring it all together
//! - [`plugins`] - Built-in robots (`stats`, `default`, `event-log`)
//! - [`web`] - axum transport
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging
//! - [`error`] - Error taxonomy
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hookbot::{Hookbot, HookbotConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HookbotConfig::load(None)?;
//! let app = Hookbot::new(config)?;
//! app.setup(["event-log"])?;
//! app.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod logging;
pub mod plugins;
pub mod registry;
pub mod robot;
pub mod web;

pub use bootstrap::Hookbot;
pub use cache::SharedCache;
pub use crate::config::{HookbotConfig, LogFormat, LoggingConfig};
pub use credentials::{AppCredentials, AuthContext, CredentialProvider};
pub use dispatch::{
    DispatchResult, Dispatcher, FailureKind, FailureRecord, FailureSink, HandlerOutcome,
    RecordingFailureSink, TracingFailureSink,
};
pub use error::{HandlerError, HookbotError, HookbotResult, TransportError};
pub use events::{normalize, Event, InboundEvent};
pub use registry::{HandlerRegistry, PluginLoader, PluginSource};
pub use robot::{Robot, RobotContext};
