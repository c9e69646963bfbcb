//! # Built-in Robots
//!
//! Robots shipped with the crate. `stats` and `default` are always loaded by
//! bootstrap, in that order; `event-log` is opt-in by name.

pub mod default;
pub mod event_log;
pub mod stats;

use std::sync::Arc;

use crate::registry::PluginFactory;

pub use default::DefaultRobot;
pub use event_log::EventLogRobot;
pub use stats::{RepositoryStats, StatsRobot, StatsSnapshot};

/// Loaded ahead of any caller-supplied plugin, in this order
pub const BUILTIN_PLUGINS: &[&str] = &[stats::PLUGIN_NAME, default::PLUGIN_NAME];

/// Every named plugin this crate can construct
pub fn available_plugins() -> Vec<(&'static str, PluginFactory)> {
    vec![
        (stats::PLUGIN_NAME, Arc::new(StatsRobot::from_context) as PluginFactory),
        (default::PLUGIN_NAME, Arc::new(DefaultRobot::from_context) as PluginFactory),
        (event_log::PLUGIN_NAME, Arc::new(EventLogRobot::from_context) as PluginFactory),
    ]
}
