//! # Plugin Loader
//!
//! Resolves plugin sources into robots.
//!
//! ## Overview
//!
//! A source is either a name looked up in a closed table of factories, or a
//! factory supplied directly by the caller. The table is fixed once the
//! loader is built: unknown names fail with [`HookbotError::UnknownPlugin`]
//! instead of being searched for at runtime.
//!
//! ## Usage
//!
//! ```rust
//! use hookbot::registry::loader::{PluginLoader, PluginSource};
//!
//! let loader = PluginLoader::with_builtins();
//! assert!(loader.resolve(&PluginSource::named("stats")).is_ok());
//! assert!(loader.resolve(&PluginSource::named("autolabel")).is_err());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{HookbotError, HookbotResult};
use crate::plugins;
use crate::robot::{Robot, RobotContext};

/// Constructs a robot from the injected capabilities
pub type PluginFactory =
    Arc<dyn Fn(&RobotContext) -> anyhow::Result<Arc<dyn Robot>> + Send + Sync>;

/// Where a robot comes from
#[derive(Clone)]
pub enum PluginSource {
    /// Looked up in the loader's factory table
    Named(String),
    /// Supplied directly; `name` identifies it in logs and results
    Factory {
        name: String,
        factory: PluginFactory,
    },
}

impl PluginSource {
    pub fn named(name: impl Into<String>) -> Self {
        PluginSource::Named(name.into())
    }

    pub fn factory<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&RobotContext) -> anyhow::Result<Arc<dyn Robot>> + Send + Sync + 'static,
    {
        PluginSource::Factory {
            name: name.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PluginSource::Named(name) | PluginSource::Factory { name, .. } => name,
        }
    }
}

impl From<&str> for PluginSource {
    fn from(name: &str) -> Self {
        PluginSource::named(name)
    }
}

impl From<String> for PluginSource {
    fn from(name: String) -> Self {
        PluginSource::Named(name)
    }
}

impl std::fmt::Debug for PluginSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginSource::Named(name) => f.debug_tuple("Named").field(name).finish(),
            PluginSource::Factory { name, .. } => f
                .debug_struct("Factory")
                .field("name", name)
                .finish_non_exhaustive(),
        }
    }
}

/// Closed table of named plugin factories
#[derive(Clone, Default)]
pub struct PluginLoader {
    factories: HashMap<String, PluginFactory>,
}

impl PluginLoader {
    /// An empty loader; only directly supplied factories resolve
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader knowing every plugin shipped with this crate
    pub fn with_builtins() -> Self {
        plugins::available_plugins()
            .into_iter()
            .fold(Self::new(), |loader, (name, factory)| {
                loader.with_factory(name, factory)
            })
    }

    /// Add a named plugin to the table
    pub fn with_plugin<F>(self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&RobotContext) -> anyhow::Result<Arc<dyn Robot>> + Send + Sync + 'static,
    {
        self.with_factory(name, Arc::new(factory))
    }

    pub fn with_factory(mut self, name: impl Into<String>, factory: PluginFactory) -> Self {
        self.factories.insert(name.into(), factory);
        self
    }

    /// Names that resolve, sorted
    pub fn available(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Find the factory for a source
    pub fn resolve(&self, source: &PluginSource) -> HookbotResult<PluginFactory> {
        match source {
            PluginSource::Factory { factory, .. } => Ok(factory.clone()),
            PluginSource::Named(name) => {
                self.factories
                    .get(name)
                    .cloned()
                    .ok_or_else(|| HookbotError::UnknownPlugin {
                        name: name.clone(),
                        available: self.available(),
                    })
            }
        }
    }

    /// Resolve a source and construct its robot
    pub fn load(
        &self,
        source: &PluginSource,
        context: &RobotContext,
    ) -> HookbotResult<Arc<dyn Robot>> {
        let factory = self.resolve(source)?;
        debug!(plugin = %source.name(), "Constructing robot");

        factory(context).map_err(|e| HookbotError::PluginInit {
            name: source.name().to_string(),
            reason: format!("{e:#}"),
        })
    }
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLoader")
            .field("plugins", &self.available())
            .finish()
    }
}
