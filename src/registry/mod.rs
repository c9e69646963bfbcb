//! # Registry Infrastructure
//!
//! Where robots come from and where they live once loaded.
//!
//! ## Architecture
//!
//! ```text
//! Registry Infrastructure
//! ├── PluginLoader      (source identifier → robot factory)
//! └── HandlerRegistry   (ordered, append-only robot collection)
//! ```

pub mod handler_registry;
pub mod loader;

// Re-export main types for easy access
pub use handler_registry::{HandlerRegistry, RegisteredRobot, RegistrySnapshot};
pub use loader::{PluginFactory, PluginLoader, PluginSource};
