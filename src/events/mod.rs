pub mod normalizer;
pub mod types;

// Re-export key types for convenience
pub use normalizer::{normalize, InboundEvent, LegacyEvent};
pub use types::Event;
