//! # Event Dispatch
//!
//! ```text
//! Event ──▶ Dispatcher ──join_all──▶ robot₀ … robotₙ
//!               │                        │
//!               ▼                        ▼ (error / panic)
//!         DispatchResult            FailureSink
//! ```

pub mod dispatcher;
pub mod failure_sink;
pub mod unhandled;

pub use dispatcher::{DispatchResult, Dispatcher, HandlerOutcome};
pub use failure_sink::{
    FailureKind, FailureRecord, FailureSink, RecordingFailureSink, TracingFailureSink,
};
pub use unhandled::{install_unhandled_failure_sink, report_unhandled};
