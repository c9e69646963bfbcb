//! # Failure Sink
//!
//! Collector for failures nobody else is positioned to handle: robot errors
//! captured during dispatch, transport rejections, and panics outside any
//! robot invocation. Reporting is best-effort and returns nothing; a sink
//! must never panic.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::{HandlerError, TransportError};
use crate::logging::log_error;

/// What went wrong
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// A robot's invocation failed during dispatch
    Handler {
        robot: String,
        event_name: Option<String>,
        delivery_id: Option<String>,
        #[serde(serialize_with = "serialize_display")]
        error: HandlerError,
    },
    /// A failure outside any tracked robot invocation
    Unhandled { source: String, message: String },
    /// An inbound delivery was rejected before dispatch
    Transport {
        #[serde(serialize_with = "serialize_display")]
        error: TransportError,
        delivery_id: Option<String>,
    },
}

fn serialize_display<T: std::fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: FailureKind,
}

impl FailureRecord {
    pub fn new(kind: FailureKind) -> Self {
        Self {
            occurred_at: Utc::now(),
            kind,
        }
    }

    pub fn handler(
        robot: impl Into<String>,
        event_name: Option<&str>,
        delivery_id: Option<&str>,
        error: HandlerError,
    ) -> Self {
        Self::new(FailureKind::Handler {
            robot: robot.into(),
            event_name: event_name.map(str::to_string),
            delivery_id: delivery_id.map(str::to_string),
            error,
        })
    }

    pub fn unhandled(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unhandled {
            source: source.into(),
            message: message.into(),
        })
    }

    pub fn transport(error: TransportError, delivery_id: Option<&str>) -> Self {
        Self::new(FailureKind::Transport {
            error,
            delivery_id: delivery_id.map(str::to_string),
        })
    }

    /// The robot a handler failure is attributed to
    pub fn robot(&self) -> Option<&str> {
        match &self.kind {
            FailureKind::Handler { robot, .. } => Some(robot),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            FailureKind::Handler { error, .. } => error.to_string(),
            FailureKind::Unhandled { message, .. } => message.clone(),
            FailureKind::Transport { error, .. } => error.to_string(),
        }
    }
}

/// Destination for failure records
pub trait FailureSink: Send + Sync {
    fn report(&self, record: FailureRecord);
}

/// Logs every record at error level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFailureSink;

impl FailureSink for TracingFailureSink {
    fn report(&self, record: FailureRecord) {
        match &record.kind {
            FailureKind::Handler {
                robot,
                event_name,
                delivery_id,
                error,
            } => {
                tracing::error!(
                    robot = %robot,
                    event_name = event_name.as_deref(),
                    delivery_id = delivery_id.as_deref(),
                    panicked = error.is_panic(),
                    error = %error,
                    "Robot failed to handle event"
                );
            }
            FailureKind::Unhandled { source, message } => {
                log_error(source, "unhandled", message, None);
            }
            FailureKind::Transport { error, delivery_id } => {
                tracing::error!(
                    delivery_id = delivery_id.as_deref(),
                    error = %error,
                    "Webhook delivery rejected"
                );
            }
        }
    }
}

/// Keeps every record in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingFailureSink {
    records: Mutex<Vec<FailureRecord>>,
}

impl RecordingFailureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FailureRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Handler failures attributed to `robot`
    pub fn failures_for(&self, robot: &str) -> Vec<FailureRecord> {
        self.records
            .lock()
            .iter()
            .filter(|record| record.robot() == Some(robot))
            .cloned()
            .collect()
    }
}

impl FailureSink for RecordingFailureSink {
    fn report(&self, record: FailureRecord) {
        self.records.lock().push(record);
    }
}
