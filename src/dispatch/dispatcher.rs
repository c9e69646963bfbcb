//! # Dispatcher
//!
//! Fans one event out to every registered robot and waits for all of them.
//!
//! ## Overview
//!
//! Invocations are driven concurrently on the calling task with
//! [`join_all`]. Each one is wrapped in `catch_unwind` and run as a tracked
//! invocation, so an error or panic in one robot is captured in its own
//! outcome slot and reported to the failure sink, while the others carry on.
//!
//! The result is produced only once every invocation has settled. There is
//! no timeout: a robot that never completes holds the dispatch open.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use futures::FutureExt;
use tracing::Instrument;

use super::failure_sink::{FailureRecord, FailureSink};
use super::unhandled::{panic_message, track};
use crate::error::HandlerError;
use crate::events::Event;
use crate::logging::log_dispatch_operation;
use crate::registry::{HandlerRegistry, RegisteredRobot};

/// How one robot fared with one event
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOutcome {
    pub robot: String,
    pub result: Result<(), HandlerError>,
}

impl HandlerOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&HandlerError> {
        self.result.as_ref().err()
    }
}

/// Outcomes of one dispatch, index-aligned with registration order
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub outcomes: Vec<HandlerOutcome>,
}

impl DispatchResult {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(HandlerOutcome::is_success)
    }

    /// Failed slots with their index
    pub fn failures(&self) -> impl Iterator<Item = (usize, &HandlerOutcome)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter(|(_, outcome)| !outcome.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    sink: Arc<dyn FailureSink>,
}

impl Dispatcher {
    pub fn new(registry: Arc<HandlerRegistry>, sink: Arc<dyn FailureSink>) -> Self {
        Self { registry, sink }
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Invoke every registered robot with `event` and collect the outcomes.
    ///
    /// Never fails: robot errors and panics end up in the result and in the
    /// failure sink, once each.
    pub async fn dispatch(&self, event: &Event) -> DispatchResult {
        let snapshot = self.registry.all();
        let started = Instant::now();
        let span = tracing::info_span!(
            "dispatch",
            event_name = event.name(),
            delivery_id = event.id()
        );

        let invocations = snapshot.iter().map(|entry| self.invoke(entry, event));
        let outcomes = join_all(invocations).instrument(span).await;

        let result = DispatchResult { outcomes };
        log_dispatch_operation(
            event.name(),
            event.id(),
            result.len(),
            result.failure_count(),
            started.elapsed().as_millis() as u64,
        );
        result
    }

    async fn invoke(&self, entry: &RegisteredRobot, event: &Event) -> HandlerOutcome {
        // Calling `receive` can itself panic, so it happens on first poll
        let invocation =
            AssertUnwindSafe(async { entry.robot.receive(event).await }).catch_unwind();

        let result = match track(entry.name.clone(), invocation).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(HandlerError::from(error)),
            Err(payload) => Err(HandlerError::Panicked(panic_message(payload.as_ref()))),
        };

        if let Err(error) = &result {
            self.sink.report(FailureRecord::handler(
                &entry.name,
                event.name(),
                event.id(),
                error.clone(),
            ));
        }

        HandlerOutcome {
            robot: entry.name.clone(),
            result,
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
