//! # Unhandled Failures
//!
//! Process-wide safety net. Panics that happen outside a tracked robot
//! invocation are forwarded to the installed failure sink instead of being
//! lost on stderr.
//!
//! Robot invocations run inside [`track`], which marks the task so the panic
//! hook can tell the two apart. The dispatcher reports panics it catches
//! itself; the hook stays silent for those so nothing is reported twice.

use std::any::Any;
use std::future::Future;
use std::sync::{Arc, Once};

use parking_lot::RwLock;

use super::failure_sink::{FailureRecord, FailureSink};

tokio::task_local! {
    static TRACKED_ROBOT: String;
}

static GLOBAL_SINK: RwLock<Option<Arc<dyn FailureSink>>> = RwLock::new(None);
static HOOK_INSTALLED: Once = Once::new();

/// Route otherwise-unobserved failures to `sink`.
///
/// The panic hook is installed once per process; later calls only swap the
/// sink it forwards to.
pub fn install_unhandled_failure_sink(sink: Arc<dyn FailureSink>) {
    *GLOBAL_SINK.write() = Some(sink);

    HOOK_INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if in_tracked_invocation() {
                return;
            }

            let message = panic_message(info.payload());
            let message = match info.location() {
                Some(location) => format!("{message} at {location}"),
                None => message,
            };
            report_unhandled("panic", message);
            previous(info);
        }));
    });
}

/// Forward a failure to the installed sink, or log it if none is installed
pub fn report_unhandled(source: &str, message: impl Into<String>) {
    let record = FailureRecord::unhandled(source, message);

    let sink = GLOBAL_SINK.try_read().and_then(|guard| (*guard).clone());
    match sink {
        Some(sink) => sink.report(record),
        None => tracing::error!(source = %source, message = %record.message(), "Unhandled failure"),
    }
}

/// Run `future` as a tracked invocation of `robot`
pub async fn track<F: Future>(robot: String, future: F) -> F::Output {
    TRACKED_ROBOT.scope(robot, future).await
}

/// The robot whose invocation is currently running on this task, if any
pub fn current_robot() -> Option<String> {
    TRACKED_ROBOT.try_with(Clone::clone).ok()
}

fn in_tracked_invocation() -> bool {
    TRACKED_ROBOT.try_with(|_| ()).is_ok()
}

/// Render a panic payload as text
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
