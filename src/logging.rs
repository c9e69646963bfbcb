//! # Structured Logging Module
//!
//! Console logging through the tracing ecosystem. Output is human-readable by
//! default and switches to JSON lines for log shippers.
//!
//! The configured level is a filter directive; `RUST_LOG`, when set, wins.
//!
//! Error-level events are also forwarded to Sentry once
//! [`init_error_reporting`] has bound a client. Without one, the Sentry layer
//! is inert.

use std::io::IsTerminal;
use std::sync::OnceLock;

use chrono::Utc;
use sentry_tracing::{EventFilter, SentryLayer};
use tracing::{Level, Subscriber};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::config::{LogFormat, LoggingConfig};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging. Later calls are no-ops.
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = build_filter(&config.log_level);

        let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_filter(filter)
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(std::io::stdout().is_terminal())
                .with_filter(filter)
                .boxed(),
        };

        // Use try_init to avoid panic if global subscriber already set
        let subscriber = tracing_subscriber::registry()
            .with(layer)
            .with(sentry_layer());
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            pid = std::process::id(),
            level = %config.log_level,
            format = ?config.log_format,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Start reporting to Sentry when `dsn` is set.
///
/// The returned guard flushes queued events when dropped; hold it for the
/// life of the process. A malformed DSN is logged and reporting stays off.
pub fn init_error_reporting(dsn: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let dsn = dsn.map(str::trim).filter(|dsn| !dsn.is_empty())?;
    let dsn: sentry::types::Dsn = match dsn.parse() {
        Ok(dsn) => dsn,
        Err(e) => {
            log_error("logging", "init_error_reporting", &e.to_string(), None);
            return None;
        }
    };

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!(enabled = guard.is_enabled(), "🛰️ ERROR REPORTING: Sentry client bound");
    Some(guard)
}

/// Errors become Sentry events; warnings and info become breadcrumbs
fn sentry_layer<S>() -> SentryLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
        Level::ERROR => EventFilter::Event,
        Level::WARN | Level::INFO => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    })
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log structured data for registry operations
pub fn log_registry_operation(
    operation: &str,
    robot: &str,
    position: Option<usize>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        robot = %robot,
        position = position,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "📚 REGISTRY_OPERATION"
    );
}

/// Log structured data for a completed dispatch
pub fn log_dispatch_operation(
    event_name: Option<&str>,
    delivery_id: Option<&str>,
    handlers: usize,
    failures: usize,
    duration_ms: u64,
) {
    tracing::debug!(
        event_name = event_name,
        delivery_id = delivery_id,
        handlers = handlers,
        failures = failures,
        duration_ms = duration_ms,
        "📬 DISPATCH_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "❌ ERROR"
    );
}
