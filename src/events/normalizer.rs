//! # Event Normalizer
//!
//! Inbound records arrive in one of two shapes. Older callers name the event
//! with an `event` field; the current shape uses `name`. [`InboundEvent`]
//! captures that distinction once, at the boundary, and [`normalize`] turns
//! either shape into the canonical [`Event`] handed to the dispatcher.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::types::Event;

/// A raw inbound event record, before normalization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InboundEvent {
    /// `{event, payload}`: the deprecated shape
    Legacy(LegacyEvent),
    /// `{name, payload}`: already canonical
    Canonical(Event),
}

/// The deprecated record shape, identified by its `event` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyEvent {
    pub event: String,
    /// Overwritten by `event` during normalization when both are present
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub payload: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InboundEvent {
    /// Parse a raw JSON record into whichever shape it carries
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, InboundEvent::Legacy(_))
    }
}

impl From<Event> for InboundEvent {
    fn from(event: Event) -> Self {
        InboundEvent::Canonical(event)
    }
}

impl From<LegacyEvent> for InboundEvent {
    fn from(event: LegacyEvent) -> Self {
        InboundEvent::Legacy(event)
    }
}

/// Produce the canonical event for a raw record.
///
/// Legacy records have their `event` value moved into `name` and emit a
/// deprecation warning. Canonical records, including ones with no name at
/// all, come back untouched. This never fails.
pub fn normalize(raw: InboundEvent) -> Event {
    match raw {
        InboundEvent::Canonical(event) => event,
        InboundEvent::Legacy(legacy) => {
            warn!(
                event = %legacy.event,
                "DEPRECATED: receive({{event, payload}}) is now receive({{name, payload}})"
            );
            Event {
                name: Some(legacy.event),
                id: legacy.id,
                payload: legacy.payload,
                extra: legacy.extra,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn normalize_capturing(raw: InboundEvent) -> (Event, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let event = tracing::subscriber::with_default(subscriber, || normalize(raw));
        (event, logs.contents())
    }

    #[test]
    fn test_legacy_record_is_renamed() {
        let raw = InboundEvent::from_value(json!({
            "event": "push",
            "payload": {"ref": "refs/heads/main"}
        }))
        .unwrap();
        assert!(raw.is_legacy());

        let event = normalize(raw);
        assert_eq!(event, Event::new("push", json!({"ref": "refs/heads/main"})));
    }

    #[test]
    fn test_legacy_field_wins_over_name() {
        let raw = InboundEvent::from_value(json!({
            "event": "issues",
            "name": "stale",
            "payload": {}
        }))
        .unwrap();

        assert_eq!(normalize(raw).name(), Some("issues"));
    }

    #[test]
    fn test_canonical_record_is_unchanged() {
        let event = Event::new("push", json!({"size": 3})).with_id("abc-123");
        let normalized = normalize(InboundEvent::from(event.clone()));
        assert_eq!(normalized, event);
    }

    #[test]
    fn test_nameless_record_passes_through() {
        let raw = InboundEvent::from_value(json!({"payload": {"zen": "Keep it simple"}})).unwrap();
        assert!(!raw.is_legacy());

        let event = normalize(raw);
        assert_eq!(event.name(), None);
        assert_eq!(event.payload, json!({"zen": "Keep it simple"}));
    }

    #[test]
    fn test_other_fields_survive_legacy_normalization() {
        let raw = InboundEvent::from_value(json!({
            "event": "ping",
            "id": "delivery-1",
            "payload": {},
            "source": "replay"
        }))
        .unwrap();

        let event = normalize(raw);
        assert_eq!(event.id(), Some("delivery-1"));
        assert_eq!(event.extra.get("source"), Some(&json!("replay")));
        assert!(!event.extra.contains_key("event"));
    }

    #[test]
    fn test_legacy_record_emits_deprecation_notice() {
        let raw = InboundEvent::from_value(json!({"event": "push", "payload": {}})).unwrap();

        let (event, output) = normalize_capturing(raw);

        assert_eq!(event.name(), Some("push"));
        assert!(output.contains("WARN"), "unexpected log output: {output}");
        assert!(output.contains("DEPRECATED"), "unexpected log output: {output}");
        assert!(output.contains("event=push"), "unexpected log output: {output}");
    }

    #[test]
    fn test_canonical_record_logs_nothing() {
        let (_, output) = normalize_capturing(InboundEvent::from(Event::new("push", json!({}))));
        assert!(output.is_empty(), "unexpected log output: {output}");
    }
}
