//! Canonical event type delivered to robots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A webhook event after normalization.
///
/// Events are shared read-only across every concurrent robot invocation of a
/// single dispatch, so nothing hands out mutable access once constructed.
///
/// `name` is optional because a record that carries neither `name` nor the
/// legacy `event` field is passed through unchanged; robots decide whether a
/// nameless event is meaningful to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Delivery identifier assigned by the sender (`X-GitHub-Delivery`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub payload: Value,

    /// Any other top-level fields of the inbound record, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: Some(name.into()),
            id: None,
            payload,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The payload's `action` field, present on most GitHub events
    pub fn action(&self) -> Option<&str> {
        self.payload.get("action").and_then(Value::as_str)
    }

    /// `name.action` when an action is present, otherwise just `name`
    pub fn qualified_name(&self) -> Option<String> {
        let name = self.name()?;
        Some(match self.action() {
            Some(action) => format!("{name}.{action}"),
            None => name.to_string(),
        })
    }

    /// `owner/repo` of the repository the event concerns, if any
    pub fn repository(&self) -> Option<&str> {
        self.payload
            .get("repository")
            .and_then(|repo| repo.get("full_name"))
            .and_then(Value::as_str)
    }

    pub fn installation_id(&self) -> Option<u64> {
        self.payload
            .get("installation")
            .and_then(|installation| installation.get("id"))
            .and_then(Value::as_u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_qualified_name_includes_action() {
        let event = Event::new("issues", json!({"action": "opened"}));
        assert_eq!(event.qualified_name().as_deref(), Some("issues.opened"));

        let event = Event::new("push", json!({"ref": "refs/heads/main"}));
        assert_eq!(event.qualified_name().as_deref(), Some("push"));
    }

    #[test]
    fn test_payload_accessors() {
        let event = Event::new(
            "issues",
            json!({
                "repository": {"full_name": "octo/widgets"},
                "installation": {"id": 42}
            }),
        );
        assert_eq!(event.repository(), Some("octo/widgets"));
        assert_eq!(event.installation_id(), Some(42));
    }

    #[test]
    fn test_deserialize_keeps_unknown_fields() {
        let event: Event = serde_json::from_value(json!({
            "name": "push",
            "payload": {},
            "protocol": "https"
        }))
        .unwrap();
        assert_eq!(event.extra.get("protocol"), Some(&json!("https")));
    }
}
