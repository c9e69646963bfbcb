//! Process-wide unhandled-failure routing.
//!
//! The panic hook is global, so this binary holds a single test.

mod common;

use std::sync::Arc;

use common::*;
use hookbot::{Event, FailureKind, Hookbot, HookbotConfig, RecordingFailureSink, Robot};
use serde_json::json;

#[tokio::test]
async fn test_panics_are_reported_exactly_once() {
    let sink = Arc::new(RecordingFailureSink::new());
    let hookbot = Hookbot::new(HookbotConfig::default())
        .unwrap()
        .with_failure_sink(sink.clone())
        .with_plugin("volatile", |_ctx| {
            Ok(Arc::new(ScriptedRobot::new(
                "volatile",
                Behavior::Panic("handler blew up".into()),
            )) as Arc<dyn Robot>)
        });
    hookbot.setup(["volatile"]).unwrap();

    // Inside a tracked invocation: reported by the dispatcher only
    let result = hookbot.receive(Event::new("push", json!({}))).await;
    assert_eq!(result.failure_count(), 1);
    assert_eq!(sink.len(), 1);
    assert!(matches!(sink.records()[0].kind, FailureKind::Handler { .. }));

    // Outside any invocation: reported by the hook
    let stray = tokio::spawn(async { panic!("stray task exploded") }).await;
    assert!(stray.is_err());

    let records = sink.records();
    assert_eq!(records.len(), 2);
    match &records[1].kind {
        FailureKind::Unhandled { source, message } => {
            assert_eq!(source, "panic");
            assert!(message.contains("stray task exploded"));
        }
        other => panic!("expected unhandled failure, got {other:?}"),
    }
}
