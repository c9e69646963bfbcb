//! Dispatch ordering, barrier and load behavior.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::*;
use hookbot::{Event, HandlerError};
use parking_lot::Mutex;
use serde_json::json;

#[tokio::test]
async fn test_result_order_follows_registration_not_completion() {
    let completions = Arc::new(Mutex::new(Vec::new()));
    let robots: Vec<Arc<ScriptedRobot>> = [("h1", 40), ("h2", 20), ("h3", 0)]
        .into_iter()
        .map(|(name, millis)| {
            Arc::new(
                ScriptedRobot::succeeding(name)
                    .with_delay(Duration::from_millis(millis))
                    .with_completion_log(completions.clone()),
            )
        })
        .collect();
    let (dispatcher, _sink) = dispatcher_for(&robots);

    let result = dispatcher.dispatch(&Event::new("push", json!({}))).await;

    let names: Vec<&str> = result.outcomes.iter().map(|o| o.robot.as_str()).collect();
    assert_eq!(names, vec!["h1", "h2", "h3"]);
    assert_eq!(*completions.lock(), vec!["h3", "h2", "h1"]);
}

#[tokio::test]
async fn test_dispatch_waits_for_slowest_robot() {
    let slow = Arc::new(ScriptedRobot::succeeding("slow").with_delay(Duration::from_millis(80)));
    let fast = Arc::new(ScriptedRobot::new("fast", Behavior::Fail("nope".into())));
    let (dispatcher, _sink) = dispatcher_for(&[fast, slow.clone()]);

    let started = Instant::now();
    let result = dispatcher.dispatch(&Event::new("push", json!({"n": 1}))).await;

    assert!(started.elapsed() >= Duration::from_millis(80));
    assert_eq!(result.len(), 2);
    assert!(result.outcomes[1].is_success());
    assert_eq!(slow.seen(), vec![json!({"n": 1})]);
}

#[tokio::test]
async fn test_robots_run_concurrently() {
    let robots: Vec<Arc<ScriptedRobot>> = (0..10)
        .map(|i| {
            Arc::new(
                ScriptedRobot::succeeding(format!("sleeper-{i}"))
                    .with_delay(Duration::from_millis(50)),
            )
        })
        .collect();
    let (dispatcher, _sink) = dispatcher_for(&robots);

    let started = Instant::now();
    let result = dispatcher.dispatch(&Event::new("push", json!({}))).await;

    assert!(result.all_succeeded());
    // Sequential invocation would take 500ms
    assert!(started.elapsed() < Duration::from_millis(400));
}

#[tokio::test]
async fn test_failure_reaches_sink_exactly_once_per_dispatch() {
    let robots = vec![
        Arc::new(ScriptedRobot::succeeding("ok")),
        Arc::new(ScriptedRobot::new("broken", Behavior::Fail("bad credentials".into()))),
    ];
    let (dispatcher, sink) = dispatcher_for(&robots);

    for _ in 0..3 {
        let result = dispatcher.dispatch(&Event::new("issues", json!({}))).await;
        assert_eq!(
            result.outcomes[1].error(),
            Some(&HandlerError::Failed("bad credentials".into()))
        );
    }

    assert_eq!(sink.len(), 3);
    assert_eq!(sink.failures_for("broken").len(), 3);
}

#[tokio::test]
async fn test_stress_back_to_back_dispatches() {
    const EVENTS: usize = 100;
    const ROBOTS: usize = 50;
    const FAILING: usize = 17;

    let robots: Vec<Arc<ScriptedRobot>> = (0..ROBOTS)
        .map(|i| {
            let behavior = if i == FAILING {
                Behavior::Fail("always fails".into())
            } else {
                Behavior::Succeed
            };
            Arc::new(ScriptedRobot::new(format!("robot-{i}"), behavior))
        })
        .collect();
    let (dispatcher, sink) = dispatcher_for(&robots);

    for seq in 0..EVENTS {
        let event = Event::new("push", json!({"seq": seq})).with_id(format!("delivery-{seq}"));
        let result = dispatcher.dispatch(&event).await;

        assert_eq!(result.len(), ROBOTS);
        let failed: Vec<usize> = result.failures().map(|(i, _)| i).collect();
        assert_eq!(failed, vec![FAILING]);
    }

    let failing_name = format!("robot-{FAILING}");
    let records = sink.records();
    assert_eq!(records.len(), EVENTS);
    assert!(records
        .iter()
        .all(|record| record.robot() == Some(failing_name.as_str())));

    let expected: Vec<_> = (0..EVENTS).map(|seq| json!({"seq": seq})).collect();
    for robot in &robots {
        assert_eq!(robot.seen(), expected, "{} saw foreign payloads", robot.name);
    }
}
