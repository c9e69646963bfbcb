//! Bootstrap ordering and failure behavior.

mod common;

use std::sync::Arc;

use common::*;
use hookbot::{
    Event, Hookbot, HookbotConfig, HookbotError, PluginSource, RecordingFailureSink, Robot,
};
use serde_json::json;

fn app() -> (Hookbot, Arc<RecordingFailureSink>) {
    let sink = Arc::new(RecordingFailureSink::new());
    let app = Hookbot::new(HookbotConfig::default())
        .unwrap()
        .with_failure_sink(sink.clone())
        .with_plugin("greeter", |_ctx| {
            Ok(Arc::new(ScriptedRobot::succeeding("greeter")) as Arc<dyn Robot>)
        });
    (app, sink)
}

#[tokio::test]
async fn test_builtins_precede_extras_in_dispatch_results() {
    let (app, _sink) = app();
    app.setup([
        PluginSource::named("greeter"),
        PluginSource::named("event-log"),
    ])
    .unwrap();

    let result = app
        .receive(Event::new("ping", json!({"zen": "Practicality beats purity."})))
        .await;

    let names: Vec<&str> = result.outcomes.iter().map(|o| o.robot.as_str()).collect();
    assert_eq!(names, vec!["stats", "default", "greeter", "event-log"]);
    assert!(result.all_succeeded());
}

#[tokio::test]
async fn test_unknown_plugin_aborts_setup() {
    let (app, _sink) = app();
    let err = app.setup(["does-not-exist"]).unwrap_err();

    match err {
        HookbotError::UnknownPlugin { name, available } => {
            assert_eq!(name, "does-not-exist");
            assert!(available.contains(&"greeter".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_failing_factory_aborts_setup() {
    let (app, _sink) = app();
    let source = PluginSource::factory("needs-token", |_ctx| anyhow::bail!("GITHUB_TOKEN not set"));

    let err = app.setup([source]).unwrap_err();
    assert!(matches!(
        err,
        HookbotError::PluginInit { ref name, ref reason }
            if name == "needs-token" && reason.contains("GITHUB_TOKEN")
    ));
}

#[tokio::test]
async fn test_inline_factory_receives_shared_context() {
    let (app, _sink) = app();
    let source = PluginSource::factory("cache-writer", |ctx| {
        assert_eq!(ctx.cache.ttl(), HookbotConfig::default().cache_ttl());
        Ok(Arc::new(ScriptedRobot::succeeding("cache-writer")) as Arc<dyn Robot>)
    });

    let robot = app.load(source).unwrap();
    assert_eq!(robot.name(), "cache-writer");
    assert_eq!(app.registry().names(), vec!["cache-writer"]);
}

#[tokio::test]
async fn test_setup_twice_duplicates_registrations() {
    let (app, _sink) = app();
    app.setup(Vec::<PluginSource>::new()).unwrap();
    app.setup(Vec::<PluginSource>::new()).unwrap();

    assert_eq!(
        app.registry().names(),
        vec!["stats", "default", "stats", "default"]
    );
}
