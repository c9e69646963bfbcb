//! Scripted robots and registry builders shared by the integration tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hookbot::{Dispatcher, Event, HandlerRegistry, RecordingFailureSink, Robot};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum Behavior {
    Succeed,
    Fail(String),
    Panic(String),
}

/// Robot whose outcome and latency are fixed up front.
///
/// Records every payload it sees, and appends its name to an optional shared
/// completion log when it finishes.
pub struct ScriptedRobot {
    pub name: String,
    pub behavior: Behavior,
    pub delay: Duration,
    seen: Mutex<Vec<Value>>,
    completions: Option<Arc<Mutex<Vec<String>>>>,
}

impl ScriptedRobot {
    pub fn new(name: impl Into<String>, behavior: Behavior) -> Self {
        Self {
            name: name.into(),
            behavior,
            delay: Duration::ZERO,
            seen: Mutex::new(Vec::new()),
            completions: None,
        }
    }

    pub fn succeeding(name: impl Into<String>) -> Self {
        Self::new(name, Behavior::Succeed)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_completion_log(mut self, log: Arc<Mutex<Vec<String>>>) -> Self {
        self.completions = Some(log);
        self
    }

    pub fn seen(&self) -> Vec<Value> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Robot for ScriptedRobot {
    fn name(&self) -> &str {
        &self.name
    }

    async fn receive(&self, event: &Event) -> anyhow::Result<()> {
        self.seen.lock().push(event.payload.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(log) = &self.completions {
            log.lock().push(self.name.clone());
        }

        match &self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail(message) => Err(anyhow::anyhow!("{message}")),
            Behavior::Panic(message) => panic!("{message}"),
        }
    }
}

/// A dispatcher over `robots`, registered in order, with a recording sink
pub fn dispatcher_for(
    robots: &[Arc<ScriptedRobot>],
) -> (Dispatcher, Arc<RecordingFailureSink>) {
    let registry = Arc::new(HandlerRegistry::new());
    for robot in robots {
        registry.register(robot.name.clone(), robot.clone() as Arc<dyn Robot>);
    }
    let sink = Arc::new(RecordingFailureSink::new());
    (Dispatcher::new(registry, sink.clone()), sink)
}

/// `count` succeeding robots named `robot-0` … `robot-{count-1}`
pub fn succeeding_robots(count: usize) -> Vec<Arc<ScriptedRobot>> {
    (0..count)
        .map(|i| Arc::new(ScriptedRobot::succeeding(format!("robot-{i}"))))
        .collect()
}

pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}
