//! Logs one line per received event.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::events::Event;
use crate::robot::{Robot, RobotContext};

pub const PLUGIN_NAME: &str = "event-log";

#[derive(Debug, Default, Clone, Copy)]
pub struct EventLogRobot;

impl EventLogRobot {
    pub fn from_context(_context: &RobotContext) -> anyhow::Result<Arc<dyn Robot>> {
        Ok(Arc::new(Self))
    }
}

#[async_trait]
impl Robot for EventLogRobot {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn receive(&self, event: &Event) -> anyhow::Result<()> {
        info!(
            event = event.qualified_name().as_deref().unwrap_or("<unnamed>"),
            delivery_id = event.id(),
            repository = event.repository(),
            installation_id = event.installation_id(),
            "Event received"
        );
        Ok(())
    }
}
