//! # Default Robot
//!
//! Liveness and landing routes. Ignores every event.

use std::sync::Arc;

use async_trait::async_trait;
use axum::routing::get;
use axum::Router;

use crate::events::Event;
use crate::robot::{Robot, RobotContext};

pub const PLUGIN_NAME: &str = "default";

const WELCOME: &str = concat!(
    "hookbot ",
    env!("CARGO_PKG_VERSION"),
    "\n\nThis app is running. Deliver webhooks to the configured webhook path.\n"
);

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRobot;

impl DefaultRobot {
    pub fn from_context(_context: &RobotContext) -> anyhow::Result<Arc<dyn Robot>> {
        Ok(Arc::new(Self))
    }
}

#[async_trait]
impl Robot for DefaultRobot {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn receive(&self, _event: &Event) -> anyhow::Result<()> {
        Ok(())
    }

    fn routes(&self) -> Option<Router> {
        Some(
            Router::new()
                .route("/ping", get(|| async { "PONG" }))
                .route("/probot", get(|| async { WELCOME })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_ping_returns_pong() {
        let app = DefaultRobot.routes().unwrap();
        let response = app
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"PONG");
    }

    #[tokio::test]
    async fn test_landing_page_names_the_app() {
        let app = DefaultRobot.routes().unwrap();
        let response = app
            .oneshot(Request::get("/probot").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).starts_with("hookbot "));
    }
}
