//! # Stats Robot
//!
//! Tracks the installations seen in deliveries and how busy each repository
//! is, and serves a summary at `GET /probot/stats`.
//!
//! The summary is rebuilt lazily: every event invalidates the cached copy and
//! the next request recomputes it through the shared cache.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

use crate::cache::SharedCache;
use crate::events::Event;
use crate::robot::{Robot, RobotContext};

pub const PLUGIN_NAME: &str = "stats";
pub const STATS_ROUTE: &str = "/probot/stats";
pub const STATS_CACHE_KEY: &str = "probot:stats";

/// Repositories listed in the summary
const POPULAR_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryStats {
    pub full_name: String,
    pub events: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub installations: usize,
    pub popular: Vec<RepositoryStats>,
}

struct StatsState {
    /// installation id → account login, when the payload names one
    installations: DashMap<u64, Option<String>>,
    repositories: DashMap<String, u64>,
    cache: SharedCache,
}

impl StatsState {
    fn snapshot(&self) -> StatsSnapshot {
        let mut popular: Vec<RepositoryStats> = self
            .repositories
            .iter()
            .map(|entry| RepositoryStats {
                full_name: entry.key().clone(),
                events: *entry.value(),
            })
            .collect();
        popular.sort_by(|a, b| {
            b.events
                .cmp(&a.events)
                .then_with(|| a.full_name.cmp(&b.full_name))
        });
        popular.truncate(POPULAR_LIMIT);

        StatsSnapshot {
            installations: self.installations.len(),
            popular,
        }
    }
}

pub struct StatsRobot {
    state: Arc<StatsState>,
}

impl StatsRobot {
    pub fn new(cache: SharedCache) -> Self {
        Self {
            state: Arc::new(StatsState {
                installations: DashMap::new(),
                repositories: DashMap::new(),
                cache,
            }),
        }
    }

    pub fn from_context(context: &RobotContext) -> anyhow::Result<Arc<dyn Robot>> {
        Ok(Arc::new(Self::new(context.cache.clone())))
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.state.snapshot()
    }
}

#[async_trait]
impl Robot for StatsRobot {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn receive(&self, event: &Event) -> anyhow::Result<()> {
        if let Some(id) = event.installation_id() {
            if event.name() == Some("installation") && event.action() == Some("deleted") {
                self.state.installations.remove(&id);
            } else {
                let account = event
                    .payload
                    .pointer("/installation/account/login")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let mut entry = self.state.installations.entry(id).or_insert(None);
                if account.is_some() {
                    *entry = account;
                }
            }
        }

        if let Some(repository) = event.repository() {
            *self
                .state
                .repositories
                .entry(repository.to_string())
                .or_insert(0) += 1;
        }

        self.state.cache.invalidate(STATS_CACHE_KEY).await;
        Ok(())
    }

    fn routes(&self) -> Option<Router> {
        Some(
            Router::new()
                .route(STATS_ROUTE, get(stats_handler))
                .with_state(self.state.clone()),
        )
    }
}

async fn stats_handler(State(state): State<Arc<StatsState>>) -> Json<Value> {
    let summary = state
        .cache
        .get_or_insert_with(STATS_CACHE_KEY, async {
            serde_json::to_value(state.snapshot()).unwrap_or_default()
        })
        .await;
    Json(summary)
}
