//! # Route Definitions
//!
//! The webhook endpoint plus whatever routes the loaded robots mount.

use axum::routing::post;
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Webhook route at `webhook_path`
pub fn webhook_routes(webhook_path: &str) -> Router<AppState> {
    Router::new().route(webhook_path, post(handlers::webhook::receive_webhook))
}

/// Complete application router.
///
/// Robot routers are merged in the order given; two robots claiming the same
/// method and path is a programming error and panics when merged.
pub fn create_app<I>(state: AppState, webhook_path: &str, robot_routes: I) -> Router
where
    I: IntoIterator<Item = Router>,
{
    robot_routes.into_iter().fold(
        webhook_routes(webhook_path).with_state(state),
        |app, routes| app.merge(routes),
    )
}
