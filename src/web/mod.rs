//! # Web Transport
//!
//! axum surface for inbound webhooks.
//!
//! ```text
//! POST {webhook_path}
//!   X-Hub-Signature-256 ─▶ signature::verify ──✗──▶ 401 + FailureSink
//!   X-GitHub-Event      ─▶ required          ──✗──▶ 400 + FailureSink
//!   body                ─▶ JSON              ──✗──▶ 400 + FailureSink
//!                          │
//!                          ▼
//!                     normalize ─▶ tokio::spawn(dispatch) ─▶ 202
//! ```
//!
//! Robot routes are merged into the same router.

pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod signature;
pub mod state;

pub use routes::create_app;
pub use state::AppState;
