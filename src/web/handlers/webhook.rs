//! # Webhook Handler
//!
//! `POST {webhook_path}`: verify, parse, schedule dispatch, answer at once.
//!
//! Rejections are reported to the failure sink and answered with the
//! matching status; they never reach the dispatcher. Accepted deliveries are
//! dispatched on a spawned task, so the sender gets `202` without waiting on
//! any robot.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::trace;
use uuid::Uuid;

use crate::dispatch::FailureRecord;
use crate::error::TransportError;
use crate::events::{normalize, Event, InboundEvent};
use crate::web::response_types::AcceptedDelivery;
use crate::web::signature;
use crate::web::state::AppState;

pub const EVENT_HEADER: &str = "x-github-event";
pub const DELIVERY_HEADER: &str = "x-github-delivery";
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Turn a raw delivery into a canonical event
pub fn parse_delivery(
    secret: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Event, TransportError> {
    signature::verify(secret, body, header(headers, SIGNATURE_HEADER))?;

    let name = header(headers, EVENT_HEADER)
        .filter(|name| !name.is_empty())
        .ok_or(TransportError::MissingEventName)?;
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| TransportError::InvalidPayload(e.to_string()))?;
    let id = header(headers, DELIVERY_HEADER)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Ok(normalize(InboundEvent::from(
        Event::new(name, payload).with_id(id),
    )))
}

pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event = match parse_delivery(&state.webhook_secret, &headers, &body) {
        Ok(event) => event,
        Err(error) => {
            state.sink.report(FailureRecord::transport(
                error.clone(),
                header(&headers, DELIVERY_HEADER),
            ));
            return error.into_response();
        }
    };

    trace!(
        event_name = event.name(),
        delivery_id = event.id(),
        "webhook received"
    );

    let accepted = AcceptedDelivery {
        id: event.id().unwrap_or_default().to_string(),
        event: event.name().unwrap_or_default().to_string(),
    };

    let dispatcher = state.dispatcher.clone();
    let sink = state.sink.clone();
    let delivery_id = accepted.id.clone();
    tokio::spawn(async move {
        let dispatch = tokio::spawn(async move { dispatcher.dispatch(&event).await });
        if let Err(join_error) = dispatch.await {
            sink.report(FailureRecord::unhandled(
                "dispatch",
                format!("dispatch of delivery {delivery_id} failed: {join_error}"),
            ));
        }
    });

    accepted.into_response()
}
