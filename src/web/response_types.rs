//! # Web Response Types
//!
//! HTTP mappings for transport errors, and the body of an accepted delivery.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::error::TransportError;

impl TransportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TransportError::MissingSignature | TransportError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            TransportError::MissingEventName | TransportError::InvalidPayload(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::MissingSignature => "MISSING_SIGNATURE",
            TransportError::InvalidSignature => "INVALID_SIGNATURE",
            TransportError::MissingEventName => "MISSING_EVENT_NAME",
            TransportError::InvalidPayload(_) => "INVALID_PAYLOAD",
        }
    }
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (self.status_code(), body).into_response()
    }
}

/// Body returned with `202 Accepted`
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedDelivery {
    pub id: String,
    pub event: String,
}

impl IntoResponse for AcceptedDelivery {
    fn into_response(self) -> Response {
        (StatusCode::ACCEPTED, Json(self)).into_response()
    }
}
