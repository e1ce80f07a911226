//! Request handler for sandboxed hosts that exchange JSON text instead of
//! HTTP objects.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::LogError;
use crate::request::LogsRequest;
use crate::service::{LogService, LogsOutcome};

const CONTENT_TYPE_JSON: &str = "application/json";

/// Response envelope returned to the host.
#[derive(Debug, Serialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<&'static str, &'static str>,
    pub body: Value,
}

impl HandlerResponse {
    fn json(status_code: u16, body: Value) -> Self {
        Self {
            status_code,
            headers: BTreeMap::from([("Content-Type", CONTENT_TYPE_JSON)]),
            body,
        }
    }

    fn failure(status_code: u16, error: &str, details: impl ToString) -> Self {
        Self::json(
            status_code,
            json!({ "error": error, "details": details.to_string() }),
        )
    }
}

/// Handle one `GET /api/logs` request envelope and return the response
/// envelope as JSON text.
pub async fn handle_get_logs(service: &LogService, request_json: &str) -> String {
    let response = respond(service, request_json).await;
    match serde_json::to_string(&response) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response envelope");
            r#"{"statusCode":500,"headers":{"Content-Type":"application/json"},"body":{"error":"Failed to read logs","details":"response encoding failed"}}"#
                .to_string()
        }
    }
}

/// Same as [`handle_get_logs`] but returns the typed envelope.
pub async fn respond(service: &LogService, request_json: &str) -> HandlerResponse {
    let request = match LogsRequest::from_json(request_json) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "rejected request envelope");
            return HandlerResponse::failure(400, "Invalid request", e);
        }
    };

    let count = request.line_count(service.limits());
    let encoded = match service.get_logs(count).await {
        LogsOutcome::Found(body) => serde_json::to_value(&body).map(|v| (200, v)),
        LogsOutcome::NotFound(body) => serde_json::to_value(&body).map(|v| (404, v)),
    };

    match encoded.map_err(LogError::from) {
        Ok((status, body)) => HandlerResponse::json(status, body),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode logs");
            HandlerResponse::failure(500, "Failed to read logs", e)
        }
    }
}
