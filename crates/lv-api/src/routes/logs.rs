//! Log retrieval endpoints.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use lv_log_tools::{LogsOutcome, LogsRequest};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Query parameters for log requests.
///
/// `lines` stays a string so that junk values fall back to the default
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct LogsQuery {
    pub lines: Option<String>,
}

/// GET /api/logs: most recent lines from the first source that has any.
pub async fn get_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let count = state.service.limits().resolve(query.lines.as_deref());
    fetch(&state, count).await
}

/// POST /api/logs: same as GET, with the request envelope
/// (`{"query": {"lines": ...}}` or `{"lines": ...}`) as the JSON body.
///
/// Unlike the query string, a malformed body is rejected with 400.
pub async fn post_logs(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<Json<serde_json::Value>> {
    let request = LogsRequest::from_json(&body)?;
    let count = request.line_count(state.service.limits());
    fetch(&state, count).await
}

async fn fetch(state: &AppState, count: usize) -> ApiResult<Json<serde_json::Value>> {
    match state.service.get_logs(count).await {
        LogsOutcome::Found(body) => serde_json::to_value(&body)
            .map(Json)
            .map_err(|e| ApiError::Internal(e.to_string())),
        LogsOutcome::NotFound(body) => Err(ApiError::NotFound(Box::new(body))),
    }
}
