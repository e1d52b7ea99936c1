use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::{bad_request, internal_error, AppState};
use crate::services::analytics;

/// GET /api/dashboard: the snapshot recomputed on the last store mutation.
pub async fn overview(State(state): State<Arc<AppState>>) -> Response {
    (StatusCode::OK, Json(state.dashboard.snapshot())).into_response()
}

/// GET /api/calendar/{year}/{month}: days of the month with entries.
pub async fn calendar(
    State(state): State<Arc<AppState>>,
    Path((year, month)): Path<(i32, u32)>,
) -> Response {
    if !(1..=12).contains(&month) {
        return bad_request("Month must be between 1 and 12");
    }
    match state.store.entries() {
        Ok(entries) => (
            StatusCode::OK,
            Json(analytics::month_calendar(&entries, year, month)),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}
