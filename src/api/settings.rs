use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::{internal_error, AppState};
use crate::models::{Settings, UserProfile};

pub async fn get_settings(State(state): State<Arc<AppState>>) -> Response {
    match state.store.settings() {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> Response {
    match state.store.set_settings(&settings) {
        Ok(()) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn get_profile(State(state): State<Arc<AppState>>) -> Response {
    match state.store.profile() {
        Ok(profile) => (StatusCode::OK, Json(profile.unwrap_or_default())).into_response(),
        Err(e) => internal_error(e),
    }
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<UserProfile>,
) -> Response {
    match state.store.set_profile(&profile) {
        Ok(()) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => internal_error(e),
    }
}
