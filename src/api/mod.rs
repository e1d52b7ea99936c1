use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::services::dashboard::DashboardService;
use crate::store::JournalStore;

pub mod analyze;
pub mod chat;
pub mod dashboard;
pub mod journal;
pub mod settings;

pub struct AppState {
    pub store: Arc<JournalStore>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    /// Wires the dashboard to the store so every entry mutation recomputes
    /// the snapshot, then primes it from whatever is already persisted.
    pub fn new(store: Arc<JournalStore>) -> Arc<Self> {
        let dashboard = Arc::new(DashboardService::new());

        let observer = dashboard.clone();
        store.subscribe(move |entries| observer.refresh(entries));
        if let Ok(entries) = store.entries() {
            dashboard.refresh(&entries);
        }

        Arc::new(Self { store, dashboard })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/analyze-sentiment", post(analyze::analyze_sentiment))
        .route(
            "/api/entries",
            post(journal::create_entry).get(journal::list_entries),
        )
        .route("/api/data", delete(journal::clear_data))
        .route("/api/chat", post(chat::send_message).get(chat::history))
        .route("/api/dashboard", get(dashboard::overview))
        .route("/api/calendar/{year}/{month}", get(dashboard::calendar))
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/api/profile",
            get(settings::get_profile).put(settings::update_profile),
        )
        .route("/health", get(health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "alive"}))
}

pub(crate) fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

pub(crate) fn internal_error(err: anyhow::Error) -> Response {
    log::error!("request failed: {:#}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Internal server error" })),
    )
        .into_response()
}
