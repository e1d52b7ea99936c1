use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::api::{bad_request, internal_error, AppState};
use crate::models::{CreateEntryRequest, EntryAnalysis, Sentiment};
use crate::services::llm::LlmClient;
use crate::services::sentiment::SentimentAnalyzer;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// POST /api/entries: analyze the text and append the entry. A failed
/// analysis never blocks the save; the entry falls back to neutral defaults
/// with no AI attachment.
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateEntryRequest>,
) -> Response {
    if request.content.trim().is_empty() {
        return bad_request("Content is required");
    }
    if !(1..=10).contains(&request.mood) {
        return bad_request("Mood rating must be between 1 and 10");
    }

    let settings = state.store.settings().unwrap_or_default();
    let analyzer = SentimentAnalyzer::new(LlmClient::new(&settings.ai));

    let (sentiment, emotions, analysis) =
        match analyzer.analyze(&request.content, request.mood).await {
            Ok(result) => {
                let report = result.report;
                let analysis = EntryAnalysis {
                    mood_score: report.mood_score,
                    confidence: report.confidence,
                    key_phrases: report.key_phrases,
                    insights: report.insights,
                    recommendations: report.recommendations,
                };
                (report.sentiment, report.emotions, Some(analysis))
            }
            Err(_) => (Sentiment::Neutral, vec!["reflective".to_string()], None),
        };

    match state
        .store
        .add_entry(request.mood, request.content, sentiment, emotions, analysis)
    {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => internal_error(e),
    }
}

/// GET /api/entries: most-recent-first, optionally truncated.
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    match state.store.entries() {
        Ok(mut entries) => {
            if let Some(limit) = query.limit {
                entries.truncate(limit);
            }
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// DELETE /api/data: wholesale deletion of entries and chat history.
pub async fn clear_data(State(state): State<Arc<AppState>>) -> Response {
    match state.store.clear_all() {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"cleared": true}))).into_response(),
        Err(e) => internal_error(e),
    }
}
