use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::{bad_request, AppState};
use crate::models::AnalyzeRequest;
use crate::services::companion::ChatCompanion;
use crate::services::llm::LlmClient;
use crate::services::sentiment::SentimentAnalyzer;

const DEFAULT_MOOD_RATING: u8 = 5;

/// POST /api/analyze-sentiment
///
/// Analysis mode returns the structured sentiment report; `isChat: true`
/// returns a companion reply instead. Both degrade to deterministic demo
/// output when no provider credential is configured.
pub async fn analyze_sentiment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    let settings = state.store.settings().unwrap_or_default();
    let llm = LlmClient::new(&settings.ai);

    if request.is_chat.unwrap_or(false) {
        let companion = ChatCompanion::new(llm);
        return match companion.reply(&request.text).await {
            Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
            Err(e) => bad_request(&e.to_string()),
        };
    }

    let rating = request.user_mood_rating.unwrap_or(DEFAULT_MOOD_RATING);
    let analyzer = SentimentAnalyzer::new(llm);
    match analyzer.analyze(&request.text, rating).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => bad_request(&e.to_string()),
    }
}
