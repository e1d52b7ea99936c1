use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::Sentiment;

/// One journal submission. Immutable once created; only store-wide deletion
/// removes entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub mood: u8,
    pub content: String,
    pub sentiment: Sentiment,
    pub emotions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<EntryAnalysis>,
}

/// AI-derived attachment. Absent when analysis failed outright and the entry
/// was saved with bare defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryAnalysis {
    pub mood_score: f64,
    pub confidence: f64,
    pub key_phrases: Vec<String>,
    pub insights: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub content: String,
    pub mood: u8,
}
