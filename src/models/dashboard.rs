use serde::{Deserialize, Serialize};

use super::analysis::Sentiment;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MoodStats {
    pub average_mood: f64,
    pub average_ai_mood: f64,
    pub total_entries: usize,
    pub positive_entries: usize,
    pub mood_trend: f64,
    pub streak_days: u32,
}

/// One point of the 14-entry mood trend chart, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String,
    pub day: String,
    pub user_mood: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_mood: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionCount {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySentiment {
    pub week: String,
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Positive,
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub stats: MoodStats,
    pub trend: Vec<TrendPoint>,
    pub emotions: Vec<EmotionCount>,
    pub weekly_sentiment: Vec<WeeklySentiment>,
    pub insights: Vec<Insight>,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub day: u32,
    pub mood: u8,
    pub sentiment: Sentiment,
}
