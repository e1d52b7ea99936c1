use anyhow::{anyhow, Result};

use crate::models::{AnalysisResponse, Sentiment, SentimentReport};
use crate::services::llm::{strip_code_fences, LlmClient};
use crate::services::ValidationError;

// ─── Demo-mode constants ───

const POSITIVE_WORDS: [&str; 9] = [
    "happy",
    "good",
    "great",
    "amazing",
    "wonderful",
    "excited",
    "joy",
    "love",
    "peaceful",
];

const NEGATIVE_WORDS: [&str; 9] = [
    "sad",
    "bad",
    "terrible",
    "awful",
    "angry",
    "frustrated",
    "stressed",
    "worried",
    "anxious",
];

pub const DEMO_CONFIDENCE: f64 = 0.75;
const DEMO_NOTE: &str = "Demo mode: Connect OpenAI API for full AI features";

const ANALYSIS_SYSTEM_PROMPT: &str =
    "You are an empathetic mental wellness analyst that outputs strict JSON only.";

// ─── Service ───

pub struct SentimentAnalyzer {
    llm: LlmClient,
}

impl SentimentAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Analyze a journal entry. Empty text is the only caller-visible error;
    /// everything else degrades to the deterministic demo analysis so saving
    /// an entry can never be blocked by the provider.
    pub async fn analyze(
        &self,
        text: &str,
        user_mood_rating: u8,
    ) -> Result<AnalysisResponse, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::TextRequired);
        }
        let rating = user_mood_rating.clamp(1, 10);

        if !self.llm.is_configured() {
            return Ok(AnalysisResponse {
                report: mock_analysis(text, rating),
                is_demo: Some(true),
                error: None,
            });
        }

        match self.model_analysis(text, rating).await {
            Ok(report) => Ok(AnalysisResponse {
                report,
                is_demo: None,
                error: None,
            }),
            Err(e) => {
                log::warn!("sentiment analysis fell back to demo output: {:#}", e);
                Ok(AnalysisResponse {
                    report: mock_analysis(text, rating),
                    is_demo: Some(true),
                    error: Some(DEMO_NOTE.to_string()),
                })
            }
        }
    }

    async fn model_analysis(&self, text: &str, rating: u8) -> Result<SentimentReport> {
        let prompt = analysis_prompt(text, rating);
        let content = self
            .llm
            .complete(ANALYSIS_SYSTEM_PROMPT, &prompt, 0.2, 900)
            .await?;
        let clean = strip_code_fences(&content);
        let mut report: SentimentReport = serde_json::from_str(clean)
            .map_err(|e| anyhow!("JSON parse error: {} - Content: {}", e, clean))?;
        report.mood_score = report.mood_score.clamp(1.0, 10.0);
        report.confidence = report.confidence.clamp(0.0, 1.0);
        Ok(report)
    }
}

fn analysis_prompt(text: &str, rating: u8) -> String {
    format!(
        "Analyze the sentiment and emotions in this journal entry. Consider both the text content \
         and the user's self-reported mood rating of {rating}/10.\n\n\
         Journal entry: \"{text}\"\n\n\
         Return strict JSON with keys: sentiment (\"positive\" | \"negative\" | \"neutral\"), \
         confidence (number 0-1), emotions (string[]), moodScore (number 1-10), \
         keyPhrases (string[]), insights (string), recommendations (string[]).\n\
         Detected emotions should be specific (joy, contentment, anxiety, stress, etc.); \
         moodScore should weigh both the text sentiment and the user rating; include 2-3 \
         personalized wellness recommendations.\n\
         Be compassionate and supportive in your analysis. Focus on mental wellness and \
         emotional understanding."
    )
}

/// Deterministic keyword heuristic used whenever no provider is reachable.
pub fn mock_analysis(text: &str, user_mood_rating: u8) -> SentimentReport {
    let text_lower = text.to_lowercase();
    let positive_count = POSITIVE_WORDS
        .iter()
        .filter(|word| text_lower.contains(*word))
        .count();
    let negative_count = NEGATIVE_WORDS
        .iter()
        .filter(|word| text_lower.contains(*word))
        .count();

    let rating = f64::from(user_mood_rating);
    let (sentiment, emotions, mood_score) = if positive_count > negative_count {
        (
            Sentiment::Positive,
            vec!["content", "optimistic", "peaceful"],
            (rating + 1.0).min(10.0),
        )
    } else if negative_count > positive_count {
        (
            Sentiment::Negative,
            vec!["concerned", "thoughtful", "processing"],
            (rating - 1.0).max(1.0),
        )
    } else {
        (Sentiment::Neutral, vec!["calm", "reflective"], rating)
    };

    SentimentReport {
        sentiment,
        confidence: DEMO_CONFIDENCE,
        emotions: emotions.into_iter().map(String::from).collect(),
        mood_score,
        key_phrases: text.split_whitespace().take(3).map(String::from).collect(),
        insights: format!(
            "Based on your entry, you seem to be in a {} emotional state. Your self-rating of \
             {}/10 aligns with the tone of your writing.",
            sentiment.as_str(),
            user_mood_rating
        ),
        recommendations: vec![
            "Take a few deep breaths and practice mindfulness".to_string(),
            "Consider journaling about what's on your mind".to_string(),
            "Remember to be kind to yourself during this time".to_string(),
        ],
    }
}
