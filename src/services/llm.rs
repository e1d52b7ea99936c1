use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::models::AiSettings;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ─── Types ───

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatRecvMessage,
}

#[derive(Deserialize)]
struct ChatRecvMessage {
    content: Option<String>,
}

// ─── Client ───

/// Thin OpenAI-compatible chat-completions client shared by the analysis and
/// companion services.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    enabled: bool,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(ai: &AiSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            enabled: ai.enabled,
            api_key: ai.api_key.trim().to_string(),
            model: ai.model.clone(),
        }
    }

    /// Whether the real-model path is available. Absence of a credential is
    /// not an error, it just selects demo mode.
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }

    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("API request failed: {}", e))?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(anyhow!("API error {}: {}", status, text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| anyhow!("model returned empty content"))?;

        Ok(content.trim().to_string())
    }
}

/// Models often wrap JSON replies in Markdown fences despite instructions.
pub fn strip_code_fences(content: &str) -> &str {
    content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
