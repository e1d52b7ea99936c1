use rand::Rng;

use crate::models::{ChatReply, JournalEntry};
use crate::services::llm::LlmClient;
use crate::services::ValidationError;

/// Context-free supportive replies used whenever no provider is reachable.
pub const FALLBACK_REPLIES: [&str; 4] = [
    "Thank you for sharing that with me. It sounds like you're processing some important \
     feelings. How are you taking care of yourself today?",
    "I hear you, and your feelings are completely valid. Sometimes it helps to take things one \
     moment at a time. What's one small thing that might bring you comfort right now?",
    "It's really meaningful that you're taking time to reflect on your emotions. That shows \
     great self-awareness. Have you tried any breathing exercises or gentle movement today?",
    "Your willingness to explore your feelings is a strength. Remember that it's okay to have \
     difficult emotions - they're part of being human. What usually helps you feel more \
     grounded?",
];

const COMPANION_SYSTEM_PROMPT: &str =
    "You are a compassionate AI wellness assistant for Mind Haven, a mental health tracking \
     app. You help users understand their emotions, provide coping strategies, and offer \
     supportive guidance.";

const CONTEXT_ENTRIES: usize = 3;
const CONTEXT_CONTENT_CHARS: usize = 200;

pub struct ChatCompanion {
    llm: LlmClient,
}

impl ChatCompanion {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub async fn reply(&self, text: &str) -> Result<ChatReply, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::TextRequired);
        }

        if !self.llm.is_configured() {
            return Ok(ChatReply {
                chat_response: fallback_reply(&mut rand::rng()).to_string(),
                is_demo: Some(true),
            });
        }

        match self
            .llm
            .complete(COMPANION_SYSTEM_PROMPT, &companion_prompt(text), 0.7, 300)
            .await
        {
            Ok(content) => Ok(ChatReply {
                chat_response: content,
                is_demo: None,
            }),
            Err(e) => {
                log::warn!("chat companion fell back to canned reply: {:#}", e);
                Ok(ChatReply {
                    chat_response: fallback_reply(&mut rand::rng()).to_string(),
                    is_demo: Some(true),
                })
            }
        }
    }
}

/// Uniform draw from the canned pool. The random source is a parameter so
/// tests can fix the draw.
pub fn fallback_reply<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FALLBACK_REPLIES[rng.random_range(0..FALLBACK_REPLIES.len())]
}

/// Summarize the most recent entries for the companion prompt.
pub fn journal_context(entries: &[JournalEntry]) -> String {
    entries
        .iter()
        .take(CONTEXT_ENTRIES)
        .map(|entry| {
            format!(
                "Date: {}, Mood: {}/10, Content: {}...",
                entry.date.format("%Y-%m-%d"),
                entry.mood,
                entry.content.chars().take(CONTEXT_CONTENT_CHARS).collect::<String>()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn companion_prompt(text: &str) -> String {
    format!(
        "User's message: \"{text}\"\n\n\
         Respond as a caring mental health companion. You should:\n\
         1. Be empathetic and understanding\n\
         2. Provide practical wellness advice when appropriate\n\
         3. Ask thoughtful follow-up questions to encourage reflection\n\
         4. Suggest healthy coping mechanisms\n\
         5. Validate their feelings\n\
         6. Keep responses concise but meaningful (2-3 sentences)\n\
         7. If they mention serious mental health concerns, gently suggest professional help\n\n\
         Remember: You're not a replacement for professional therapy, but a supportive \
         companion for daily wellness."
    )
}
