use crate::core::error::MarketError;
use crate::utils::time::current_timestamp;
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub from: String,
    pub text: String,
    pub sent_at: i64,
}

/// In-memory chat transcripts between pairs of accounts.
///
/// Nothing is delivered anywhere or persisted; a restart forgets everything.
pub struct ChatLog {
    transcripts: DashMap<(String, String), Vec<ChatMessage>>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self {
            transcripts: DashMap::new(),
        }
    }

    // Both participants share one transcript regardless of who writes first
    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn send(&self, from: &str, to: &str, text: &str) -> Result<ChatMessage, MarketError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MarketError::InvalidInput("message must not be empty".to_string()));
        }

        let message = ChatMessage {
            from: from.to_string(),
            text: text.to_string(),
            sent_at: current_timestamp(),
        };

        self.transcripts
            .entry(Self::key(from, to))
            .or_default()
            .push(message.clone());

        debug!(from = %from, to = %to, "Chat message stored");
        Ok(message)
    }

    /// Drop every transcript `identifier` took part in; returns how many
    pub fn forget(&self, identifier: &str) -> usize {
        let before = self.transcripts.len();
        self.transcripts
            .retain(|(a, b), _| a != identifier && b != identifier);
        before - self.transcripts.len()
    }

    pub fn transcript(&self, a: &str, b: &str) -> Vec<ChatMessage> {
        self.transcripts
            .get(&Self::key(a, b))
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}
