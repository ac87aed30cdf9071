pub mod groq;

use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::models::{ ConversationTurn, Role, TokenUsage };

/// One message in the upstream provider's wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: String,
    pub content: String,
}

#[derive(Clone, Debug)]
pub struct Completion {
    pub response: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider answered with a non-success status and a message.
    #[error("upstream returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, messages: &[ProviderMessage]) -> Result<Completion, LlmError>;

    fn model(&self) -> &str;
}

/// Maps the caller's history 1:1 into provider messages and appends the new
/// message as a final user turn. Order is preserved exactly; any role other
/// than `user` is coerced to `assistant`. No truncation or dedup.
pub fn assemble_messages(history: &[ConversationTurn], message: &str) -> Vec<ProviderMessage> {
    let mut messages: Vec<ProviderMessage> = history
        .iter()
        .map(|turn| ProviderMessage {
            role: match turn.role {
                Role::User => "user".to_string(),
                _ => "assistant".to_string(),
            },
            content: turn.content.clone(),
        })
        .collect();
    messages.push(ProviderMessage {
        role: "user".to_string(),
        content: message.to_string(),
    });
    messages
}
