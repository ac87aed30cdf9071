use log::error;

use super::{ RelayApi, RelayApiError };
use crate::models::{ ConversationTurn, Role };

/// The session log, owned by the caller and mutated only through the
/// operations below. Append-only while the session lives; `clear` discards
/// everything.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
    busy: bool,
    last_error: Option<String>,
}

/// What `submit` did with the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input or a request already in flight; nothing changed.
    Ignored,
    Replied,
    Failed,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Error to show in the UI banner, if the last submission failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// History as sent to the relay: user and assistant turns only. System
    /// turns are local error annotations and never go upstream.
    fn relay_history(&self) -> Vec<ConversationTurn> {
        self.turns
            .iter()
            .filter(|turn| turn.role != Role::System)
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.last_error = None;
    }
}

/// Sends `text` through the relay and folds the result into `conversation`.
///
/// Blank input and submissions made while a request is in flight are
/// ignored without touching the log. The busy flag is cleared on every
/// return path.
pub async fn submit(
    conversation: &mut Conversation,
    relay: &dyn RelayApi,
    text: &str,
) -> SubmitOutcome {
    if text.trim().is_empty() || conversation.busy {
        return SubmitOutcome::Ignored;
    }

    let history = conversation.relay_history();
    conversation.turns.push(ConversationTurn::new(Role::User, text));
    conversation.busy = true;
    conversation.last_error = None;

    let outcome = match relay.send_message(text, &history).await {
        Ok(resp) => {
            conversation
                .turns
                .push(ConversationTurn::new(Role::Assistant, resp.response));
            SubmitOutcome::Replied
        }
        Err(err) => {
            error!("Error sending message: {}", err);
            let description = describe(&err);
            conversation
                .turns
                .push(ConversationTurn::new(Role::System, format!("Error: {}", description)));
            conversation.last_error = Some(description);
            SubmitOutcome::Failed
        }
    };

    conversation.busy = false;
    outcome
}

fn describe(err: &RelayApiError) -> String {
    match err {
        RelayApiError::Server { error, .. } => error.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ ChatResponse, TokenUsage };
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordedCall {
        message: String,
        history: Vec<ConversationTurn>,
    }

    struct MockRelay {
        calls: Mutex<Vec<RecordedCall>>,
        reply: Result<String, RelayApiError>,
    }

    impl MockRelay {
        fn replying(text: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: Ok(text.to_string()),
            }
        }

        fn failing(error: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: Err(RelayApiError::Server {
                    status: 500,
                    error: error.to_string(),
                    details: None,
                }),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RelayApi for MockRelay {
        async fn send_message(
            &self,
            message: &str,
            history: &[ConversationTurn],
        ) -> Result<ChatResponse, RelayApiError> {
            self.calls.lock().unwrap().push(RecordedCall {
                message: message.to_string(),
                history: history.to_vec(),
            });
            match &self.reply {
                Ok(text) => Ok(ChatResponse {
                    response: text.clone(),
                    model: "openai/gpt-oss-120b".to_string(),
                    usage: TokenUsage::default(),
                }),
                Err(RelayApiError::Server { status, error, details }) => {
                    Err(RelayApiError::Server {
                        status: *status,
                        error: error.clone(),
                        details: details.clone(),
                    })
                }
                Err(_) => unreachable!(),
            }
        }
    }

    #[tokio::test]
    async fn reply_is_appended_as_assistant_turn() {
        let relay = MockRelay::replying("hello there");
        let mut conversation = Conversation::new();

        let outcome = submit(&mut conversation, &relay, "hi").await;

        assert_eq!(outcome, SubmitOutcome::Replied);
        assert_eq!(conversation.turns().len(), 2);
        assert_eq!(conversation.turns()[0], ConversationTurn::new(Role::User, "hi"));
        assert_eq!(
            conversation.turns()[1],
            ConversationTurn::new(Role::Assistant, "hello there")
        );
        assert!(!conversation.is_busy());
        assert_eq!(conversation.last_error(), None);
    }

    #[tokio::test]
    async fn blank_input_appends_nothing_and_makes_no_call() {
        let relay = MockRelay::replying("unused");
        let mut conversation = Conversation::new();

        assert_eq!(submit(&mut conversation, &relay, "").await, SubmitOutcome::Ignored);
        assert_eq!(submit(&mut conversation, &relay, "   \n\t").await, SubmitOutcome::Ignored);

        assert!(conversation.turns().is_empty());
        assert_eq!(relay.call_count(), 0);
    }

    #[tokio::test]
    async fn history_excludes_current_message_and_system_turns() {
        let relay = MockRelay::replying("fine, thanks");
        let mut conversation = Conversation::new();
        conversation.turns.push(ConversationTurn::new(Role::User, "hi"));
        conversation.turns.push(ConversationTurn::new(Role::Assistant, "hello"));
        conversation
            .turns
            .push(ConversationTurn::new(Role::System, "Error: upstream error"));

        submit(&mut conversation, &relay, "how are you").await;

        let calls = relay.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].message, "how are you");
        assert_eq!(
            calls[0].history,
            vec![
                ConversationTurn::new(Role::User, "hi"),
                ConversationTurn::new(Role::Assistant, "hello"),
            ]
        );
    }

    #[tokio::test]
    async fn failure_appends_one_system_turn_and_releases_busy() {
        let relay = MockRelay::failing("upstream error");
        let mut conversation = Conversation::new();

        let outcome = submit(&mut conversation, &relay, "hi").await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(conversation.turns().len(), 2);
        assert_eq!(conversation.turns()[1].role, Role::System);
        assert_eq!(conversation.turns()[1].content, "Error: upstream error");
        assert_eq!(conversation.last_error(), Some("upstream error"));
        assert!(!conversation.is_busy());

        // A later submission is accepted again.
        let relay = MockRelay::replying("recovered");
        let outcome = submit(&mut conversation, &relay, "retry").await;
        assert_eq!(outcome, SubmitOutcome::Replied);
        assert_eq!(relay.call_count(), 1);
    }

    #[tokio::test]
    async fn busy_conversation_ignores_submissions() {
        let relay = MockRelay::replying("unused");
        let mut conversation = Conversation::new();
        conversation.busy = true;

        assert_eq!(submit(&mut conversation, &relay, "hi").await, SubmitOutcome::Ignored);
        assert!(conversation.turns().is_empty());
        assert_eq!(relay.call_count(), 0);
    }

    #[tokio::test]
    async fn clear_resets_log_and_error() {
        let relay = MockRelay::failing("boom");
        let mut conversation = Conversation::new();
        submit(&mut conversation, &relay, "hi").await;
        assert!(!conversation.turns().is_empty());
        assert!(conversation.last_error().is_some());

        conversation.clear();

        assert!(conversation.turns().is_empty());
        assert_eq!(conversation.last_error(), None);
    }
}
