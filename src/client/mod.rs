pub mod conversation;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{ ChatRequest, ChatResponse, ConversationTurn, HealthResponse };

pub use conversation::{ submit, Conversation, SubmitOutcome };

const DEFAULT_API_URL: &str = "http://localhost:3001";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum RelayApiError {
    /// The relay answered with an error status and body.
    #[error("{error}")]
    Server {
        status: u16,
        error: String,
        details: Option<String>,
    },
    #[error("Failed to get response from server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed relay response: {0}")]
    Malformed(String),
}

/// Seam between the conversation controller and the relay, so controller
/// tests can substitute a mock.
#[async_trait]
pub trait RelayApi: Send + Sync {
    async fn send_message(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<ChatResponse, RelayApiError>;
}

pub struct HttpRelay {
    http: HttpClient,
    base_url: String,
}

#[derive(Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

impl HttpRelay {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RelayApiError> {
        let http = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Base URL from API_URL, defaulting to the local relay port.
    pub fn from_env() -> Result<Self, RelayApiError> {
        let base_url =
            std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), route)
    }

    pub async fn health(&self) -> Result<HealthResponse, RelayApiError> {
        let resp = self.http.get(self.url("/health")).send().await?;
        Ok(resp.error_for_status()?.json::<HealthResponse>().await?)
    }
}

#[async_trait]
impl RelayApi for HttpRelay {
    async fn send_message(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<ChatResponse, RelayApiError> {
        let req = ChatRequest {
            message: message.to_string(),
            history: history.to_vec(),
        };

        let resp = self.http.post(self.url("/api/chat")).json(&req).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<WireError>(&body) {
                Ok(wire) => RelayApiError::Server {
                    status: status.as_u16(),
                    error: wire.error,
                    details: wire.details,
                },
                Err(_) => RelayApiError::Server {
                    status: status.as_u16(),
                    error: "Failed to get response from server".to_string(),
                    details: if body.is_empty() { None } else { Some(body) },
                },
            });
        }

        resp.json::<ChatResponse>()
            .await
            .map_err(|e| RelayApiError::Malformed(e.to_string()))
    }
}
