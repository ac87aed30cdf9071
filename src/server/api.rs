use std::sync::Arc;

use axum::{
    extract::State,
    http::{ header::CONTENT_TYPE, HeaderValue, Method },
    routing::{ get, post },
    Json,
    Router,
};
use log::{ info, warn };
use tower_http::cors::{ AllowOrigin, CorsLayer };

use super::error::RelayError;
use crate::config::RelayConfig;
use crate::llm::{ assemble_messages, ChatClient };
use crate::models::{ ChatRequest, ChatResponse, HealthResponse };

#[derive(Clone)]
pub struct AppState {
    /// None when no credential was resolved at startup; /health still
    /// answers, /api/chat reports the misconfiguration.
    pub client: Option<Arc<dyn ChatClient>>,
    pub model: String,
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid origin in allow-list: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.model.clone(),
    })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, RelayError> {
    if req.message.is_empty() {
        return Err(RelayError::InvalidRequest("Message is required".to_string()));
    }

    let client = state.client.as_ref().ok_or_else(|| {
        RelayError::Misconfigured(
            "API key not configured. Set OPEN_KEY or GROQ_API_KEY.".to_string(),
        )
    })?;

    let messages = assemble_messages(&req.history, &req.message);
    info!("Relaying chat request with {} history turns", req.history.len());

    let completion = client.complete(&messages).await?;

    Ok(Json(ChatResponse {
        response: completion.response,
        model: client.model().to_string(),
        usage: completion.usage,
    }))
}

pub fn build_state(config: &RelayConfig) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    let client: Option<Arc<dyn ChatClient>> = match &config.api_key {
        Some(key) => {
            let groq = crate::llm::groq::GroqChatClient::new(
                key,
                config.model.clone(),
                config.base_url.clone(),
            )?;
            Some(Arc::new(groq))
        }
        None => {
            warn!("No upstream credential configured; /api/chat will report a misconfiguration");
            None
        }
    };

    Ok(AppState {
        client,
        model: config.model.clone(),
    })
}
