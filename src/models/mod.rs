pub mod chat;

pub use chat::{ ChatRequest, ChatResponse, ConversationTurn, HealthResponse, Role, TokenUsage };
