use chrono::Utc;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod agent;
pub mod message;
pub mod typescript_gen;

pub use typescript_gen::generate_typescript_definitions;

pub use agent::{Agent, AgentCreate, AgentWithMessages, DeleteResponse};
pub use message::{Message, MessageCreate, Source};

// Shared models for the foundry API and its frontend

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
