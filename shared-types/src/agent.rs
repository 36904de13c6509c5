use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::message::Message;

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Payload accepted by `POST /agents` and `PUT /agents/{id}`.
///
/// On update the whole payload replaces the stored row, except `id`, which is
/// taken from the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgentCreate {
    pub id: String,
    pub name: String,
    pub role: String,
    pub description: Option<String>,
    pub personality: String,
    pub avatar: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
}

/// A stored agent persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub role: String,
    pub description: Option<String>,
    pub personality: String,
    pub avatar: String,
    pub skills: Vec<String>,
    pub tools: Vec<String>,
    pub provider: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

/// Agent with its full chat history, returned by `GET /agents/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgentWithMessages {
    #[serde(flatten)]
    pub agent: Agent,
    pub messages: Vec<Message>,
}

/// Confirmation body for `DELETE /agents/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeleteResponse {
    pub detail: String,
}

impl DeleteResponse {
    pub fn agent_deleted() -> Self {
        Self {
            detail: "Agent deleted".to_string(),
        }
    }
}
