use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Grounding citation attached to an assistant reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Payload accepted by `POST /messages`.
///
/// Trace steps are stored as-is. The frontend writes
/// `{label, type, status, timestamp, duration?, detail?}` objects, but nothing
/// here checks that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MessageCreate {
    pub id: String,
    pub agent_id: String,
    pub role: String,
    pub content: String,
    pub trace: Option<Vec<serde_json::Value>>,
    pub sources: Option<Vec<Source>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Message {
    pub id: String,
    pub agent_id: String,
    pub role: String,
    pub content: String,
    pub trace: Option<Vec<serde_json::Value>>,
    pub sources: Option<Vec<Source>>,
    pub timestamp: DateTime<Utc>,
}
