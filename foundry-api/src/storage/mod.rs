use async_trait::async_trait;
use shared_types::{Agent, AgentCreate, AgentWithMessages, Message, MessageCreate};
use std::sync::Arc;

pub mod bootstrap;
mod sql;

pub use sql::SqlAgentStore;

/// Persistence operations behind the HTTP surface.
///
/// Every call runs in its own transaction: it either commits in full or leaves
/// the store untouched.
#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn list_agents(&self) -> Result<Vec<Agent>, StorageError>;
    async fn create_agent(&self, agent: AgentCreate) -> Result<Agent, StorageError>;
    async fn get_agent(&self, agent_id: &str) -> Result<Agent, StorageError>;
    async fn get_agent_with_messages(
        &self,
        agent_id: &str,
    ) -> Result<AgentWithMessages, StorageError>;
    async fn update_agent(&self, agent_id: &str, agent: AgentCreate)
        -> Result<Agent, StorageError>;
    async fn delete_agent(&self, agent_id: &str) -> Result<(), StorageError>;

    async fn list_messages(&self) -> Result<Vec<Message>, StorageError>;
    async fn create_message(&self, message: MessageCreate) -> Result<Message, StorageError>;
}

pub type SharedStore = Arc<dyn AgentStore>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Constraint(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored timestamp: {0}")]
    Timestamp(String),

    #[error("Column {0} is not valid UTF-8")]
    Encoding(String),

    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StorageError {
    pub(crate) fn agent_not_found(agent_id: &str) -> Self {
        StorageError::NotFound(format!("Agent {} not found", agent_id))
    }

    /// Classify an insert failure by the driver's constraint kind
    pub(crate) fn from_insert(err: sqlx::Error, entity: &str, id: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StorageError::Conflict(format!("{} {} already exists", entity, id));
            }
            if db_err.is_foreign_key_violation() {
                return StorageError::Constraint(format!(
                    "{} {} references a missing row: {}",
                    entity,
                    id,
                    db_err.message()
                ));
            }
        }
        StorageError::Database(err)
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Database(err)
    }
}

/// SQL flavour, picked from the connection URL scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    MySql,
}

impl Dialect {
    pub fn from_url(url: &str) -> Result<Self, StorageError> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "sqlite" => Ok(Dialect::Sqlite),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            _ => Err(StorageError::UnsupportedDatabase(scheme.to_string())),
        }
    }
}
