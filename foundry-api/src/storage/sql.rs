use super::{AgentStore, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use shared_types::{Agent, AgentCreate, AgentWithMessages, Message, MessageCreate, Source};
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, AnyPool, Row};
use tracing::debug;

// JSON and timestamp columns are cast to character data so databases whose
// columns are DATETIME or JSON read the same way as the migrated TEXT schema.
const SELECT_AGENTS: &str = r#"
    SELECT id, name, role, description, personality, avatar,
           CAST(skills AS CHAR) AS skills,
           CAST(tools AS CHAR) AS tools,
           provider, model,
           CAST(created_at AS CHAR) AS created_at
    FROM agents
"#;

const SELECT_AGENT_BY_ID: &str = r#"
    SELECT id, name, role, description, personality, avatar,
           CAST(skills AS CHAR) AS skills,
           CAST(tools AS CHAR) AS tools,
           provider, model,
           CAST(created_at AS CHAR) AS created_at
    FROM agents
    WHERE id = ?
"#;

const SELECT_MESSAGES: &str = r#"
    SELECT id, agent_id, role, content,
           CAST(trace AS CHAR) AS trace,
           CAST(sources AS CHAR) AS sources,
           CAST(messages.timestamp AS CHAR) AS timestamp
    FROM messages
    ORDER BY id DESC
"#;

const SELECT_MESSAGE_BY_ID: &str = r#"
    SELECT id, agent_id, role, content,
           CAST(trace AS CHAR) AS trace,
           CAST(sources AS CHAR) AS sources,
           CAST(messages.timestamp AS CHAR) AS timestamp
    FROM messages
    WHERE id = ?
"#;

const SELECT_MESSAGES_FOR_AGENT: &str = r#"
    SELECT id, agent_id, role, content,
           CAST(trace AS CHAR) AS trace,
           CAST(sources AS CHAR) AS sources,
           CAST(messages.timestamp AS CHAR) AS timestamp
    FROM messages
    WHERE agent_id = ?
    ORDER BY messages.timestamp ASC, id ASC
"#;

/// `AgentStore` over any pool sqlx can open (SQLite or MySQL)
#[derive(Clone)]
pub struct SqlAgentStore {
    pool: AnyPool,
}

impl SqlAgentStore {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

#[async_trait]
impl AgentStore for SqlAgentStore {
    async fn list_agents(&self) -> Result<Vec<Agent>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(SELECT_AGENTS).fetch_all(&mut *tx).await?;
        tx.commit().await?;

        rows.iter().map(agent_from_row).collect()
    }

    async fn create_agent(&self, agent: AgentCreate) -> Result<Agent, StorageError> {
        let skills = serde_json::to_string(&agent.skills)?;
        let tools = serde_json::to_string(&agent.tools)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO agents
                (id, name, role, description, personality, avatar, skills, tools, provider, model)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&agent.id)
        .bind(&agent.name)
        .bind(&agent.role)
        .bind(&agent.description)
        .bind(&agent.personality)
        .bind(&agent.avatar)
        .bind(skills)
        .bind(tools)
        .bind(&agent.provider)
        .bind(&agent.model)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::from_insert(e, "Agent", &agent.id))?;

        let created = fetch_agent(&mut *tx, &agent.id).await?;
        tx.commit().await?;

        debug!(agent_id = %agent.id, "Inserted agent row");
        created.ok_or_else(|| StorageError::agent_not_found(&agent.id))
    }

    async fn get_agent(&self, agent_id: &str) -> Result<Agent, StorageError> {
        let mut tx = self.pool.begin().await?;
        let agent = fetch_agent(&mut *tx, agent_id).await?;
        tx.commit().await?;

        agent.ok_or_else(|| StorageError::agent_not_found(agent_id))
    }

    async fn get_agent_with_messages(
        &self,
        agent_id: &str,
    ) -> Result<AgentWithMessages, StorageError> {
        let mut tx = self.pool.begin().await?;
        let agent = match fetch_agent(&mut *tx, agent_id).await? {
            Some(agent) => agent,
            None => return Err(StorageError::agent_not_found(agent_id)),
        };

        let rows = sqlx::query(SELECT_MESSAGES_FOR_AGENT)
            .bind(agent_id)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        let messages = rows
            .iter()
            .map(message_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AgentWithMessages { agent, messages })
    }

    async fn update_agent(
        &self,
        agent_id: &str,
        agent: AgentCreate,
    ) -> Result<Agent, StorageError> {
        let skills = serde_json::to_string(&agent.skills)?;
        let tools = serde_json::to_string(&agent.tools)?;

        let mut tx = self.pool.begin().await?;
        let exists = sqlx::query("SELECT id FROM agents WHERE id = ?")
            .bind(agent_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !exists {
            return Err(StorageError::agent_not_found(agent_id));
        }

        sqlx::query(
            r#"
            UPDATE agents
            SET name = ?, role = ?, description = ?, personality = ?, avatar = ?,
                skills = ?, tools = ?, provider = ?, model = ?
            WHERE id = ?
            "#,
        )
        .bind(&agent.name)
        .bind(&agent.role)
        .bind(&agent.description)
        .bind(&agent.personality)
        .bind(&agent.avatar)
        .bind(skills)
        .bind(tools)
        .bind(&agent.provider)
        .bind(&agent.model)
        .bind(agent_id)
        .execute(&mut *tx)
        .await?;

        let updated = fetch_agent(&mut *tx, agent_id).await?;
        tx.commit().await?;

        updated.ok_or_else(|| StorageError::agent_not_found(agent_id))
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        // messages go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(agent_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::agent_not_found(agent_id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_messages(&self) -> Result<Vec<Message>, StorageError> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(SELECT_MESSAGES).fetch_all(&mut *tx).await?;
        tx.commit().await?;

        rows.iter().map(message_from_row).collect()
    }

    async fn create_message(&self, message: MessageCreate) -> Result<Message, StorageError> {
        let trace = message
            .trace
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let sources = message
            .sources
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO messages (id, agent_id, role, content, trace, sources)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.agent_id)
        .bind(&message.role)
        .bind(&message.content)
        .bind(trace)
        .bind(sources)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::from_insert(e, "Message", &message.id))?;

        let row = sqlx::query(SELECT_MESSAGE_BY_ID)
            .bind(&message.id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(message_id = %message.id, agent_id = %message.agent_id, "Inserted message row");
        message_from_row(&row)
    }
}

async fn fetch_agent(
    conn: &mut AnyConnection,
    agent_id: &str,
) -> Result<Option<Agent>, StorageError> {
    let row = sqlx::query(SELECT_AGENT_BY_ID)
        .bind(agent_id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(agent_from_row).transpose()
}

fn agent_from_row(row: &AnyRow) -> Result<Agent, StorageError> {
    let created_at = required_text(row, "created_at")?;

    Ok(Agent {
        id: required_text(row, "id")?,
        name: required_text(row, "name")?,
        role: required_text(row, "role")?,
        description: text_column(row, "description")?,
        personality: text_column(row, "personality")?.unwrap_or_default(),
        avatar: text_column(row, "avatar")?.unwrap_or_default(),
        skills: decode_list(text_column(row, "skills")?)?,
        tools: decode_list(text_column(row, "tools")?)?,
        provider: required_text(row, "provider")?,
        model: required_text(row, "model")?,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn message_from_row(row: &AnyRow) -> Result<Message, StorageError> {
    let timestamp = required_text(row, "timestamp")?;

    let trace: Option<Vec<serde_json::Value>> = text_column(row, "trace")?
        .map(|s| serde_json::from_str(&s))
        .transpose()?;
    let sources: Option<Vec<Source>> = text_column(row, "sources")?
        .map(|s| serde_json::from_str(&s))
        .transpose()?;

    Ok(Message {
        id: required_text(row, "id")?,
        agent_id: required_text(row, "agent_id")?,
        role: required_text(row, "role")?,
        content: required_text(row, "content")?,
        trace,
        sources,
        timestamp: parse_timestamp(&timestamp)?,
    })
}

/// Read a character column that the driver may hand over as text or as bytes.
///
/// MySQL reports `TEXT` columns with its blob wire types, which the `Any`
/// driver surfaces as byte values.
fn text_column(row: &AnyRow, column: &str) -> Result<Option<String>, StorageError> {
    match row.try_get::<Option<String>, _>(column) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            let bytes: Option<Vec<u8>> = row.try_get(column)?;
            bytes
                .map(String::from_utf8)
                .transpose()
                .map_err(|_| StorageError::Encoding(column.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn required_text(row: &AnyRow, column: &str) -> Result<String, StorageError> {
    text_column(row, column)?.ok_or_else(|| {
        StorageError::Database(sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: "unexpected NULL".into(),
        })
    })
}

fn decode_list(raw: Option<String>) -> Result<Vec<String>, StorageError> {
    match raw {
        Some(s) if !s.trim().is_empty() && s != "null" => Ok(serde_json::from_str(&s)?),
        _ => Ok(Vec::new()),
    }
}

/// Stored timestamps are RFC 3339 text written by the column default. Rows
/// from databases created before the versioned migrations may carry the plain
/// `YYYY-MM-DD HH:MM:SS` form, read as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| StorageError::Timestamp(raw.to_string()))
}
