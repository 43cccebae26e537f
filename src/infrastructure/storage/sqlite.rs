//! SQLite conversation store with connection pooling

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::info;

use super::migrations::run_migrations;
use crate::domain::{
    ConversationRepository, ConversationTurn, DomainError, MessageRole, Session, SessionSummary,
};

const IN_MEMORY: &str = ":memory:";

/// SQLite storage configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file, or `:memory:`
    pub path: String,
    pub max_connections: u32,
}

impl SqliteConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY)
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY
    }
}

/// Sessions and messages persisted in SQLite
#[derive(Debug, Clone)]
pub struct SqliteConversationRepository {
    pool: SqlitePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database, creating the file and schema when missing
    pub async fn connect(config: &SqliteConfig) -> Result<Self, DomainError> {
        let options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DomainError::storage(format!("Invalid SQLite options: {}", e)))?
        } else {
            if let Some(parent) = std::path::Path::new(&config.path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        DomainError::storage(format!(
                            "Failed to create database directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
            }

            SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true)
        };
        let options = options.foreign_keys(true);

        // Every in-memory connection is a separate database.
        let max_connections = if config.is_in_memory() {
            1
        } else {
            config.max_connections
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to SQLite: {}", e)))?;

        run_migrations(&pool).await?;

        info!(path = %config.path, "SQLite database connected");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }

    async fn session_exists(&self, id: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sessions WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to look up session: {}", e)))
    }
}

fn turn_from_row(row: &SqliteRow) -> Result<ConversationTurn, DomainError> {
    let role: String = get_column(row, "role")?;

    Ok(ConversationTurn {
        id: get_column(row, "id")?,
        session_id: get_column(row, "session_id")?,
        role: role.parse()?,
        content: get_column(row, "content")?,
        created_at: get_column(row, "created_at")?,
    })
}

fn summary_from_row(row: &SqliteRow) -> Result<SessionSummary, DomainError> {
    Ok(SessionSummary {
        id: get_column(row, "id")?,
        created_at: get_column(row, "created_at")?,
        updated_at: get_column(row, "updated_at")?,
        message_count: get_column(row, "message_count")?,
    })
}

fn get_column<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| DomainError::storage(format!("Failed to read column '{}': {}", column, e)))
}

const SUMMARY_SELECT: &str = r#"
    SELECT id, created_at, updated_at,
           (SELECT COUNT(*) FROM messages WHERE session_id = sessions.id) AS message_count
    FROM sessions
"#;

#[async_trait]
impl ConversationRepository for SqliteConversationRepository {
    async fn ensure_session(&self, id: &str) -> Result<Session, DomainError> {
        let now = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO sessions (id, created_at, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET updated_at = excluded.updated_at
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to upsert session: {}", e)))?;

        Ok(Session {
            id: get_column(&row, "id")?,
            created_at: get_column(&row, "created_at")?,
            updated_at: get_column(&row, "updated_at")?,
        })
    }

    async fn create_session(&self, id: &str) -> Result<bool, DomainError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO sessions (id, created_at, updated_at) VALUES (?, ?, ?) ON CONFLICT(id) DO NOTHING",
        )
        .bind(id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create session: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_session(&self, id: &str) -> Result<Option<SessionSummary>, DomainError> {
        let query = format!("{} WHERE id = ?", SUMMARY_SELECT);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get session: {}", e)))?;

        row.as_ref().map(summary_from_row).transpose()
    }

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, DomainError> {
        let query = format!("{} ORDER BY updated_at DESC, rowid DESC", SUMMARY_SELECT);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list sessions: {}", e)))?;

        rows.iter().map(summary_from_row).collect()
    }

    async fn delete_session(&self, id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete session: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_session(&self, id: &str) -> Result<bool, DomainError> {
        if !self.session_exists(id).await? {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM messages WHERE session_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to clear messages: {}", e)))?;

        sqlx::query("UPDATE sessions SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to touch session: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        Ok(true)
    }

    async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ConversationTurn, DomainError> {
        let created_at: DateTime<Utc> = Utc::now();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO messages (session_id, role, content, created_at) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(session_id)
        .bind(role.as_str())
        .bind(content)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to store message: {}", e)))?;

        Ok(ConversationTurn {
            id,
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            created_at,
        })
    }

    async fn recent_messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationTurn>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, role, content, created_at
            FROM messages
            WHERE session_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(session_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load recent messages: {}", e)))?;

        let mut turns = rows
            .iter()
            .map(turn_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        turns.reverse();

        Ok(turns)
    }

    async fn messages(&self, session_id: &str) -> Result<Vec<ConversationTurn>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, role, content, created_at
            FROM messages
            WHERE session_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load messages: {}", e)))?;

        rows.iter().map(turn_from_row).collect()
    }
}
