//! Schema migrations for the SQLite conversation store

use sqlx::SqlitePool;
use tracing::info;

use crate::domain::DomainError;

/// A forward-only schema change
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: &'static str,
    /// Statements applied in order
    pub statements: &'static [&'static str],
}

/// All migrations, oldest first
pub fn conversation_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            description: "Create sessions and messages tables",
            statements: &[
                r#"
                CREATE TABLE IF NOT EXISTS sessions (
                    id TEXT PRIMARY KEY,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
                r#"
                CREATE TABLE IF NOT EXISTS messages (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    session_id TEXT NOT NULL,
                    role TEXT NOT NULL,
                    content TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE
                )
                "#,
            ],
        },
        Migration {
            version: 2,
            description: "Index messages and sessions",
            statements: &[
                "CREATE INDEX IF NOT EXISTS idx_messages_session_id ON messages(session_id)",
                "CREATE INDEX IF NOT EXISTS idx_messages_created_at ON messages(created_at)",
                "CREATE INDEX IF NOT EXISTS idx_sessions_updated_at ON sessions(updated_at)",
            ],
        },
    ]
}

/// Apply every migration not yet recorded in `_migrations`
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            installed_on TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

    for migration in conversation_migrations() {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = ?)")
                .bind(migration.version)
                .fetch_one(pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            continue;
        }

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin migration: {}", e)))?;

        for statement in migration.statements {
            sqlx::query(statement).execute(&mut *tx).await.map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;
        }

        sqlx::query("INSERT INTO _migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        info!(
            version = migration.version,
            description = migration.description,
            "Applied migration"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let versions: Vec<i64> = conversation_migrations().iter().map(|m| m.version).collect();
        let mut sorted = versions.clone();
        sorted.sort();
        sorted.dedup();

        assert_eq!(versions, sorted);
    }

    #[test]
    fn test_messages_cascade_on_session_delete() {
        let migrations = conversation_migrations();
        let schema = migrations[0].statements.join("\n");

        assert!(schema.contains("ON DELETE CASCADE"));
    }
}
