use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs versioned migrations for the current schema.
///
/// Version 1 holds the question pool and per-user session records.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS questions (
                    position INTEGER PRIMARY KEY CHECK (position >= 0),
                    id TEXT NOT NULL,
                    text TEXT NOT NULL,
                    option_1 TEXT NOT NULL,
                    option_2 TEXT NOT NULL,
                    option_3 TEXT NOT NULL,
                    option_4 TEXT NOT NULL,
                    option_5 TEXT NOT NULL,
                    answer_index INTEGER NOT NULL CHECK (answer_index BETWEEN 1 AND 5)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        // progress is NULL while the user is at the menu
        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS sessions (
                    session_key TEXT PRIMARY KEY,
                    progress TEXT,
                    collected_landmarks TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)")
            .bind(1_i64)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
    }

    Ok(())
}
