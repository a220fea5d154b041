use chrono::Utc;
use quiz_core::model::{SessionKey, SessionRecord};

use super::SqliteRepository;
use super::mapping::{encode_session, map_session_row};
use crate::repository::{SessionStore, StorageError};

#[async_trait::async_trait]
impl SessionStore for SqliteRepository {
    async fn load(&self, key: &SessionKey) -> Result<Option<SessionRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT progress, collected_landmarks
            FROM sessions
            WHERE session_key = ?1
            ",
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_session_row).transpose()
    }

    async fn save(&self, key: &SessionKey, record: &SessionRecord) -> Result<(), StorageError> {
        let (progress, collected) = encode_session(record)?;

        sqlx::query(
            r"
            INSERT INTO sessions (session_key, progress, collected_landmarks, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(session_key) DO UPDATE SET
                progress = excluded.progress,
                collected_landmarks = excluded.collected_landmarks,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.as_str())
        .bind(progress)
        .bind(collected)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, key: &SessionKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM sessions WHERE session_key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
