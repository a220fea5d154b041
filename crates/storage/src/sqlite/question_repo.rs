use quiz_core::model::Question;

use super::SqliteRepository;
use super::mapping::{map_question_row, position_to_i64};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT
                id, text, option_1, option_2, option_3, option_4, option_5, answer_index
            FROM questions
            ORDER BY position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_question_row).collect()
    }

    async fn replace_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query("DELETE FROM questions")
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for (position, question) in questions.iter().enumerate() {
            let options = question.options();
            sqlx::query(
                r"
                INSERT INTO questions (
                    position, id, text, option_1, option_2, option_3, option_4, option_5,
                    answer_index
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ",
            )
            .bind(position_to_i64(position)?)
            .bind(question.id())
            .bind(question.text())
            .bind(&options[0])
            .bind(&options[1])
            .bind(&options[2])
            .bind(&options[3])
            .bind(&options[4])
            .bind(i64::from(question.answer_index()))
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
