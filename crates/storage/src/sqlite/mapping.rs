use quiz_core::model::{Question, QuestionDraft, SessionRecord, SessionState};
use sqlx::Row;
use std::collections::BTreeSet;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn position_to_i64(position: usize) -> Result<i64, StorageError> {
    i64::try_from(position)
        .map_err(|_| StorageError::Serialization("question position overflow".into()))
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let mut options = Vec::with_capacity(5);
    for column in ["option_1", "option_2", "option_3", "option_4", "option_5"] {
        options.push(row.try_get::<String, _>(column).map_err(ser)?);
    }
    let answer_index: i64 = row.try_get("answer_index").map_err(ser)?;
    let answer_index = u8::try_from(answer_index)
        .map_err(|_| StorageError::Serialization(format!("invalid answer_index: {answer_index}")))?;

    QuestionDraft {
        id: row.try_get("id").map_err(ser)?,
        text: row.try_get("text").map_err(ser)?,
        options,
        answer_index,
    }
    .validate()
    .map_err(ser)
}

/// JSON columns for a session record: `(progress, collected_landmarks)`.
pub(crate) fn encode_session(
    record: &SessionRecord,
) -> Result<(Option<String>, String), StorageError> {
    let progress = record
        .progress
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(ser)?;
    let collected = serde_json::to_string(&record.collected_landmarks).map_err(ser)?;
    Ok((progress, collected))
}

pub(crate) fn map_session_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<SessionRecord, StorageError> {
    let progress: Option<String> = row.try_get("progress").map_err(ser)?;
    let collected: String = row.try_get("collected_landmarks").map_err(ser)?;

    let progress = progress
        .map(|raw| serde_json::from_str::<SessionState>(&raw))
        .transpose()
        .map_err(ser)?;
    let collected_landmarks: BTreeSet<usize> = serde_json::from_str(&collected).map_err(ser)?;

    Ok(SessionRecord {
        progress,
        collected_landmarks,
    })
}
