use async_trait::async_trait;
use quiz_core::model::{Question, SessionKey, SessionRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Per-user key-value store for session records.
///
/// Each key is isolated; the store does not coordinate concurrent writers to
/// the same key. Callers serialize access per session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a user's record, or `None` if the user has never been seen.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be read or decoded.
    async fn load(&self, key: &SessionKey) -> Result<Option<SessionRecord>, StorageError>;

    /// Persist or replace a user's record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save(&self, key: &SessionKey, record: &SessionRecord) -> Result<(), StorageError>;

    /// Forget a user entirely, landmark collection included.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails. Deleting a missing key is not an error.
    async fn delete(&self, key: &SessionKey) -> Result<(), StorageError>;
}

/// Source of the question pool.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// All questions in pool order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if questions cannot be read or one is malformed.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Replace the whole pool, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the questions cannot be stored.
    async fn replace_questions(&self, questions: &[Question]) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sessions: Arc<Mutex<HashMap<SessionKey, SessionRecord>>>,
    questions: Arc<Mutex<Vec<Question>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with a question pool.
    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            sessions: Arc::default(),
            questions: Arc::new(Mutex::new(questions)),
        }
    }
}

#[async_trait]
impl SessionStore for InMemoryRepository {
    async fn load(&self, key: &SessionKey) -> Result<Option<SessionRecord>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn save(&self, key: &SessionKey, record: &SessionRecord) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.clone(), record.clone());
        Ok(())
    }

    async fn delete(&self, key: &SessionKey) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn replace_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = questions.to_vec();
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionStore>,
    pub questions: Arc<dyn QuestionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let sessions: Arc<dyn SessionStore> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo);
        Self {
            sessions,
            questions,
        }
    }
}
