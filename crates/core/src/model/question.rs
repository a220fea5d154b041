use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::PoolIndex;

/// Every question offers exactly this many choices.
pub const OPTION_COUNT: usize = 5;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question {id} has {count} options, expected 5")]
    WrongOptionCount { id: String, count: usize },

    #[error("question {id} has answer index {index}, expected 1..=5")]
    InvalidAnswerIndex { id: String, index: u8 },

    #[error("question pool cannot be empty")]
    EmptyPool,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it arrives from a loader or a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    /// 1-based ordinal of the correct option.
    pub answer_index: u8,
}

impl QuestionDraft {
    /// Check structural well-formedness. Content itself is not judged.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for a blank id or text, an option count other
    /// than five, or an answer ordinal outside `1..=5`.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = self.id.trim().to_owned();
        if id.is_empty() {
            return Err(QuestionError::EmptyId);
        }
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if self.options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount {
                id,
                count: self.options.len(),
            });
        }
        if !(1..=OPTION_COUNT).contains(&usize::from(self.answer_index)) {
            return Err(QuestionError::InvalidAnswerIndex {
                id,
                index: self.answer_index,
            });
        }

        Ok(Question {
            id,
            text: self.text,
            options: self.options,
            answer_index: self.answer_index,
        })
    }
}

/// A five-choice trivia question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: String,
    text: String,
    options: Vec<String>,
    answer_index: u8,
}

impl Question {
    /// Shorthand for building and validating a draft.
    ///
    /// # Errors
    ///
    /// See [`QuestionDraft::validate`].
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        answer_index: u8,
    ) -> Result<Self, QuestionError> {
        QuestionDraft {
            id: id.into(),
            text: text.into(),
            options,
            answer_index,
        }
        .validate()
    }

    /// Placeholder served when the pool could not be loaded.
    #[must_use]
    pub fn load_failure() -> Self {
        Self {
            id: "load-failure".to_owned(),
            text: "The question data could not be loaded. Pick the first option to continue."
                .to_owned(),
            options: vec![
                "Continue".to_owned(),
                "-".to_owned(),
                "-".to_owned(),
                "-".to_owned(),
                "-".to_owned(),
            ],
            answer_index: 1,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer_index(&self) -> u8 {
        self.answer_index
    }

    /// Text of the correct option.
    #[must_use]
    pub fn correct_option(&self) -> &str {
        let idx = usize::from(self.answer_index).saturating_sub(1);
        self.options.get(idx).map_or("", String::as_str)
    }

    /// Returns true when `choice` (1-based) lies within the offered options.
    #[must_use]
    pub fn accepts_choice(&self, choice: u8) -> bool {
        (1..=self.options.len()).contains(&usize::from(choice))
    }

    #[must_use]
    pub fn is_correct(&self, choice: u8) -> bool {
        choice == self.answer_index
    }

    /// Convert back into a draft, e.g. for persistence.
    #[must_use]
    pub fn to_draft(&self) -> QuestionDraft {
        QuestionDraft {
            id: self.id.clone(),
            text: self.text.clone(),
            options: self.options.clone(),
            answer_index: self.answer_index,
        }
    }
}

//
// ─── POOL ──────────────────────────────────────────────────────────────────────
//

/// Read-only, ordered question pool shared by every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPool {
    questions: Vec<Question>,
    degraded: bool,
}

impl QuestionPool {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPool` if no questions are given.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::EmptyPool);
        }
        Ok(Self {
            questions,
            degraded: false,
        })
    }

    /// Single-question pool used after a failed load.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            questions: vec![Question::load_failure()],
            degraded: true,
        }
    }

    /// Build a pool from a loader result, falling back to the sentinel pool
    /// when loading failed or produced nothing.
    #[must_use]
    pub fn load_or_sentinel<E>(loaded: Result<Vec<Question>, E>) -> Self {
        loaded
            .ok()
            .and_then(|questions| Self::new(questions).ok())
            .unwrap_or_else(Self::sentinel)
    }

    /// True when this pool is the load-failure placeholder.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: PoolIndex) -> Option<&Question> {
        self.questions.get(index.value())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        ["a", "b", "c", "d", "e"].iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn validate_happy_path() {
        let q = Question::new(" q1 ", "What?", options(), 3).unwrap();
        assert_eq!(q.id(), "q1");
        assert_eq!(q.correct_option(), "c");
        assert!(q.is_correct(3));
        assert!(!q.is_correct(2));
    }

    #[test]
    fn validate_rejects_wrong_option_count() {
        let err = Question::new("q1", "What?", vec!["a".into()], 1).unwrap_err();
        assert_eq!(
            err,
            QuestionError::WrongOptionCount {
                id: "q1".into(),
                count: 1
            }
        );
    }

    #[test]
    fn validate_rejects_answer_out_of_range() {
        for bad in [0, 6] {
            let err = Question::new("q1", "What?", options(), bad).unwrap_err();
            assert!(matches!(err, QuestionError::InvalidAnswerIndex { .. }));
        }
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert_eq!(
            Question::new(" ", "What?", options(), 1).unwrap_err(),
            QuestionError::EmptyId
        );
        assert_eq!(
            Question::new("q1", "  ", options(), 1).unwrap_err(),
            QuestionError::EmptyText
        );
    }

    #[test]
    fn accepts_choice_follows_option_count() {
        let q = Question::new("q1", "What?", options(), 1).unwrap();
        assert!(!q.accepts_choice(0));
        assert!(q.accepts_choice(1));
        assert!(q.accepts_choice(5));
        assert!(!q.accepts_choice(6));
    }

    #[test]
    fn load_or_sentinel_falls_back_on_error_and_empty() {
        let failed: Result<Vec<Question>, &str> = Err("file missing");
        let pool = QuestionPool::load_or_sentinel(failed);
        assert!(pool.is_degraded());
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get(PoolIndex::new(0)).unwrap().id(), "load-failure");

        let empty: Result<Vec<Question>, &str> = Ok(Vec::new());
        assert!(QuestionPool::load_or_sentinel(empty).is_degraded());
    }

    #[test]
    fn load_or_sentinel_keeps_loaded_questions() {
        let q = Question::new("q1", "What?", options(), 1).unwrap();
        let loaded: Result<Vec<Question>, &str> = Ok(vec![q.clone()]);
        let pool = QuestionPool::load_or_sentinel(loaded);
        assert!(!pool.is_degraded());
        assert_eq!(pool.get(PoolIndex::new(0)), Some(&q));
        assert_eq!(pool.get(PoolIndex::new(1)), None);
    }

    #[test]
    fn sentinel_question_is_well_formed() {
        let q = Question::load_failure();
        assert!(q.to_draft().validate().is_ok());
    }
}
