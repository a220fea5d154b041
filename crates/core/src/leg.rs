use serde::{Deserialize, Serialize};

use crate::model::PoolIndex;

/// Questions for the current station-to-station leg.
///
/// A wrong answer appends the same question to the tail, so it comes back
/// after the rest of the leg instead of immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegQueue {
    questions: Vec<PoolIndex>,
    cursor: usize,
}

impl LegQueue {
    #[must_use]
    pub fn new(questions: Vec<PoolIndex>) -> Self {
        Self {
            questions,
            cursor: 0,
        }
    }

    /// Question to serve next, or `None` once the leg is exhausted.
    #[must_use]
    pub fn current(&self) -> Option<PoolIndex> {
        self.questions.get(self.cursor).copied()
    }

    pub fn advance(&mut self) {
        if self.cursor < self.questions.len() {
            self.cursor += 1;
        }
    }

    /// Append the current question to the tail. Does not move the cursor.
    ///
    /// Returns false if the leg was already exhausted.
    pub fn requeue_current(&mut self) -> bool {
        match self.current() {
            Some(idx) => {
                self.questions.push(idx);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions still to be served, retries included.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.questions.len().saturating_sub(self.cursor)
    }

    /// Every entry of the leg so far, served or not, in queue order.
    #[must_use]
    pub fn entries(&self) -> &[PoolIndex] {
        &self.questions
    }
}
