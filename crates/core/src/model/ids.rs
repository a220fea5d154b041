use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a question inside the question pool.
///
/// A question has no identity beyond where it sits in the pool, so decks and
/// leg queues carry these instead of cloned questions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolIndex(usize);

impl PoolIndex {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the underlying position
    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }
}

/// Key of one user's entry in the session store.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    /// Creates a new `SessionKey`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the key is empty after trimming.
    pub fn new(key: impl Into<String>) -> Result<Self, ParseIdError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                kind: "SessionKey".to_string(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PoolIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoolIndex({})", self.0)
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionKey({:?})", self.0)
    }
}

// ─── Display Implementations ────────────────────────────────────────────────

impl fmt::Display for PoolIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing an identifier from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for PoolIndex {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<usize>()
            .map(PoolIndex::new)
            .map_err(|_| ParseIdError {
                kind: "PoolIndex".to_string(),
            })
    }
}

impl FromStr for SessionKey {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionKey::new(s)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_index_display_and_parse() {
        let idx = PoolIndex::new(42);
        assert_eq!(idx.to_string(), "42");
        assert_eq!("42".parse::<PoolIndex>().unwrap(), idx);
        assert!("forty-two".parse::<PoolIndex>().is_err());
    }

    #[test]
    fn session_key_trims_and_rejects_blank() {
        let key = SessionKey::new("  player-1 ").unwrap();
        assert_eq!(key.as_str(), "player-1");
        assert!(SessionKey::new("   ").is_err());
        assert!("".parse::<SessionKey>().is_err());
    }
}
