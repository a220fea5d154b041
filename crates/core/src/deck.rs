//! Deck manager: one shuffled, no-repeat order of the pool per playthrough,
//! handed out leg by leg.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use crate::model::{PoolIndex, TravelMode};

/// Questions per leg when stopping at every station.
pub const NORMAL_LEG_SIZE: usize = 7;

/// Express legs are this many times longer than normal ones.
pub const EXPRESS_LEG_FACTOR: usize = 4;

/// Questions per leg in express mode.
pub const EXPRESS_LEG_SIZE: usize = NORMAL_LEG_SIZE * EXPRESS_LEG_FACTOR;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("leg size must be > 0")]
    ZeroLegSize,
}

//
// ─── LEG SIZES ─────────────────────────────────────────────────────────────────
//

/// Per-mode leg sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegSizes {
    normal: usize,
    express: usize,
}

impl Default for LegSizes {
    fn default() -> Self {
        Self {
            normal: NORMAL_LEG_SIZE,
            express: EXPRESS_LEG_SIZE,
        }
    }
}

impl LegSizes {
    /// Sizes derived from the normal leg, keeping express legs four times longer.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::ZeroLegSize` if `normal` is zero.
    pub fn from_normal(normal: usize) -> Result<Self, DeckError> {
        Self::new(normal, normal.saturating_mul(EXPRESS_LEG_FACTOR))
    }

    /// # Errors
    ///
    /// Returns `DeckError::ZeroLegSize` if either size is zero.
    pub fn new(normal: usize, express: usize) -> Result<Self, DeckError> {
        if normal == 0 || express == 0 {
            return Err(DeckError::ZeroLegSize);
        }
        Ok(Self { normal, express })
    }

    /// One question per leg; used when the pool is the load-failure sentinel.
    #[must_use]
    pub fn single() -> Self {
        Self {
            normal: 1,
            express: 1,
        }
    }

    #[must_use]
    pub fn for_mode(&self, mode: TravelMode) -> usize {
        match mode {
            TravelMode::Normal => self.normal,
            TravelMode::Express => self.express,
        }
    }
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// Remaining fresh material for a playthrough, consumed from the front.
///
/// Dealt indices never come back; retries of wrong answers live in the leg
/// queue instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDeck {
    remaining: VecDeque<PoolIndex>,
}

impl QuestionDeck {
    /// Uniformly random permutation of `0..pool_size`.
    pub fn shuffled<R: Rng + ?Sized>(pool_size: usize, rng: &mut R) -> Self {
        let mut order: Vec<PoolIndex> = (0..pool_size).map(PoolIndex::new).collect();
        order.as_mut_slice().shuffle(rng);
        Self::from_order(order)
    }

    /// Deck with a caller-chosen order.
    #[must_use]
    pub fn from_order(order: Vec<PoolIndex>) -> Self {
        Self {
            remaining: order.into(),
        }
    }

    /// Take the next `min(leg_size, remaining)` indices off the front.
    ///
    /// An empty result means the deck is spent.
    pub fn deal(&mut self, leg_size: usize) -> Vec<PoolIndex> {
        let take = leg_size.min(self.remaining.len());
        self.remaining.drain(..take).collect()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }
}
