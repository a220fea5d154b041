//! Per-session progression state machine.
//!
//! ```text
//! MENU -> IN_LEG -> LEG_JUDGEMENT -> IN_LEG | STATION_ARRIVAL | GOAL
//!                                    STATION_ARRIVAL -> IN_LEG | GOAL
//! ```
//!
//! Every transition is a pure update of a [`SessionRecord`]. Requests made from
//! the wrong phase are rejected without touching the record.

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

use crate::deck::{LegSizes, QuestionDeck};
use crate::leg::LegQueue;
use crate::model::{
    Judgement, LandmarkCatalog, Phase, PoolIndex, Question, QuestionPool, RouteTable,
    SessionRecord, SessionState, TravelMode,
};
use crate::route::next_station;
use crate::speed::Speed;
use crate::time::elapsed_secs;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error("no game in progress")]
    MissingState,

    #[error("cannot {action} while in {actual}")]
    InvalidTransition {
        action: &'static str,
        actual: Phase,
    },

    #[error("choice {choice} is out of range 1..={options}")]
    ChoiceOutOfRange { choice: u8, options: usize },

    #[error("the leg has no question to serve")]
    NoCurrentQuestion,

    #[error("question {0} is not in the pool")]
    UnknownQuestion(PoolIndex),

    #[error("station {0} is the terminal and has no next stop")]
    AtTerminal(usize),
}

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

/// Tunables for the progression rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameConfig {
    pub leg_sizes: LegSizes,
    pub cruise_speed: Speed,
}

impl GameConfig {
    /// Leg size for `mode`; a degraded pool always deals single-question legs.
    #[must_use]
    pub fn leg_size(&self, mode: TravelMode, pool: &QuestionPool) -> usize {
        if pool.is_degraded() {
            LegSizes::single().for_mode(mode)
        } else {
            self.leg_sizes.for_mode(mode)
        }
    }
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// A validated answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    /// 1-based option ordinal.
    pub choice: u8,
    /// Speed the client displayed when the answer was given.
    pub client_speed: Speed,
    /// Client-side verdict on whether the station's landmark was reached.
    pub landmark_acquired: bool,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Applies progression rules against shared, read-only game data.
#[derive(Debug, Clone, Copy)]
pub struct ProgressionController<'a> {
    pool: &'a QuestionPool,
    route: &'a RouteTable,
    landmarks: &'a LandmarkCatalog,
    config: GameConfig,
}

impl<'a> ProgressionController<'a> {
    #[must_use]
    pub fn new(
        pool: &'a QuestionPool,
        route: &'a RouteTable,
        landmarks: &'a LandmarkCatalog,
        config: GameConfig,
    ) -> Self {
        Self {
            pool,
            route,
            landmarks,
            config,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &'a QuestionPool {
        self.pool
    }

    #[must_use]
    pub fn route(&self) -> &'a RouteTable {
        self.route
    }

    #[must_use]
    pub fn landmarks(&self) -> &'a LandmarkCatalog {
        self.landmarks
    }

    /// Begin a fresh playthrough, replacing any game in progress.
    ///
    /// The landmark collection is left as is.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::AtTerminal` if the route has no second station.
    pub fn start<'r, R: Rng + ?Sized>(
        &self,
        record: &'r mut SessionRecord,
        mode: TravelMode,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<&'r SessionState, ProgressionError> {
        let deck = QuestionDeck::shuffled(self.pool.len(), rng);
        self.start_with_deck(record, mode, deck, now)
    }

    /// Like [`start`](Self::start) with a caller-supplied deck order.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::AtTerminal` if the route has no second station.
    pub fn start_with_deck<'r>(
        &self,
        record: &'r mut SessionRecord,
        mode: TravelMode,
        mut deck: QuestionDeck,
        now: DateTime<Utc>,
    ) -> Result<&'r SessionState, ProgressionError> {
        let next = next_station(self.route, 0, mode).ok_or(ProgressionError::AtTerminal(0))?;
        let leg_size = self.config.leg_size(mode, self.pool);
        let leg = LegQueue::new(deck.deal(leg_size));

        let state = record.progress.insert(SessionState {
            mode,
            phase: Phase::InLeg,
            current_station: 0,
            next_station: next,
            deck,
            leg,
            leg_size,
            leg_number: 1,
            score: 0,
            speed: self.config.cruise_speed,
            total_answered: 0,
            question_started_at: now,
            last_judgement: None,
        });
        Ok(state)
    }

    /// Question currently on screen, if the playthrough is in a leg.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::NoCurrentQuestion` for an exhausted leg and
    /// `ProgressionError::UnknownQuestion` if the leg references a missing entry.
    pub fn current_question(&self, state: &SessionState) -> Result<&'a Question, ProgressionError> {
        let idx = state
            .leg
            .current()
            .ok_or(ProgressionError::NoCurrentQuestion)?;
        self.pool
            .get(idx)
            .ok_or(ProgressionError::UnknownQuestion(idx))
    }

    /// Judge an answer to the current question.
    ///
    /// Correct: score and answer count go up, speed gains a time bonus, the
    /// station's landmark may be collected, and the leg moves on. Wrong: only
    /// the answer count goes up, speed drops, and the question is queued again
    /// at the end of the leg.
    ///
    /// # Errors
    ///
    /// Returns `MissingState` with no game, `InvalidTransition` outside
    /// `InLeg`, `ChoiceOutOfRange` for an ordinal the question does not offer.
    pub fn submit_answer<'r>(
        &self,
        record: &'r mut SessionRecord,
        answer: Answer,
        now: DateTime<Utc>,
    ) -> Result<&'r Judgement, ProgressionError> {
        let state = record
            .progress
            .as_mut()
            .ok_or(ProgressionError::MissingState)?;
        expect_phase(state, Phase::InLeg, "answer")?;

        let idx = state
            .leg
            .current()
            .ok_or(ProgressionError::NoCurrentQuestion)?;
        let question = self
            .pool
            .get(idx)
            .ok_or(ProgressionError::UnknownQuestion(idx))?;
        if !question.accepts_choice(answer.choice) {
            return Err(ProgressionError::ChoiceOutOfRange {
                choice: answer.choice,
                options: question.options().len(),
            });
        }

        let correct = question.is_correct(answer.choice);
        state.total_answered = state.total_answered.saturating_add(1);

        let mut collected_landmark = None;
        if correct {
            state.score = state.score.saturating_add(1);
            let elapsed = elapsed_secs(state.question_started_at, now);
            state.speed = Speed::after_correct(answer.client_speed, elapsed);
            state.leg.advance();

            let station = state.current_station;
            if answer.landmark_acquired
                && self.landmarks.get(station).is_some()
                && record.collected_landmarks.insert(station)
            {
                collected_landmark = Some(station);
            }
        } else {
            state.speed = Speed::after_wrong(answer.client_speed);
            state.leg.requeue_current();
            state.leg.advance();
        }

        state.phase = Phase::LegJudgement;
        let judgement = state.last_judgement.insert(Judgement {
            question: idx,
            chosen: answer.choice,
            correct,
            correct_answer: question.correct_option().to_owned(),
            collected_landmark,
        });
        Ok(judgement)
    }

    /// Leave the judgement screen.
    ///
    /// Back to the next question while the leg has work left. At the end of
    /// the leg the train arrives at the next station, unless the deck is spent
    /// and that station is the terminal, which ends the game.
    ///
    /// # Errors
    ///
    /// Returns `MissingState` with no game, `InvalidTransition` outside
    /// `LegJudgement`.
    pub fn acknowledge(
        &self,
        record: &mut SessionRecord,
        now: DateTime<Utc>,
    ) -> Result<Phase, ProgressionError> {
        let state = record
            .progress
            .as_mut()
            .ok_or(ProgressionError::MissingState)?;
        expect_phase(state, Phase::LegJudgement, "acknowledge")?;

        state.last_judgement = None;
        state.phase = if !state.leg.is_exhausted() {
            state.question_started_at = now;
            Phase::InLeg
        } else if state.deck.is_exhausted() && self.route.is_terminal(state.next_station) {
            state.current_station = state.next_station;
            Phase::Goal
        } else {
            Phase::StationArrival
        };
        Ok(state.phase)
    }

    /// Leave the station the train just arrived at.
    ///
    /// Ends the game at the terminal or when no fresh questions remain;
    /// otherwise deals the next leg and resets to cruise speed.
    ///
    /// # Errors
    ///
    /// Returns `MissingState` with no game, `InvalidTransition` outside
    /// `StationArrival`.
    pub fn depart(
        &self,
        record: &mut SessionRecord,
        now: DateTime<Utc>,
    ) -> Result<Phase, ProgressionError> {
        let state = record
            .progress
            .as_mut()
            .ok_or(ProgressionError::MissingState)?;
        expect_phase(state, Phase::StationArrival, "depart")?;

        let arrived = state.next_station;
        let upcoming = if self.route.is_terminal(arrived) || state.deck.is_exhausted() {
            None
        } else {
            Some(
                next_station(self.route, arrived, state.mode)
                    .ok_or(ProgressionError::AtTerminal(arrived))?,
            )
        };

        state.current_station = arrived;
        let Some(next) = upcoming else {
            state.phase = Phase::Goal;
            return Ok(state.phase);
        };

        state.next_station = next;
        state.leg = LegQueue::new(state.deck.deal(state.leg_size));
        state.leg_number = state.leg_number.saturating_add(1);
        state.speed = self.config.cruise_speed;
        state.question_started_at = now;
        state.phase = Phase::InLeg;
        Ok(state.phase)
    }
}

fn expect_phase(
    state: &SessionState,
    expected: Phase,
    action: &'static str,
) -> Result<(), ProgressionError> {
    if state.phase == expected {
        Ok(())
    } else {
        Err(ProgressionError::InvalidTransition {
            action,
            actual: state.phase,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
