use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::deck::QuestionDeck;
use crate::leg::LegQueue;
use crate::model::{PoolIndex, TravelMode};
use crate::speed::Speed;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where an active playthrough sits in the progression state machine.
///
/// The menu is not a phase: it is the absence of a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// A question is on screen.
    InLeg,
    /// The last answer's result is on screen.
    LegJudgement,
    /// The leg is finished and the train stands at `next_station`.
    StationArrival,
    /// The playthrough is over.
    Goal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::InLeg => "in_leg",
            Phase::LegJudgement => "leg_judgement",
            Phase::StationArrival => "station_arrival",
            Phase::Goal => "goal",
        };
        f.write_str(name)
    }
}

//
// ─── JUDGEMENT ─────────────────────────────────────────────────────────────────
//

/// Outcome of the most recent answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    pub question: PoolIndex,
    pub chosen: u8,
    pub correct: bool,
    pub correct_answer: String,
    /// Station index of a landmark collected by this answer, if any.
    pub collected_landmark: Option<usize>,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Transient progression data for one playthrough.
///
/// Only the progression controller mutates it. Invariants while not at the
/// goal: `current_station < next_station <= last_index`, every pool index is
/// in at most one of deck / leg / answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) mode: TravelMode,
    pub(crate) phase: Phase,
    pub(crate) current_station: usize,
    pub(crate) next_station: usize,
    pub(crate) deck: QuestionDeck,
    pub(crate) leg: LegQueue,
    pub(crate) leg_size: usize,
    pub(crate) leg_number: u32,
    pub(crate) score: u32,
    pub(crate) speed: Speed,
    pub(crate) total_answered: u32,
    pub(crate) question_started_at: DateTime<Utc>,
    pub(crate) last_judgement: Option<Judgement>,
}

impl SessionState {
    #[must_use]
    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_station(&self) -> usize {
        self.current_station
    }

    #[must_use]
    pub fn next_station(&self) -> usize {
        self.next_station
    }

    #[must_use]
    pub fn deck(&self) -> &QuestionDeck {
        &self.deck
    }

    #[must_use]
    pub fn leg(&self) -> &LegQueue {
        &self.leg
    }

    #[must_use]
    pub fn leg_size(&self) -> usize {
        self.leg_size
    }

    /// 1-based number of the leg being travelled.
    #[must_use]
    pub fn leg_number(&self) -> u32 {
        self.leg_number
    }

    /// Distinct questions answered correctly.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn speed(&self) -> Speed {
        self.speed
    }

    /// Every submission, right or wrong.
    #[must_use]
    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    #[must_use]
    pub fn question_started_at(&self) -> DateTime<Utc> {
        self.question_started_at
    }

    #[must_use]
    pub fn last_judgement(&self) -> Option<&Judgement> {
        self.last_judgement.as_ref()
    }

    #[must_use]
    pub fn is_goal(&self) -> bool {
        self.phase == Phase::Goal
    }
}

//
// ─── SESSION RECORD ────────────────────────────────────────────────────────────
//

/// Everything the session store keeps for one user.
///
/// `progress == None` is the menu. Collected landmarks outlive playthroughs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub progress: Option<SessionState>,
    pub collected_landmarks: BTreeSet<usize>,
}

impl SessionRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the playthrough, keeping the landmark collection.
    pub fn return_to_menu(&mut self) {
        self.progress = None;
    }

    #[must_use]
    pub fn is_at_menu(&self) -> bool {
        self.progress.is_none()
    }

    #[must_use]
    pub fn has_collected(&self, station_index: usize) -> bool {
        self.collected_landmarks.contains(&station_index)
    }
}
