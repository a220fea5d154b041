use serde::Serialize;

use quiz_core::model::{
    Judgement, Landmark, Phase, PoolIndex, Question, SessionRecord, SessionState, TravelMode,
};

use super::content::GameContent;
use crate::error::ProgressionError;

/// Presentation-agnostic snapshot of one session.
///
/// No pre-formatted strings beyond names taken from the route and pool; the
/// front-end decides how to render fractions and speeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PlayView {
    Menu(MenuView),
    InLeg(LegView),
    Judgement(JudgementView),
    Arrival(ArrivalView),
    Goal(GoalView),
}

/// `numerator / denominator`, kept as integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fraction {
    pub numerator: usize,
    pub denominator: usize,
}

impl Fraction {
    /// Ratio in `[0, 1]`; zero for an empty denominator.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(self) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }
        (self.numerator as f64 / self.denominator as f64).min(1.0)
    }

    #[must_use]
    pub fn percent(self) -> usize {
        if self.denominator == 0 {
            return 0;
        }
        (self.numerator.min(self.denominator) * 100) / self.denominator
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LandmarkView {
    pub station_index: usize,
    pub station_name: String,
    pub name: String,
    pub visual: String,
    pub is_tunnel: bool,
    pub collected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
}

impl QuestionView {
    fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().to_owned(),
            text: question.text().to_owned(),
            options: question.options().to_vec(),
        }
    }
}

/// Fields shared by every in-game view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressView {
    pub mode: TravelMode,
    pub current_station: String,
    pub next_station: String,
    pub current_index: usize,
    pub next_index: usize,
    pub score: u32,
    pub total_answered: u32,
    pub speed: u16,
    /// Share of the pool answered correctly.
    pub progress: Fraction,
    /// How far along the route the train stands.
    pub route_progress: Fraction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    pub collected: Vec<LandmarkView>,
    pub total_landmarks: usize,
    pub total_questions: usize,
    pub degraded_pool: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegView {
    pub progress: ProgressView,
    pub leg_number: u32,
    /// 1-based position inside the leg, counting requeued questions.
    pub leg_position: usize,
    pub leg_len: usize,
    pub question: QuestionView,
    /// Landmark that can be picked up before the next stop.
    pub landmark: Option<LandmarkView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgementView {
    pub progress: ProgressView,
    pub question: QuestionView,
    pub chosen: u8,
    pub correct: bool,
    pub correct_answer: String,
    /// Set only when this answer collected the landmark.
    pub landmark: Option<LandmarkView>,
    pub leg_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalView {
    pub progress: ProgressView,
    pub arrived_station: String,
    pub leg_number: u32,
    pub questions_left: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalView {
    pub progress: ProgressView,
    pub reached_terminal: bool,
    pub collected: Vec<LandmarkView>,
    pub total_landmarks: usize,
}

impl PlayView {
    /// Snapshot `record` for the presentation layer.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError` if the record references a question the
    /// pool does not hold, or an in-leg record has no question to serve.
    pub fn build(content: &GameContent, record: &SessionRecord) -> Result<Self, ProgressionError> {
        let Some(state) = record.progress.as_ref() else {
            return Ok(Self::menu(content, record));
        };
        let progress = progress_view(content, state);

        let view = match state.phase() {
            Phase::InLeg => {
                let current = state
                    .leg()
                    .current()
                    .ok_or(ProgressionError::NoCurrentQuestion)?;
                let question = lookup(content, current)?;
                let landmark = content
                    .landmarks()
                    .get(state.current_station())
                    .map(|l| landmark_view(content, record, l));
                Self::InLeg(LegView {
                    progress,
                    leg_number: state.leg_number(),
                    leg_position: state.leg().cursor() + 1,
                    leg_len: state.leg().len(),
                    question: QuestionView::from_question(question),
                    landmark,
                })
            }
            Phase::LegJudgement => {
                let judgement = state
                    .last_judgement()
                    .ok_or(ProgressionError::NoCurrentQuestion)?;
                Self::Judgement(judgement_view(content, record, state, judgement, progress)?)
            }
            Phase::StationArrival => Self::Arrival(ArrivalView {
                arrived_station: content.route().name(state.next_station()).to_owned(),
                leg_number: state.leg_number(),
                questions_left: state.deck().remaining(),
                progress,
            }),
            Phase::Goal => Self::Goal(GoalView {
                reached_terminal: content.route().is_terminal(state.current_station()),
                collected: collected_views(content, record),
                total_landmarks: content.landmarks().len(),
                progress,
            }),
        };
        Ok(view)
    }

    /// Title screen listing the landmarks collected so far.
    #[must_use]
    pub fn menu(content: &GameContent, record: &SessionRecord) -> Self {
        Self::Menu(MenuView {
            collected: collected_views(content, record),
            total_landmarks: content.landmarks().len(),
            total_questions: content.pool().len(),
            degraded_pool: content.pool().is_degraded(),
        })
    }

    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            PlayView::Menu(_) => None,
            PlayView::InLeg(_) => Some(Phase::InLeg),
            PlayView::Judgement(_) => Some(Phase::LegJudgement),
            PlayView::Arrival(_) => Some(Phase::StationArrival),
            PlayView::Goal(_) => Some(Phase::Goal),
        }
    }

    #[must_use]
    pub fn progress(&self) -> Option<&ProgressView> {
        match self {
            PlayView::Menu(_) => None,
            PlayView::InLeg(v) => Some(&v.progress),
            PlayView::Judgement(v) => Some(&v.progress),
            PlayView::Arrival(v) => Some(&v.progress),
            PlayView::Goal(v) => Some(&v.progress),
        }
    }
}

fn progress_view(content: &GameContent, state: &SessionState) -> ProgressView {
    let route = content.route();
    ProgressView {
        mode: state.mode(),
        current_station: route.name(state.current_station()).to_owned(),
        next_station: route.name(state.next_station()).to_owned(),
        current_index: state.current_station(),
        next_index: state.next_station(),
        score: state.score(),
        total_answered: state.total_answered(),
        speed: state.speed().value(),
        progress: Fraction {
            numerator: usize::try_from(state.score()).unwrap_or(usize::MAX),
            denominator: content.pool().len(),
        },
        route_progress: Fraction {
            numerator: state.current_station(),
            denominator: route.last_index(),
        },
    }
}

fn judgement_view(
    content: &GameContent,
    record: &SessionRecord,
    state: &SessionState,
    judgement: &Judgement,
    progress: ProgressView,
) -> Result<JudgementView, ProgressionError> {
    let question = lookup(content, judgement.question)?;
    let landmark = judgement
        .collected_landmark
        .and_then(|station| content.landmarks().get(station))
        .map(|l| landmark_view(content, record, l));
    Ok(JudgementView {
        progress,
        question: QuestionView::from_question(question),
        chosen: judgement.chosen,
        correct: judgement.correct,
        correct_answer: judgement.correct_answer.clone(),
        landmark,
        leg_complete: state.leg().is_exhausted(),
    })
}

fn lookup(content: &GameContent, index: PoolIndex) -> Result<&Question, ProgressionError> {
    content
        .pool()
        .get(index)
        .ok_or(ProgressionError::UnknownQuestion(index))
}

fn landmark_view(
    content: &GameContent,
    record: &SessionRecord,
    landmark: &Landmark,
) -> LandmarkView {
    LandmarkView {
        station_index: landmark.station_index,
        station_name: content.route().name(landmark.station_index).to_owned(),
        name: landmark.name.clone(),
        visual: landmark.visual.clone(),
        is_tunnel: landmark.is_tunnel,
        collected: record.has_collected(landmark.station_index),
    }
}

fn collected_views(content: &GameContent, record: &SessionRecord) -> Vec<LandmarkView> {
    record
        .collected_landmarks
        .iter()
        .filter_map(|station| content.landmarks().get(*station))
        .map(|l| landmark_view(content, record, l))
        .collect()
}
