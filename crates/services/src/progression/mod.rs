mod content;
mod input;
mod view;
mod workflow;

// Public API of the progression subsystem.
pub use crate::error::{GameError, InputError, ProgressionError};
pub use content::GameContent;
pub use input::{AnswerForm, parse_mode};
pub use view::{
    ArrivalView, Fraction, GoalView, JudgementView, LandmarkView, LegView, MenuView, PlayView,
    ProgressView, QuestionView,
};
pub use workflow::{GameLoopService, ShuffleSource};
