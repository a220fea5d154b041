use thiserror::Error;

use crate::deck::DeckError;
use crate::model::{LandmarkError, QuestionError, RouteError};
use crate::progression::ProgressionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Landmark(#[from] LandmarkError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
}
