#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod progression;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, GameError, InputError, ProgressionError};
pub use progression::{
    AnswerForm, GameContent, GameLoopService, PlayView, ShuffleSource, parse_mode,
};
