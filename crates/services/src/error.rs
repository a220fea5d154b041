//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ModeParseError, ParseIdError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

pub use quiz_core::progression::ProgressionError;

/// Malformed request data, rejected before any state is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("invalid {field}: {raw}")]
    Invalid { field: &'static str, raw: String },

    #[error("option {raw} is out of range 1..={options}")]
    ChoiceOutOfRange { raw: String, options: usize },

    #[error(transparent)]
    Mode(#[from] ModeParseError),

    #[error(transparent)]
    SessionKey(#[from] ParseIdError),
}

/// Errors emitted by `GameLoopService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Content(#[from] quiz_core::Error),
}
