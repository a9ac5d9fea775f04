use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the program
#[derive(Debug, Error)]
pub enum AppError {
    /// Terminal setup, drawing or input failed
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Field configuration file could not be read
    #[error("cannot read {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Field configuration file is not valid JSON for the settings
    #[error("invalid field config {path}: {source}")]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to retrieve quiz data
#[derive(Debug, Error)]
pub enum QuizLoadError {
    #[error("quiz {0:?} not found")]
    NotFound(String),

    #[error("failed to read quiz: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed quiz data: {0}")]
    Format(#[from] serde_json::Error),
}

/// Events that do not apply to the session in its current state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("quiz data was already delivered to this session")]
    AlreadyLoaded,

    #[error("the quiz is not in progress")]
    NotInProgress,

    #[error("the current question was already answered")]
    AlreadyAnswered,

    #[error("the current question has not been answered yet")]
    NotAnswered,

    #[error("option {index} does not exist ({count} options)")]
    NoSuchOption { index: usize, count: usize },
}
