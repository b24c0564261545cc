use thiserror::Error;

use crate::scoring::ScoringError;
use crate::stats::StatsError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Stats error: {0}")]
    Stats(#[from] StatsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Usage: {0}")]
    Usage(String),
}

impl AppError {
    /// Process exit code for the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Usage(_) => 2,
            AppError::Scoring(_) => 3,
            AppError::Stats(_) | AppError::Serialization(_) => 1,
        }
    }
}
