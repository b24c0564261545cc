use thiserror::Error;

use super::models::{Discipline, Station};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Invalid starting station {station} for {discipline}")]
    InvalidStartingStation { discipline: Discipline, station: Station },

    #[error("Unknown discipline: {0}")]
    UnknownDiscipline(String),

    #[error("Unknown gauge: {0}")]
    UnknownGauge(String),

    #[error("Round is already complete")]
    RoundAlreadyComplete,

    #[error("Round is not complete ({recorded} of {required} shots recorded)")]
    RoundIncomplete { recorded: usize, required: usize },

    #[error("Invalid shot outcome: {0}")]
    InvalidOutcome(String),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Starting station cannot change once shots are recorded")]
    StartingStationLocked,

    #[error("Expected {expected} missed positions, got {actual}")]
    MissedCountMismatch { expected: usize, actual: usize },

    #[error("Missed position {position} is outside a {total_shots} shot round")]
    MissedPositionOutOfRange { position: usize, total_shots: usize },

    #[error("A finished {discipline} round cannot have {actual} shots")]
    ShotCountMismatch { discipline: Discipline, actual: usize },

    #[error("Sporting Clays needs a course layout")]
    CourseLayoutRequired,

    #[error("Invalid course layout: {0}")]
    InvalidCourseLayout(String),
}
