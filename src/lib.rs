//! Station sequencing and scoring for Skeet, Doubles Skeet, Trap, 5-Stand
//! and Sporting Clays rounds, plus shooter and club statistics over the
//! recorded scores. The `clayscore` binary is a thin wrapper over `scoring`
//! and `stats`.

pub mod scoring;
pub mod shared;
pub mod stats;

pub use scoring::{
    from_bulk, plan_for, Discipline, Gauge, ScoreRecord, ScoringEngine, ScoringError,
    ShotOutcome, ShotSlot,
};
pub use shared::AppError;
pub use stats::{InMemoryScoreRepository, ScoreRepository, StatsError, StatsService};
