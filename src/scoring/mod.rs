// Public API
pub use bulk::{from_bulk, from_bulk_with_option};
pub use catalog::{
    plan_for, plan_for_course, validate_starting_station, CourseLayout, CourseStation,
    StationTemplate,
};
pub use engine::{effective_plan, OptionPlacement, RoundProgress, ScoringEngine};
pub use errors::ScoringError;
pub use models::{parse_tally, Discipline, Gauge, ScoreRecord, ShotOutcome, ShotSlot, Station};

// Internal modules
mod bulk;
mod catalog;
mod engine;
mod errors;
mod models;
