pub mod calculators;
pub mod service;

mod errors;
pub mod models;
pub mod repository;

pub use errors::StatsError;
pub use models::*;
pub use repository::{InMemoryScoreRepository, ScoreRepository};
pub use service::{StatsService, StatsServiceBuilder};

/// Tunables used when the service builder is not told otherwise.
pub mod defaults {
    /// Shooters listed in club statistics.
    pub const TOP_SHOOTERS_LIMIT: usize = 10;
    /// Most recent rounds compared against the overall average.
    pub const TREND_WINDOW: usize = 5;
    /// Store attempts per submitted score, first try included.
    pub const SUBMIT_ATTEMPTS: u32 = 3;
    pub const RETRY_INTERVAL_MS: u64 = 200;
}
