//! Round builders - fluent helpers for driving a scoring engine in tests
#![allow(dead_code)] // Test utilities may not all be used in every test

use clayscore::scoring::{
    parse_tally, Discipline, Gauge, ScoreRecord, ScoringEngine, ShotOutcome, Station,
};

// ============================================================================
// Tally Macro
// ============================================================================

/// `tally!("XXO")` expands to the outcome vector for that tally.
#[macro_export]
macro_rules! tally {
    ($marks:expr) => {
        clayscore::scoring::parse_tally($marks).expect("valid tally")
    };
}

// ============================================================================
// Round Builder
// ============================================================================

pub struct RoundBuilder {
    discipline: Discipline,
    starting_station: Station,
    outcomes: Vec<ShotOutcome>,
}

impl RoundBuilder {
    pub fn new(discipline: Discipline) -> Self {
        Self {
            discipline,
            starting_station: 1,
            outcomes: vec![],
        }
    }

    pub fn starting_at(mut self, station: Station) -> Self {
        self.starting_station = station;
        self
    }

    pub fn hits(mut self, count: usize) -> Self {
        self.outcomes
            .extend(std::iter::repeat(ShotOutcome::Hit).take(count));
        self
    }

    pub fn miss(mut self) -> Self {
        self.outcomes.push(ShotOutcome::Miss);
        self
    }

    pub fn tally(mut self, marks: &str) -> Self {
        self.outcomes
            .extend(parse_tally(marks).expect("valid tally"));
        self
    }

    /// Records every queued outcome shot by shot.
    pub fn build(self) -> ScoringEngine {
        let mut engine = ScoringEngine::new(self.discipline, self.starting_station)
            .expect("valid round setup");
        for outcome in self.outcomes {
            engine.record_outcome(outcome).expect("shot should be accepted");
        }
        engine
    }

    pub fn finish(self, gauge: Gauge) -> ScoreRecord {
        self.build().finish(gauge).expect("round should be complete")
    }
}

/// A complete round with misses at the given shot indices.
pub fn round_with_misses(discipline: Discipline, gauge: Gauge, misses: &[usize]) -> ScoreRecord {
    let mut engine = ScoringEngine::new(discipline, 1).expect("valid round setup");
    let mut shot = 0;
    while !engine.is_complete() {
        let outcome = if misses.contains(&shot) {
            ShotOutcome::Miss
        } else {
            ShotOutcome::Hit
        };
        engine.record_outcome(outcome).expect("shot should be accepted");
        shot += 1;
    }
    engine.finish(gauge).expect("round should be complete")
}
