use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::errors::ScoringError;
use super::models::{Discipline, ShotOutcome};

/// Builds an outcome sequence from a final hit count and the 0-based
/// positions of the missed shots.
///
/// For Skeet with at least one miss, an option shot is inserted straight
/// after the first miss and recorded as a hit.
pub fn from_bulk(
    discipline: Discipline,
    total_shots: usize,
    hit_count: usize,
    missed_positions: &BTreeSet<usize>,
) -> Result<Vec<ShotOutcome>, ScoringError> {
    from_bulk_with_option(
        discipline,
        total_shots,
        hit_count,
        missed_positions,
        ShotOutcome::Hit,
    )
}

/// Same as [`from_bulk`], with the outcome of the Skeet option shot chosen
/// by the caller.
pub fn from_bulk_with_option(
    discipline: Discipline,
    total_shots: usize,
    hit_count: usize,
    missed_positions: &BTreeSet<usize>,
    option_outcome: ShotOutcome,
) -> Result<Vec<ShotOutcome>, ScoringError> {
    let expected = total_shots.saturating_sub(hit_count);
    if hit_count > total_shots || missed_positions.len() != expected {
        warn!(
            %discipline,
            total_shots,
            hit_count,
            missed = missed_positions.len(),
            "Bulk entry miss count mismatch"
        );
        return Err(ScoringError::MissedCountMismatch {
            expected,
            actual: missed_positions.len(),
        });
    }

    if let Some(&position) = missed_positions.range(total_shots..).next() {
        return Err(ScoringError::MissedPositionOutOfRange {
            position,
            total_shots,
        });
    }

    let mut outcomes: Vec<ShotOutcome> = (0..total_shots)
        .map(|i| {
            if missed_positions.contains(&i) {
                ShotOutcome::Miss
            } else {
                ShotOutcome::Hit
            }
        })
        .collect();

    if discipline.has_option_shot() {
        if let Some(&first_miss) = missed_positions.first() {
            outcomes.insert(first_miss + 1, option_outcome);
            debug!(first_miss, option = %option_outcome, "Bulk entry option shot inserted");
        }
    }

    Ok(outcomes)
}
