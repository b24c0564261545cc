use crate::scoring::ShotOutcome;

use super::super::RecordedScore;

/// Scores ordered by when they were shot. Ties keep their input order.
pub fn chronological(scores: &[RecordedScore]) -> Vec<&RecordedScore> {
    let mut ordered: Vec<&RecordedScore> = scores.iter().collect();
    ordered.sort_by_key(|s| s.shot_at);
    ordered
}

/// Longest run of consecutive hits, carried across round boundaries in the
/// order the rounds were shot.
pub fn longest_streak(scores: &[RecordedScore]) -> usize {
    let mut best = 0;
    let mut current = 0;
    for score in chronological(scores) {
        for outcome in score.record.outcomes() {
            match outcome {
                ShotOutcome::Hit => {
                    current += 1;
                    best = best.max(current);
                }
                ShotOutcome::Miss => current = 0,
            }
        }
    }
    best
}

pub fn straights(scores: &[RecordedScore]) -> u32 {
    scores.iter().filter(|s| s.record.is_perfect()).count() as u32
}
