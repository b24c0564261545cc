use std::collections::BTreeMap;

use crate::scoring::{Discipline, Gauge};

use super::super::{Leaderboard, LeaderboardEntry, LeaderboardSection, RecordedScore, ShooterId};
use super::streaks::{longest_streak, straights};

/// One section per discipline and gauge that has rounds, each ranked by
/// longest streak, then straights, then shooter id.
pub fn build_leaderboard(scores: &[RecordedScore]) -> Leaderboard {
    let mut grouped: BTreeMap<(Discipline, Gauge), BTreeMap<ShooterId, Vec<RecordedScore>>> =
        BTreeMap::new();
    for score in scores {
        grouped
            .entry((score.record.discipline(), score.record.gauge()))
            .or_default()
            .entry(score.shooter_id.clone())
            .or_default()
            .push(score.clone());
    }

    let sections = grouped
        .into_iter()
        .map(|((discipline, gauge), shooters)| {
            let mut entries: Vec<LeaderboardEntry> = shooters
                .into_iter()
                .map(|(shooter_id, rounds)| LeaderboardEntry {
                    shooter_id,
                    straights: straights(&rounds),
                    longest_streak: longest_streak(&rounds),
                })
                .collect();
            entries.sort_by(|a, b| {
                b.longest_streak
                    .cmp(&a.longest_streak)
                    .then_with(|| b.straights.cmp(&a.straights))
                    .then_with(|| a.shooter_id.cmp(&b.shooter_id))
            });
            LeaderboardSection {
                discipline,
                gauge,
                entries,
            }
        })
        .collect();

    Leaderboard { sections }
}
