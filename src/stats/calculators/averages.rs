use std::collections::{BTreeMap, HashMap};

use crate::scoring::Discipline;

use super::super::{RecordedScore, ShooterId, TopShooter};
use super::streaks::chronological;

pub fn mean_score<'a>(scores: impl IntoIterator<Item = &'a RecordedScore>) -> f64 {
    let (sum, count) = scores
        .into_iter()
        .fold((0usize, 0usize), |(sum, count), s| {
            (sum + s.record.total_score(), count + 1)
        });
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

pub fn game_averages(scores: &[RecordedScore]) -> BTreeMap<Discipline, f64> {
    let mut by_discipline: BTreeMap<Discipline, Vec<&RecordedScore>> = BTreeMap::new();
    for score in scores {
        by_discipline
            .entry(score.record.discipline())
            .or_default()
            .push(score);
    }
    by_discipline
        .into_iter()
        .map(|(discipline, scores)| (discipline, mean_score(scores)))
        .collect()
}

/// Mean of the latest `window` rounds minus the overall mean. Positive when
/// the shooter is improving.
pub fn average_trend(scores: &[RecordedScore], window: usize) -> f64 {
    if scores.is_empty() || window == 0 {
        return 0.0;
    }
    let ordered = chronological(scores);
    let recent_start = ordered.len().saturating_sub(window);
    mean_score(ordered[recent_start..].iter().copied()) - mean_score(scores)
}

/// Best shooters by average score, then high score. Ties fall back to the
/// shooter id so the order is stable.
pub fn top_shooters(scores: &[RecordedScore], limit: usize) -> Vec<TopShooter> {
    let mut by_shooter: HashMap<&ShooterId, Vec<&RecordedScore>> = HashMap::new();
    for score in scores {
        by_shooter.entry(&score.shooter_id).or_default().push(score);
    }

    let mut shooters: Vec<TopShooter> = by_shooter
        .into_iter()
        .map(|(shooter_id, rounds)| TopShooter {
            shooter_id: shooter_id.clone(),
            average: mean_score(rounds.iter().copied()),
            high_score: rounds
                .iter()
                .map(|s| s.record.total_score())
                .max()
                .unwrap_or_default(),
            rounds: rounds.len() as u32,
        })
        .collect();

    shooters.sort_by(|a, b| {
        b.average
            .total_cmp(&a.average)
            .then_with(|| b.high_score.cmp(&a.high_score))
            .then_with(|| a.shooter_id.cmp(&b.shooter_id))
    });
    shooters.truncate(limit);
    shooters
}
