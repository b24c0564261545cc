use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::scoring::{Discipline, Gauge, ScoreRecord};

pub type ShooterId = String;

/// A score record as the store keeps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedScore {
    pub id: Uuid,
    pub shooter_id: ShooterId,
    pub record: ScoreRecord,
    pub shot_at: DateTime<Utc>,
}

impl RecordedScore {
    pub fn new(
        shooter_id: impl Into<ShooterId>,
        record: ScoreRecord,
        shot_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            shooter_id: shooter_id.into(),
            record,
            shot_at,
        }
    }
}

/// Narrows the rounds a statistic looks at. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsFilter {
    pub discipline: Option<Discipline>,
    pub gauge: Option<Gauge>,
    pub since: Option<DateTime<Utc>>,
}

impl StatsFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn discipline(mut self, discipline: Discipline) -> Self {
        self.discipline = Some(discipline);
        self
    }

    pub fn gauge(mut self, gauge: Gauge) -> Self {
        self.gauge = Some(gauge);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn matches(&self, score: &RecordedScore) -> bool {
        self.discipline.map_or(true, |d| d == score.record.discipline())
            && self.gauge.map_or(true, |g| g == score.record.gauge())
            && self.since.map_or(true, |since| score.shot_at >= since)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub shot_at: DateTime<Utc>,
    pub score: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalStats {
    pub shooter_id: ShooterId,
    pub total_rounds: u32,
    pub overall_average: f64,
    pub longest_streak: usize,
    pub perfect_rounds: u32,
    pub average_trend: f64,
    pub game_averages: BTreeMap<Discipline, f64>,
    pub score_history: Vec<ScorePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopShooter {
    pub shooter_id: ShooterId,
    pub average: f64,
    pub high_score: usize,
    pub rounds: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubStats {
    pub club_average: f64,
    pub active_members: u32,
    pub perfect_rounds_today: u32,
    pub top_shooters: Vec<TopShooter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub shooter_id: ShooterId,
    /// Perfect rounds.
    pub straights: u32,
    pub longest_streak: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSection {
    pub discipline: Discipline,
    pub gauge: Gauge,
    pub entries: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub sections: Vec<LeaderboardSection>,
}

impl Leaderboard {
    pub fn section(&self, discipline: Discipline, gauge: Gauge) -> Option<&LeaderboardSection> {
        self.sections
            .iter()
            .find(|s| s.discipline == discipline && s.gauge == gauge)
    }
}

/// UTC calendar day a score was shot on.
pub fn shot_on(score: &RecordedScore) -> NaiveDate {
    score.shot_at.date_naive()
}
