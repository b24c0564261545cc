use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::scoring::ScoreRecord;

use super::{
    calculators::{
        average_trend, build_leaderboard, chronological, game_averages, longest_streak,
        mean_score, straights, top_shooters,
    },
    defaults,
    models::shot_on,
    repository::ScoreRepository,
    ClubStats, Leaderboard, PersonalStats, RecordedScore, ScorePoint, StatsError, StatsFilter,
};

pub struct StatsService {
    repository: Arc<dyn ScoreRepository>,
    top_shooters_limit: usize,
    trend_window: usize,
    submit_attempts: u32,
    retry_interval: Duration,
}

impl StatsService {
    pub fn builder(repository: Arc<dyn ScoreRepository>) -> StatsServiceBuilder {
        StatsServiceBuilder::new(repository)
    }

    /// Stores a finished round shot now.
    pub async fn submit(
        &self,
        shooter_id: &str,
        record: ScoreRecord,
    ) -> Result<RecordedScore, StatsError> {
        self.submit_at(shooter_id, record, Utc::now()).await
    }

    /// Stores a finished round with an explicit time, for back-filled
    /// paper score sheets.
    pub async fn submit_at(
        &self,
        shooter_id: &str,
        record: ScoreRecord,
        shot_at: DateTime<Utc>,
    ) -> Result<RecordedScore, StatsError> {
        if shooter_id.trim().is_empty() {
            return Err(StatsError::Validation("shooter id is empty".to_string()));
        }

        let score = RecordedScore::new(shooter_id, record, shot_at);
        self.store_with_retry(&score).await?;

        info!(
            score_id = %score.id,
            shooter_id,
            discipline = %score.record.discipline(),
            total_score = score.record.total_score(),
            "Score stored"
        );
        Ok(score)
    }

    async fn store_with_retry(&self, score: &RecordedScore) -> Result<(), StatsError> {
        let mut attempt = 1;
        loop {
            match self.repository.store(score.clone()).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && attempt < self.submit_attempts => {
                    warn!(
                        score_id = %score.id,
                        attempt,
                        max_attempts = self.submit_attempts,
                        error = %e,
                        "Score store failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(self.retry_interval).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn get_score(&self, id: Uuid) -> Result<RecordedScore, StatsError> {
        self.repository
            .get_score(id)
            .await?
            .ok_or_else(|| StatsError::NotFound(format!("score {}", id)))
    }

    pub async fn personal_stats(
        &self,
        shooter_id: &str,
        filter: &StatsFilter,
    ) -> Result<PersonalStats, StatsError> {
        let scores: Vec<RecordedScore> = self
            .repository
            .scores_for_shooter(shooter_id)
            .await?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect();

        Ok(PersonalStats {
            shooter_id: shooter_id.to_string(),
            total_rounds: scores.len() as u32,
            overall_average: mean_score(&scores),
            longest_streak: longest_streak(&scores),
            perfect_rounds: straights(&scores),
            average_trend: average_trend(&scores, self.trend_window),
            game_averages: game_averages(&scores),
            score_history: chronological(&scores)
                .into_iter()
                .map(|s| ScorePoint {
                    shot_at: s.shot_at,
                    score: s.record.total_score(),
                })
                .collect(),
        })
    }

    pub async fn club_stats(
        &self,
        filter: &StatsFilter,
        today: NaiveDate,
    ) -> Result<ClubStats, StatsError> {
        let scores = self.filtered_scores(filter).await?;
        let top_shooters = top_shooters(&scores, self.top_shooters_limit);

        Ok(ClubStats {
            club_average: mean_score(&scores),
            active_members: distinct_shooters(&scores),
            perfect_rounds_today: scores
                .iter()
                .filter(|s| shot_on(s) == today && s.record.is_perfect())
                .count() as u32,
            top_shooters,
        })
    }

    pub async fn leaderboard(&self, filter: &StatsFilter) -> Result<Leaderboard, StatsError> {
        let scores = self.filtered_scores(filter).await?;
        Ok(build_leaderboard(&scores))
    }

    async fn filtered_scores(&self, filter: &StatsFilter) -> Result<Vec<RecordedScore>, StatsError> {
        Ok(self
            .repository
            .all_scores()
            .await?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect())
    }
}

fn distinct_shooters(scores: &[RecordedScore]) -> u32 {
    let mut shooters: Vec<&str> = scores.iter().map(|s| s.shooter_id.as_str()).collect();
    shooters.sort_unstable();
    shooters.dedup();
    shooters.len() as u32
}

pub struct StatsServiceBuilder {
    repository: Arc<dyn ScoreRepository>,
    top_shooters_limit: usize,
    trend_window: usize,
    submit_attempts: u32,
    retry_interval: Duration,
}

impl StatsServiceBuilder {
    fn new(repository: Arc<dyn ScoreRepository>) -> Self {
        Self {
            repository,
            top_shooters_limit: defaults::TOP_SHOOTERS_LIMIT,
            trend_window: defaults::TREND_WINDOW,
            submit_attempts: defaults::SUBMIT_ATTEMPTS,
            retry_interval: Duration::from_millis(defaults::RETRY_INTERVAL_MS),
        }
    }

    pub fn with_top_shooters_limit(mut self, limit: usize) -> Self {
        self.top_shooters_limit = limit;
        self
    }

    pub fn with_trend_window(mut self, window: usize) -> Self {
        self.trend_window = window;
        self
    }

    pub fn with_retry(mut self, attempts: u32, interval: Duration) -> Self {
        self.submit_attempts = attempts.max(1);
        self.retry_interval = interval;
        self
    }

    pub fn build(self) -> StatsService {
        StatsService {
            repository: self.repository,
            top_shooters_limit: self.top_shooters_limit,
            trend_window: self.trend_window,
            submit_attempts: self.submit_attempts,
            retry_interval: self.retry_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Discipline, Gauge, ScoringEngine, ShotOutcome};
    use crate::stats::InMemoryScoreRepository;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` stores with a transient error.
    struct FlakyRepository {
        inner: InMemoryScoreRepository,
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ScoreRepository for FlakyRepository {
        async fn store(&self, score: RecordedScore) -> Result<(), StatsError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
                return Err(StatsError::Repository("connection reset".to_string()));
            }
            self.inner.store(score).await
        }
        async fn get_score(&self, id: Uuid) -> Result<Option<RecordedScore>, StatsError> {
            self.inner.get_score(id).await
        }
        async fn scores_for_shooter(
            &self,
            shooter_id: &str,
        ) -> Result<Vec<RecordedScore>, StatsError> {
            self.inner.scores_for_shooter(shooter_id).await
        }
        async fn all_scores(&self) -> Result<Vec<RecordedScore>, StatsError> {
            self.inner.all_scores().await
        }
    }

    fn flaky(failures: u32) -> Arc<FlakyRepository> {
        Arc::new(FlakyRepository {
            inner: InMemoryScoreRepository::new(),
            failures,
            calls: AtomicU32::new(0),
        })
    }

    fn trap_record(misses: usize) -> ScoreRecord {
        let mut engine = ScoringEngine::new(Discipline::Trap, 1).unwrap();
        for i in 0..25 {
            let outcome = if i < misses {
                ShotOutcome::Miss
            } else {
                ShotOutcome::Hit
            };
            engine.record_outcome(outcome).unwrap();
        }
        engine.finish(Gauge::Twelve).unwrap()
    }

    #[tokio::test]
    async fn test_submit_retries_transient_failures() {
        let repo = flaky(2);
        let service = StatsService::builder(repo.clone())
            .with_retry(3, Duration::from_millis(1))
            .build();

        let stored = service.submit("alice", trap_record(0)).await.unwrap();
        assert_eq!(repo.calls.load(Ordering::SeqCst), 3);
        assert_eq!(service.get_score(stored.id).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_submit_gives_up_after_max_attempts() {
        let repo = flaky(5);
        let service = StatsService::builder(repo.clone())
            .with_retry(2, Duration::from_millis(1))
            .build();

        let result = service.submit("alice", trap_record(0)).await;
        assert!(matches!(result, Err(StatsError::Repository(_))));
        assert_eq!(repo.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_submit_validates_input() {
        let service = StatsService::builder(Arc::new(InMemoryScoreRepository::new())).build();
        let result = service.submit("  ", trap_record(0)).await;
        assert!(matches!(result, Err(StatsError::Validation(_))));
    }

    #[tokio::test]
    async fn test_missing_score_is_not_found() {
        let service = StatsService::builder(Arc::new(InMemoryScoreRepository::new())).build();
        let result = service.get_score(Uuid::new_v4()).await;
        assert!(matches!(result, Err(StatsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_club_stats_counts_todays_straights() {
        let service = StatsService::builder(Arc::new(InMemoryScoreRepository::new())).build();
        let today = Utc.with_ymd_and_hms(2024, 7, 4, 15, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 7, 3, 15, 0, 0).unwrap();

        service.submit_at("alice", trap_record(0), today).await.unwrap();
        service.submit_at("bob", trap_record(0), yesterday).await.unwrap();
        service.submit_at("bob", trap_record(3), today).await.unwrap();

        let stats = service
            .club_stats(&StatsFilter::all(), today.date_naive())
            .await
            .unwrap();
        assert_eq!(stats.active_members, 2);
        assert_eq!(stats.perfect_rounds_today, 1);
        assert_eq!(stats.club_average, 24.0);
        assert_eq!(stats.top_shooters[0].shooter_id, "alice");
    }
}
