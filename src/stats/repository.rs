use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordedScore, StatsError};

/// The score store. Production deployments back this with a remote
/// database, so every call may fail transiently.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn store(&self, score: RecordedScore) -> Result<(), StatsError>;
    async fn get_score(&self, id: Uuid) -> Result<Option<RecordedScore>, StatsError>;
    async fn scores_for_shooter(&self, shooter_id: &str) -> Result<Vec<RecordedScore>, StatsError>;
    async fn all_scores(&self) -> Result<Vec<RecordedScore>, StatsError>;
}

#[derive(Debug, Default)]
pub struct InMemoryScoreRepository {
    scores: Arc<RwLock<Vec<RecordedScore>>>,
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self {
            scores: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    async fn store(&self, score: RecordedScore) -> Result<(), StatsError> {
        let mut scores = self.scores.write().await;
        if scores.iter().any(|s| s.id == score.id) {
            return Err(StatsError::Validation(format!(
                "score {} already stored",
                score.id
            )));
        }
        scores.push(score);
        Ok(())
    }

    async fn get_score(&self, id: Uuid) -> Result<Option<RecordedScore>, StatsError> {
        let scores = self.scores.read().await;
        Ok(scores.iter().find(|s| s.id == id).cloned())
    }

    async fn scores_for_shooter(&self, shooter_id: &str) -> Result<Vec<RecordedScore>, StatsError> {
        let scores = self.scores.read().await;
        Ok(scores
            .iter()
            .filter(|s| s.shooter_id == shooter_id)
            .cloned()
            .collect())
    }

    async fn all_scores(&self) -> Result<Vec<RecordedScore>, StatsError> {
        let scores = self.scores.read().await;
        Ok(scores.clone())
    }
}
