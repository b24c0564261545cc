use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StatsError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl StatsError {
    /// Store failures are transient; everything else needs different input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StatsError::Repository(_))
    }
}
