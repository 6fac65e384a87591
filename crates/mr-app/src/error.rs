//! Error types for the mr-app service layer.

/// Application error type wrapping the backend crates for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Unknown series variable: {0}")]
    UnknownVariable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mr-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<mr_scenario::ScenarioError> for AppError {
    fn from(err: mr_scenario::ScenarioError) -> Self {
        match err {
            mr_scenario::ScenarioError::Io(source) => AppError::Io(source),
            other => AppError::Scenario(other.to_string()),
        }
    }
}

impl From<mr_sim::SimError> for AppError {
    fn from(err: mr_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<mr_results::ResultsError> for AppError {
    fn from(err: mr_results::ResultsError) -> Self {
        match err {
            mr_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
