use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Insufficient data for {what}: need at least {required} observations, got {actual}")]
    InsufficientData {
        what: &'static str,
        required: usize,
        actual: usize,
    },
    #[error("Computation failed: {0}")]
    ComputationFailure(String),
    #[error("Result schema integrity error: {0}")]
    SchemaIntegrity(String),
}

impl AnalyticsError {
    pub fn insufficient(what: &'static str, required: usize, actual: usize) -> Self {
        AnalyticsError::InsufficientData {
            what,
            required,
            actual,
        }
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(value: serde_json::Error) -> Self {
        AnalyticsError::SchemaIntegrity(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
