use thiserror::Error;

pub type InsightsResult<T> = Result<T, InsightsError>;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Fetch(String),

    #[error("{0}")]
    Validation(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<csv::Error> for InsightsError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<config::ConfigError> for InsightsError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_message_is_surfaced_verbatim() {
        let err = InsightsError::Fetch("Failed to fetch dashboard data".into());
        assert_eq!(err.to_string(), "Failed to fetch dashboard data");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: InsightsError = parse.unwrap_err().into();
        assert!(matches!(err, InsightsError::Serialization(_)));
    }
}
