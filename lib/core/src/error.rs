use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Featurization error: {0}")]
    Featurization(String),

    #[error("Data shape error: {context}: expected {expected} rows, got {actual}")]
    DataShape {
        expected: usize,
        actual: usize,
        context: String,
    },

    #[error("Invalid feature dimension: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a configuration error with a formatted message
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Shorthand for a featurization error with a formatted message
    pub fn featurization(msg: impl Into<String>) -> Self {
        Error::Featurization(msg.into())
    }

    pub fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Error::DataShape {
            expected,
            actual,
            context: context.into(),
        }
    }
}
