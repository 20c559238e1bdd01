use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GenError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        GenError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type GenResult<T> = Result<T, GenError>;
