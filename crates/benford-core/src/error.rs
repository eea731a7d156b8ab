use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenfordError {
    #[error("Invalid data type: {0}")]
    InvalidDataType(String),

    #[error("Invalid test kind: {0}")]
    InvalidTestKind(String),

    #[error("Invalid confidence level: {0}")]
    InvalidConfidence(String),

    #[error("Invalid sign filter: {0}")]
    InvalidSignFilter(String),

    #[error("Invalid configuration: {field} — {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BenfordError {
    pub(crate) fn config(field: &str, reason: impl Into<String>) -> Self {
        BenfordError::InvalidConfiguration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BenfordError {
    fn from(e: serde_json::Error) -> Self {
        BenfordError::SerializationError(e.to_string())
    }
}
