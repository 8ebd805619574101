use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterestCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for InterestCalcError {
    fn from(e: serde_json::Error) -> Self {
        InterestCalcError::SerializationError(e.to_string())
    }
}
