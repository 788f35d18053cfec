use thiserror::Error;

/// Provider JSON that cannot be turned into domain records.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed provider JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object for {0}")]
    NotAnObject(&'static str),
}
