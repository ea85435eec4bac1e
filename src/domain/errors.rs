use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("unknown model '{name}', expected one of: {expected}")]
    UnknownModel { name: String, expected: String },
    #[error("invalid color '{value}': {reason}")]
    InvalidColor { value: String, reason: String },
    #[error("could not decode image: {0}")]
    ImageDecode(String),
    #[error("could not encode image: {0}")]
    Encode(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl DomainError {
    /// Stable machine-readable name, used as the `kind` of JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::UnknownModel { .. } => "unknown_model",
            DomainError::InvalidColor { .. } => "invalid_color",
            DomainError::ImageDecode(_) => "image_decode_error",
            DomainError::Encode(_) => "encode_error",
            DomainError::NotFound(_) => "not_found",
            DomainError::InvalidInput(_) => "invalid_input",
            DomainError::OperationFailed(_) => "operation_failed",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
