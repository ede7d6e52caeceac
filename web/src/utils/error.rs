use esg_core::ClientError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("{0}")]
    Api(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A newer identical request replaced this one.
    #[error("superseded: {0}")]
    Superseded(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Validation(String),
}

impl AppError {
    pub fn is_superseded(&self) -> bool {
        matches!(self, AppError::Superseded(_))
    }
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Cancelled { reason } => AppError::Superseded(reason),
            ClientError::HttpStatus { status, body } => AppError::Http { status, body },
            other => AppError::Api(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Api(format!("JSON parse error: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
