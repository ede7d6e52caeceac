use thiserror::Error;

/// Outcome of a dispatch that did not yield a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// No response was received from the server.
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived with a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A later identical request superseded this one.
    #[error("request cancelled: {reason}")]
    Cancelled { reason: String },

    /// The request could not be built from the given method, URL or headers.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled { .. })
    }

    /// Status code carried by an [`ClientError::HttpStatus`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_http_errors() {
        let err = ClientError::HttpStatus {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(ClientError::Network("refused".to_string()).status(), None);
    }

    #[test]
    fn test_display_carries_status_and_body() {
        let err = ClientError::HttpStatus {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let err: ClientError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
