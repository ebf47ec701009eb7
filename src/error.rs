use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("{0}")]
    Protocol(String),

    #[error("Invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setup link: {0}")]
    Link(String),

    #[error("No endpoint configured")]
    NotConfigured,

    #[error("Share abandoned before a group was chosen")]
    Abandoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config store error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ShareError {
    /// Error for a non-2xx response, carrying the status code and its
    /// reason phrase.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        ShareError::Http {
            status: status.as_u16(),
            reason: status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
        }
    }
}

pub type ShareResult<T> = Result<T, ShareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_contains_status() {
        let err = ShareError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("Internal Server Error"));
    }

    #[test]
    fn test_protocol_error_message_is_verbatim() {
        let err = ShareError::Protocol("No share_id provided".to_string());
        assert_eq!(err.to_string(), "No share_id provided");
    }
}
