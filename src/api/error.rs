//! Errors returned by the family API client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested record does not exist
    #[error("record not found")]
    NotFound,
    /// The server answered with a non-success status
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    /// Connection, timeout or decoding failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message() {
        let err = ApiError::Status {
            status: 422,
            body: "invalid city".to_string(),
        };
        assert_eq!(err.to_string(), "server returned 422: invalid city");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found() {
        assert!(ApiError::NotFound.is_not_found());
        assert_eq!(ApiError::NotFound.to_string(), "record not found");
    }
}
