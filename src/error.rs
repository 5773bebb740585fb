//! The single error kind returned by task stores

use thiserror::Error;

/// Any failure of a [`TaskGateway`](crate::traits::TaskGateway) call.
///
/// Network errors, authentication errors and constraint violations are not told apart.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("task store error: {message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("transport failure: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("invalid data: {}", err))
    }
}

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        Self::new(format!("invalid URL: {}", err))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O failure: {}", err))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::new("permission denied for table tasks");
        assert_eq!(err.message(), "permission denied for table tasks");
        assert_eq!(err.to_string(), "task store error: permission denied for table tasks");
    }

    #[test]
    fn converts_from_json_errors() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err = StoreError::from(json_err);
        assert!(err.message().starts_with("invalid data: "));
    }
}
