//! Custom error types for the introduction generator.
//!
//! This module defines all error types used throughout the library.
//! All functions return `Result<T, IntroError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for introduction generator operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum IntroError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// LLM endpoint answered with a non-success status
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Malformed LLM response
    #[error("Parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// No API key configured for the LLM connection
    #[error("LLM api_key is empty; edit the LLM configuration file first")]
    MissingApiKey,

    /// System clipboard unavailable or rejected the text
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Desktop integration (launcher entries, external openers)
    #[error("Desktop error: {0}")]
    Desktop(String),
}

/// Result type alias using `IntroError`
pub type Result<T> = std::result::Result<T, IntroError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| IntroError::Parse(msg.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_or_parse() {
        let missing: Option<u8> = None;
        let err = missing.ok_or_parse("no choices").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: no choices");
        assert_eq!(Some(3).ok_or_parse("unused").unwrap(), 3);
    }

    #[test]
    fn test_api_error_display() {
        let err = IntroError::Api {
            code: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 401 - unauthorized");
    }
}
