//! Error types module
//!
//! Every failure a screen can surface is unified under [`AppError`].
//! [`ValidationError`] covers the client-side checks that block a request
//! before anything is sent. The remaining variants describe what came back
//! (or failed to come back) from the remote API.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for server-side rejections
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "NETWORK_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    /// Whether the stored session must be dropped and the user sent to login
    fn requires_login(&self) -> bool;

    /// Single user-visible status message
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Client-side validation failures. None of these ever reach the network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("no file selected")]
    NoFileSelected,

    #[error("invalid pin")]
    InvalidPin,

    #[error("pins do not match")]
    PinMismatch,

    #[error("invalid msisdn: {0}")]
    InvalidMsisdn(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid csv row at line {line}: {reason}")]
    InvalidCsvRow { line: usize, reason: String },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("role {0} cannot be registered by the current user")]
    RoleNotPermitted(String),
}

impl ValidationError {
    /// Message shown to the user, worded the way the dashboard forms word it.
    pub fn client_message(&self) -> String {
        match self {
            ValidationError::NoFileSelected => "Please select a CSV file".to_string(),
            ValidationError::InvalidPin => "PIN must be 4 digits".to_string(),
            ValidationError::PinMismatch => "PINs do not match".to_string(),
            ValidationError::InvalidMsisdn(_) => "Please enter a valid phone number".to_string(),
            ValidationError::InvalidAmount(ref msg) => msg.clone(),
            ValidationError::InvalidCsvRow { line, reason } => {
                format!("Invalid CSV row at line {}: {}", line, reason)
            }
            ValidationError::MissingField(field) => format!("{} is required", field),
            ValidationError::RoleNotPermitted(ref role) => {
                format!("You are not allowed to register users of type {}", role)
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status:?}): {message}")]
    Server {
        status: Option<u16>,
        message: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidResponse(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, requires_login, log_level).
fn app_error_static_metadata(err: &AppError) -> (&'static str, bool, bool, LogLevel) {
    match err {
        AppError::Validation(_) => ("VALIDATION_ERROR", false, false, LogLevel::Debug),
        AppError::Network(_) => ("NETWORK_ERROR", true, false, LogLevel::Warn),
        AppError::Server { .. } => ("SERVER_ERROR", false, false, LogLevel::Warn),
        AppError::Unauthorized(_) => ("UNAUTHORIZED", false, true, LogLevel::Debug),
        AppError::InvalidResponse(_) => ("INVALID_RESPONSE", false, false, LogLevel::Error),
        AppError::Internal(_) => ("INTERNAL_ERROR", false, false, LogLevel::Error),
    }
}

impl AppError {
    /// Server rejection with the message the API returned.
    pub fn server(status: Option<u16>, message: impl Into<String>) -> Self {
        AppError::Server {
            status,
            message: message.into(),
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn requires_login(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref err) => err.client_message(),
            AppError::Network(_) => "Unable to connect to server".to_string(),
            AppError::Server { ref message, .. } => message.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::InvalidResponse(_) => "Invalid response from server".to_string(),
            AppError::Internal(_) => "An unexpected error occurred".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_network() {
        let err = AppError::Network("connection refused".to_string());
        assert_eq!(err.error_code(), "NETWORK_ERROR");
        assert!(err.is_recoverable());
        assert!(!err.requires_login());
        assert_eq!(err.client_message(), "Unable to connect to server");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_unauthorized_requires_login() {
        let err = AppError::Unauthorized("Token expired".to_string());
        assert_eq!(err.error_code(), "UNAUTHORIZED");
        assert!(err.requires_login());
        assert_eq!(err.client_message(), "Token expired");
    }

    #[test]
    fn test_server_message_is_verbatim() {
        let err = AppError::server(Some(400), "Insufficient float balance");
        assert_eq!(err.client_message(), "Insufficient float balance");
        assert!(!err.requires_login());
    }

    #[test]
    fn test_validation_messages() {
        let err = AppError::from(ValidationError::NoFileSelected);
        assert_eq!(err.to_string(), "Invalid input: no file selected");
        assert_eq!(err.client_message(), "Please select a CSV file");

        let err = AppError::from(ValidationError::InvalidPin);
        assert_eq!(err.to_string(), "Invalid input: invalid pin");
        assert_eq!(err.client_message(), "PIN must be 4 digits");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_detailed_message_includes_source() {
        let err = AppError::from(ValidationError::InvalidCsvRow {
            line: 3,
            reason: "amount 'lots' is not a number".to_string(),
        });
        let details = err.detailed_message();
        assert!(details.starts_with("Invalid input: invalid csv row at line 3"));
        assert!(details.contains("Caused by: invalid csv row at line 3"));
    }
}
