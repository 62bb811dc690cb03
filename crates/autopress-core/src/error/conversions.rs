//! Conversions from common raw errors into StructuredError
//!
//! These route through the classification tables so that a raw error picked
//! up at any integration seam arrives with a usable category, severity and
//! retryability.

use super::classify::classify_message;
use super::types::{ErrorCategory, StructuredError};

impl From<std::io::Error> for StructuredError {
    fn from(error: std::io::Error) -> Self {
        use std::io::ErrorKind;
        let category = match error.kind() {
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected => ErrorCategory::Network,
            ErrorKind::TimedOut => ErrorCategory::Timeout,
            ErrorKind::PermissionDenied => ErrorCategory::Authentication,
            ErrorKind::InvalidInput | ErrorKind::InvalidData => ErrorCategory::Validation,
            _ => classify_message(&error.to_string()),
        };
        StructuredError::with_category(category, error.to_string())
    }
}

impl From<serde_json::Error> for StructuredError {
    fn from(error: serde_json::Error) -> Self {
        StructuredError::validation(error.to_string())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for StructuredError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match error.downcast::<StructuredError>() {
            Ok(structured) => *structured,
            Err(raw) => {
                let message = raw.to_string();
                StructuredError::with_category(classify_message(&message), message)
            }
        }
    }
}
