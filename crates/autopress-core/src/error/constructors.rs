//! Constructor methods for StructuredError

use super::classify::{is_retryable_default, severity_for};
use super::types::{ErrorCategory, Severity, StructuredError};
use std::collections::HashMap;

impl StructuredError {
    /// Build an error with the given category, deriving severity and
    /// retryability from the default tables.
    ///
    /// The per-category constructors below fix the category by name; they
    /// never guess a category from the message. The heuristic path exists
    /// only for errors of unknown origin, see
    /// [`classify`](crate::error::classify).
    pub fn with_category(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category,
            severity: severity_for(category, None),
            code: None,
            status_code: None,
            retryable: is_retryable_default(category, None),
            metadata: HashMap::new(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::with_category(ErrorCategory::Network, message)
    }

    /// Create an API error
    pub fn api(message: impl Into<String>) -> Self {
        Self::with_category(ErrorCategory::Api, message)
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::with_category(ErrorCategory::Database, message)
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_category(ErrorCategory::Validation, message)
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::with_category(ErrorCategory::Authentication, message)
    }

    /// Create a rate-limit error
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::with_category(ErrorCategory::RateLimit, message)
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::with_category(ErrorCategory::Timeout, message)
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_category(ErrorCategory::Internal, message)
    }

    /// Create an unclassified error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::with_category(ErrorCategory::Unknown, message)
    }

    /// Attach a machine-readable error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach a status code and re-derive severity and retryability from the
    /// default tables. Apply explicit [`with_severity`](Self::with_severity)
    /// or [`with_retryable`](Self::with_retryable) overrides after this.
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self.severity = severity_for(self.category, Some(status_code));
        self.retryable = is_retryable_default(self.category, Some(status_code));
        self
    }

    /// Override the derived severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Override the derived retryability
    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Attach a metadata entry
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
