//! Core error value types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for Autopress operations
pub type AutopressResult<T> = Result<T, StructuredError>;

/// Taxonomy bucket assigned to a failure.
///
/// Assigned once at classification time and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Connection refused/reset, DNS failure
    Network,
    /// Provider-specific API error, bad API key
    Api,
    /// Database connectivity or query failure
    Database,
    /// Malformed input detected locally
    Validation,
    /// 401/unauthorized
    Authentication,
    /// HTTP 429 / provider throttling
    RateLimit,
    /// Operation exceeded its time budget
    Timeout,
    /// Programming or logic error
    Internal,
    /// Unclassifiable
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Api => write!(f, "api"),
            ErrorCategory::Database => write!(f, "database"),
            ErrorCategory::Validation => write!(f, "validation"),
            ErrorCategory::Authentication => write!(f, "authentication"),
            ErrorCategory::RateLimit => write!(f, "rate_limit"),
            ErrorCategory::Timeout => write!(f, "timeout"),
            ErrorCategory::Internal => write!(f, "internal"),
            ErrorCategory::Unknown => write!(f, "unknown"),
        }
    }
}

/// Operational urgency of a failure.
///
/// Derived from category and optional status code; an explicit override via
/// [`StructuredError::with_severity`] is always honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Whether an unhandled failure at this severity terminates the process
    pub fn is_critical(&self) -> bool {
        matches!(self, Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A failure enriched with category, severity, retryability and metadata.
///
/// Created at the point a failure is first recognized, either through one of
/// the per-category constructors or by converting a raw error (which routes
/// through [`classify`](super::classify)). Treated as immutable after
/// creation: the `with_*` builders consume `self` and are meant to be chained
/// at the construction site only.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct StructuredError {
    /// Human-readable error message
    pub message: String,
    /// Taxonomy bucket, fixed at classification time
    pub category: ErrorCategory,
    /// Operational urgency
    pub severity: Severity,
    /// Optional machine-readable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Optional HTTP-like status code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Whether the retry engine may attempt this operation again
    pub retryable: bool,
    /// Free-form key/value context
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Network.to_string(), "network");
        assert_eq!(ErrorCategory::RateLimit.to_string(), "rate_limit");
        assert_eq!(ErrorCategory::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_severity_is_critical() {
        assert!(Severity::Critical.is_critical());
        assert!(!Severity::High.is_critical());
        assert!(!Severity::Medium.is_critical());
        assert!(!Severity::Low.is_critical());
    }

    #[test]
    fn test_error_display_is_message() {
        let error = StructuredError::network("connection refused by host");
        assert_eq!(error.to_string(), "connection refused by host");
    }

    #[test]
    fn test_serde_round_trip() {
        let error = StructuredError::rate_limit("too many requests")
            .with_status_code(429)
            .with_code("THROTTLED");
        let json = serde_json::to_string(&error).unwrap();
        let back: StructuredError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.category, ErrorCategory::RateLimit);
        assert_eq!(back.status_code, Some(429));
        assert_eq!(back.code.as_deref(), Some("THROTTLED"));
        assert!(back.retryable);
    }
}
