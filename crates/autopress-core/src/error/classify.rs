//! Error classification tables
//!
//! Three pure functions map failures into the taxonomy: [`classify`] assigns
//! a category to an arbitrary error, [`severity_for`] derives the default
//! severity and [`is_retryable_default`] the default retryability. The
//! substring heuristics are inherently fragile (a validation message that
//! happens to contain "timeout" will classify as timeout), so the whole table
//! lives behind this module and is never duplicated at call sites.

use super::types::{ErrorCategory, Severity, StructuredError};

// Ordered checks, first match wins. Matching runs against the lowercased
// rendered message.
const NETWORK_PATTERNS: &[&str] = &[
    "connection refused",
    "connection reset",
    "econnrefused",
    "econnreset",
    "etimedout",
    "enotfound",
    "dns",
    "network",
    "unreachable",
];
const TIMEOUT_PATTERNS: &[&str] = &["timeout", "timed out"];
const RATE_LIMIT_PATTERNS: &[&str] = &["429", "too many requests", "rate limit"];
const API_PATTERNS: &[&str] = &["api key", "api error", "invalid api"];
const AUTH_PATTERNS: &[&str] = &["401", "unauthorized", "auth"];
const DATABASE_PATTERNS: &[&str] = &["sql", "database", "connection"];
const VALIDATION_PATTERNS: &[&str] = &["invalid", "validation"];

fn matches_any(message: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|pattern| message.contains(pattern))
}

/// Assign a category to an arbitrary error.
///
/// Idempotent for already-structured errors: their existing category is
/// returned unchanged. Everything else goes through the ordered substring
/// heuristics, falling back to [`ErrorCategory::Unknown`].
pub fn classify(error: &(dyn std::error::Error + 'static)) -> ErrorCategory {
    if let Some(structured) = error.downcast_ref::<StructuredError>() {
        return structured.category;
    }
    classify_message(&error.to_string())
}

/// Heuristic classification of a raw message. Check order matters.
pub(crate) fn classify_message(message: &str) -> ErrorCategory {
    let message = message.to_lowercase();
    if matches_any(&message, NETWORK_PATTERNS) {
        ErrorCategory::Network
    } else if matches_any(&message, TIMEOUT_PATTERNS) {
        ErrorCategory::Timeout
    } else if matches_any(&message, RATE_LIMIT_PATTERNS) {
        ErrorCategory::RateLimit
    } else if matches_any(&message, API_PATTERNS) {
        ErrorCategory::Api
    } else if matches_any(&message, AUTH_PATTERNS) {
        ErrorCategory::Authentication
    } else if matches_any(&message, DATABASE_PATTERNS) {
        ErrorCategory::Database
    } else if matches_any(&message, VALIDATION_PATTERNS) {
        ErrorCategory::Validation
    } else {
        ErrorCategory::Unknown
    }
}

/// Default severity for a category, optionally refined by a status code.
///
/// Rules, evaluated in order: internal and authentication failures are
/// critical; any 5xx status is high; api, database and timeout failures are
/// medium; everything else is low.
pub fn severity_for(category: ErrorCategory, status_code: Option<u16>) -> Severity {
    if matches!(
        category,
        ErrorCategory::Internal | ErrorCategory::Authentication
    ) {
        return Severity::Critical;
    }
    if status_code.is_some_and(|status| status >= 500) {
        return Severity::High;
    }
    if matches!(
        category,
        ErrorCategory::Api | ErrorCategory::Database | ErrorCategory::Timeout
    ) {
        return Severity::Medium;
    }
    Severity::Low
}

/// Default retryability for a category, optionally refined by a status code.
///
/// Any client-error status in [400, 500) other than 429 is never retryable,
/// regardless of category. Otherwise network, api, database, rate-limit and
/// timeout failures default to retryable.
pub fn is_retryable_default(category: ErrorCategory, status_code: Option<u16>) -> bool {
    if let Some(status) = status_code {
        if (400..500).contains(&status) && status != 429 {
            return false;
        }
    }
    matches!(
        category,
        ErrorCategory::Network
            | ErrorCategory::Api
            | ErrorCategory::Database
            | ErrorCategory::RateLimit
            | ErrorCategory::Timeout
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_message_table() {
        let cases = [
            ("connection refused by 10.0.0.2", ErrorCategory::Network),
            ("ECONNRESET while reading body", ErrorCategory::Network),
            ("getaddrinfo ENOTFOUND cms.example.com", ErrorCategory::Network),
            ("request timed out after 30s", ErrorCategory::Timeout),
            ("deadline exceeded: timeout", ErrorCategory::Timeout),
            ("429 Too Many Requests", ErrorCategory::RateLimit),
            ("provider rate limit exceeded", ErrorCategory::RateLimit),
            ("invalid API key supplied", ErrorCategory::Api),
            ("upstream api error (code 17)", ErrorCategory::Api),
            ("401 from provider", ErrorCategory::Authentication),
            ("unauthorized: token expired", ErrorCategory::Authentication),
            ("SQL syntax error near SELECT", ErrorCategory::Database),
            ("database is locked", ErrorCategory::Database),
            ("connection pool exhausted", ErrorCategory::Database),
            ("invalid slug: contains spaces", ErrorCategory::Validation),
            ("schema validation failed", ErrorCategory::Validation),
            ("something exploded", ErrorCategory::Unknown),
            ("", ErrorCategory::Unknown),
        ];
        for (message, expected) in cases {
            assert_eq!(
                classify_message(message),
                expected,
                "message: {message:?}"
            );
        }
    }

    #[test]
    fn test_classify_check_order() {
        // "connection refused" also matches the database "connection"
        // pattern; network is checked first and wins.
        assert_eq!(
            classify_message("connection refused"),
            ErrorCategory::Network
        );
        // ETIMEDOUT is a network-shaped name, not explicit timeout wording.
        assert_eq!(classify_message("ETIMEDOUT"), ErrorCategory::Network);
        // "invalid api key" matches api before validation.
        assert_eq!(classify_message("invalid api key"), ErrorCategory::Api);
    }

    #[test]
    fn test_classify_is_idempotent_for_structured_errors() {
        // The message alone would classify as timeout; the existing category
        // must win.
        let error = StructuredError::validation("timeout field must be a number");
        let boxed: &(dyn std::error::Error + 'static) = &error;
        assert_eq!(classify(boxed), ErrorCategory::Validation);
    }

    #[test]
    fn test_classify_raw_error() {
        let raw = std::io::Error::other("connection reset by peer");
        let dyn_err: &(dyn std::error::Error + 'static) = &raw;
        assert_eq!(classify(dyn_err), ErrorCategory::Network);
    }

    #[test]
    fn test_severity_table() {
        let cases = [
            (ErrorCategory::Internal, None, Severity::Critical),
            (ErrorCategory::Internal, Some(503), Severity::Critical),
            (ErrorCategory::Authentication, None, Severity::Critical),
            (ErrorCategory::Authentication, Some(401), Severity::Critical),
            (ErrorCategory::Network, Some(502), Severity::High),
            (ErrorCategory::RateLimit, Some(500), Severity::High),
            (ErrorCategory::Api, None, Severity::Medium),
            (ErrorCategory::Api, Some(404), Severity::Medium),
            (ErrorCategory::Database, None, Severity::Medium),
            (ErrorCategory::Timeout, None, Severity::Medium),
            (ErrorCategory::Network, None, Severity::Low),
            (ErrorCategory::RateLimit, Some(429), Severity::Low),
            (ErrorCategory::Validation, None, Severity::Low),
            (ErrorCategory::Unknown, None, Severity::Low),
        ];
        for (category, status, expected) in cases {
            assert_eq!(
                severity_for(category, status),
                expected,
                "category: {category}, status: {status:?}"
            );
        }
    }

    #[test]
    fn test_retryable_table() {
        let cases = [
            (ErrorCategory::Network, None, true),
            (ErrorCategory::Api, None, true),
            (ErrorCategory::Database, None, true),
            (ErrorCategory::RateLimit, None, true),
            (ErrorCategory::RateLimit, Some(429), true),
            (ErrorCategory::Timeout, None, true),
            (ErrorCategory::Validation, None, false),
            (ErrorCategory::Authentication, None, false),
            (ErrorCategory::Internal, None, false),
            (ErrorCategory::Unknown, None, false),
            // 4xx other than 429 is never retryable, whatever the category.
            (ErrorCategory::Network, Some(400), false),
            (ErrorCategory::Api, Some(404), false),
            (ErrorCategory::Database, Some(422), false),
            (ErrorCategory::Timeout, Some(499), false),
            // 5xx keeps the category default.
            (ErrorCategory::Api, Some(500), true),
            (ErrorCategory::Network, Some(503), true),
            (ErrorCategory::Validation, Some(500), false),
        ];
        for (category, status, expected) in cases {
            assert_eq!(
                is_retryable_default(category, status),
                expected,
                "category: {category}, status: {status:?}"
            );
        }
    }
}
