//! Error types for Autopress
//!
//! This module provides the shared failure taxonomy used across all Autopress
//! crates. Every failure is represented as a [`StructuredError`] carrying a
//! category, a severity, a retryability flag and free-form metadata, so that
//! the retry engine and the failure supervisor can act on any error without
//! knowing where it came from.

mod classify;
mod constructors;
mod conversions;
mod types;

// Re-export all public types and functions
pub use classify::{classify, is_retryable_default, severity_for};
pub use types::{AutopressResult, ErrorCategory, Severity, StructuredError};
