//! Logging sink abstraction
//!
//! The core logs through a small injectable trait rather than calling a
//! concrete backend, so the failure supervisor and orchestrator can be tested
//! with a collecting fake. All methods are synchronous and side-effect-only.

use crate::error::StructuredError;

/// Severity-tagged logging sink.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str, context: Option<&serde_json::Value>);
    fn info(&self, message: &str, context: Option<&serde_json::Value>);
    fn warn(&self, message: &str, context: Option<&serde_json::Value>);
    fn error(
        &self,
        message: &str,
        error: Option<&StructuredError>,
        context: Option<&serde_json::Value>,
    );
    /// Last log line before a possible process termination. Implementations
    /// must write synchronously so the line is flushed before exit.
    fn fatal(
        &self,
        message: &str,
        error: Option<&StructuredError>,
        context: Option<&serde_json::Value>,
    );
}

/// Default sink forwarding to the `tracing` macros.
///
/// `tracing` has no fatal level; fatal lines are emitted at error level with
/// a `fatal` marker field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str, context: Option<&serde_json::Value>) {
        tracing::debug!(context = ?context, "{message}");
    }

    fn info(&self, message: &str, context: Option<&serde_json::Value>) {
        tracing::info!(context = ?context, "{message}");
    }

    fn warn(&self, message: &str, context: Option<&serde_json::Value>) {
        tracing::warn!(context = ?context, "{message}");
    }

    fn error(
        &self,
        message: &str,
        error: Option<&StructuredError>,
        context: Option<&serde_json::Value>,
    ) {
        match error {
            Some(error) => tracing::error!(
                category = %error.category,
                severity = %error.severity,
                context = ?context,
                "{message}: {error}"
            ),
            None => tracing::error!(context = ?context, "{message}"),
        }
    }

    fn fatal(
        &self,
        message: &str,
        error: Option<&StructuredError>,
        context: Option<&serde_json::Value>,
    ) {
        match error {
            Some(error) => tracing::error!(
                fatal = true,
                category = %error.category,
                severity = %error.severity,
                context = ?context,
                "{message}: {error}"
            ),
            None => tracing::error!(fatal = true, context = ?context, "{message}"),
        }
    }
}
