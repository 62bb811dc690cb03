//! Simulated provider transport
//!
//! All integrations in this crate are demo shims: instead of a real HTTP
//! client they share this transport, which sleeps for a configurable latency
//! and fails with classifiable transient errors, either from a scripted
//! queue (tests) or at a random failure rate (demo runs). Errors come out as
//! [`StructuredError`]s so the retry engine can act on them unchanged.

use autopress_core::{AutopressResult, StructuredError};
use rand::Rng;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::sleep;

pub struct SimulatedTransport {
    provider: String,
    latency: Duration,
    failure_rate: f64,
    scripted: Mutex<VecDeque<StructuredError>>,
    calls: AtomicU32,
}

impl SimulatedTransport {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            latency: Duration::from_millis(25),
            failure_rate: 0.1,
            scripted: Mutex::new(VecDeque::new()),
            calls: AtomicU32::new(0),
        }
    }

    /// A transport that never fails on its own and adds no latency. Scripted
    /// failures still apply, which keeps tests fully deterministic.
    pub fn reliable(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            latency: Duration::ZERO,
            failure_rate: 0.0,
            scripted: Mutex::new(VecDeque::new()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate;
        self
    }

    /// Queue an error for an upcoming call. Scripted errors are returned in
    /// FIFO order before any random failure is considered.
    pub fn fail_next(&self, error: StructuredError) {
        self.scripted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(error);
    }

    /// Number of calls made so far
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Simulate one provider request.
    pub async fn call(&self, operation: &str) -> AutopressResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }
        let scripted = self
            .scripted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        if let Some(error) = scripted {
            return Err(error.with_metadata("operation", operation.to_string()));
        }
        if self.failure_rate > 0.0 && rand::thread_rng().gen_bool(self.failure_rate) {
            return Err(self.transient_error(operation));
        }
        Ok(())
    }

    fn transient_error(&self, operation: &str) -> StructuredError {
        let provider = &self.provider;
        let error = match rand::thread_rng().gen_range(0..3) {
            0 => StructuredError::network(format!("connection reset by {provider}")),
            1 => StructuredError::timeout(format!("{provider} request timed out")),
            _ => StructuredError::rate_limit(format!("429 too many requests from {provider}"))
                .with_status_code(429),
        };
        error.with_metadata("operation", operation.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopress_core::ErrorCategory;

    #[tokio::test]
    async fn test_reliable_transport_always_succeeds() {
        let transport = SimulatedTransport::reliable("cms");
        for _ in 0..20 {
            transport.call("ping").await.unwrap();
        }
        assert_eq!(transport.calls(), 20);
    }

    #[tokio::test]
    async fn test_scripted_failures_come_first_in_order() {
        let transport = SimulatedTransport::reliable("cms");
        transport.fail_next(StructuredError::network("connection reset"));
        transport.fail_next(StructuredError::timeout("slow"));

        let first = transport.call("ping").await.unwrap_err();
        assert_eq!(first.category, ErrorCategory::Network);
        assert_eq!(first.metadata["operation"], serde_json::json!("ping"));

        let second = transport.call("ping").await.unwrap_err();
        assert_eq!(second.category, ErrorCategory::Timeout);

        transport.call("ping").await.unwrap();
    }

    #[tokio::test]
    async fn test_certain_failure_rate_always_fails() {
        let transport = SimulatedTransport::reliable("cms").with_failure_rate(1.0);
        let error = transport.call("ping").await.unwrap_err();
        assert!(matches!(
            error.category,
            ErrorCategory::Network | ErrorCategory::Timeout | ErrorCategory::RateLimit
        ));
        assert!(error.retryable);
    }
}
