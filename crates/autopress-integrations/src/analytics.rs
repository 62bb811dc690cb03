//! Analytics dashboard integration (demo shim)

use crate::transport::SimulatedTransport;
use autopress_core::{
    AutopressResult, ErrorCategory, RetryOptions, StageHandler, with_retry,
};
use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct StatsUpload {
    pub rows: u32,
    pub dashboard_url: String,
}

pub struct AnalyticsClient {
    transport: SimulatedTransport,
    retry: RetryOptions,
}

impl Default for AnalyticsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsClient {
    pub fn new() -> Self {
        Self::with_transport(SimulatedTransport::new("dash-ingest"))
    }

    pub fn with_transport(transport: SimulatedTransport) -> Self {
        Self {
            transport,
            retry: RetryOptions::new().with_retryable_categories(vec![
                ErrorCategory::Network,
                ErrorCategory::Timeout,
                ErrorCategory::RateLimit,
                ErrorCategory::Database,
            ]),
        }
    }

    /// Override the retry policy for this client
    pub fn with_retry_options(mut self, retry: RetryOptions) -> Self {
        self.retry = retry;
        self
    }

    pub async fn push_stats(&self) -> AutopressResult<StatsUpload> {
        with_retry(|| self.transport.call("ingest"), &self.retry).await?;
        Ok(StatsUpload {
            rows: rand::thread_rng().gen_range(40..900),
            dashboard_url: "https://dash.example/boards/content".to_string(),
        })
    }
}

/// Stage wrapper: pushes the run's stats to the dashboard.
pub struct AnalyticsStage {
    client: AnalyticsClient,
}

impl Default for AnalyticsStage {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsStage {
    pub fn new() -> Self {
        Self {
            client: AnalyticsClient::new(),
        }
    }
}

#[async_trait]
impl StageHandler for AnalyticsStage {
    async fn run(&self) -> AutopressResult<()> {
        let upload = self.client.push_stats().await?;
        info!(
            rows = upload.rows,
            dashboard_url = %upload.dashboard_url,
            "stats pushed"
        );
        Ok(())
    }
}
