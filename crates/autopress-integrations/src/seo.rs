//! SEO metrics integration (demo shim)

use crate::transport::SimulatedTransport;
use autopress_core::{
    AutopressResult, ErrorCategory, RetryOptions, StageHandler, with_retry,
};
use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct SeoSnapshot {
    pub url: String,
    pub score: u8,
    pub issues: Vec<String>,
}

pub struct SeoClient {
    transport: SimulatedTransport,
    retry: RetryOptions,
}

impl Default for SeoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SeoClient {
    pub fn new() -> Self {
        Self::with_transport(SimulatedTransport::new("crawl-metrics"))
    }

    pub fn with_transport(transport: SimulatedTransport) -> Self {
        Self {
            transport,
            retry: RetryOptions::new().with_retryable_categories(vec![
                ErrorCategory::Network,
                ErrorCategory::Timeout,
                ErrorCategory::RateLimit,
            ]),
        }
    }

    /// Override the retry policy for this client
    pub fn with_retry_options(mut self, retry: RetryOptions) -> Self {
        self.retry = retry;
        self
    }

    pub async fn audit(&self, url: &str) -> AutopressResult<SeoSnapshot> {
        with_retry(|| self.transport.call("audit"), &self.retry).await?;
        let mut rng = rand::thread_rng();
        let score = rng.gen_range(62..100);
        let issues = if score < 80 {
            vec!["missing meta description".to_string()]
        } else {
            Vec::new()
        };
        Ok(SeoSnapshot {
            url: url.to_string(),
            score,
            issues,
        })
    }
}

/// Stage wrapper: audits the deployed site.
pub struct SeoStage {
    client: SeoClient,
    url: String,
}

impl SeoStage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: SeoClient::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl StageHandler for SeoStage {
    async fn run(&self) -> AutopressResult<()> {
        let snapshot = self.client.audit(&self.url).await?;
        if snapshot.issues.is_empty() {
            info!(url = %snapshot.url, score = snapshot.score, "seo audit clean");
        } else {
            warn!(
                url = %snapshot.url,
                score = snapshot.score,
                issues = snapshot.issues.len(),
                "seo audit found issues"
            );
        }
        Ok(())
    }
}
