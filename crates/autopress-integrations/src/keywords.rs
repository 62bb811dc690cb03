//! Keyword research integration (demo shim)

use crate::transport::SimulatedTransport;
use autopress_core::{
    AutopressResult, ErrorCategory, RetryOptions, StageHandler, with_retry,
};
use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use tracing::info;

/// Sample keyword set for a topic.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordSet {
    pub topic: String,
    pub keywords: Vec<String>,
    pub avg_monthly_searches: u32,
}

pub struct KeywordClient {
    transport: SimulatedTransport,
    retry: RetryOptions,
}

impl Default for KeywordClient {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordClient {
    pub fn new() -> Self {
        Self::with_transport(SimulatedTransport::new("keyword-planner"))
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

    pub async fn research(&self, topic: &str) -> AutopressResult<KeywordSet> {
        with_retry(|| self.transport.call("research"), &self.retry).await?;
        let mut rng = rand::thread_rng();
        let keywords = [
            format!("{topic} guide"),
            format!("best {topic}"),
            format!("{topic} tutorial"),
            format!("how to {topic}"),
        ];
        Ok(KeywordSet {
            topic: topic.to_string(),
            keywords: keywords.into_iter().collect(),
            avg_monthly_searches: rng.gen_range(1_200..45_000),
        })
    }
}

/// Stage wrapper: researches keywords for the configured topic.
pub struct KeywordStage {
    client: KeywordClient,
    topic: String,
}

impl KeywordStage {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            client: KeywordClient::new(),
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl StageHandler for KeywordStage {
    async fn run(&self) -> AutopressResult<()> {
        let set = self.client.research(&self.topic).await?;
        info!(
            topic = %set.topic,
            keywords = set.keywords.len(),
            avg_monthly_searches = set.avg_monthly_searches,
            "keyword research finished"
        );
        Ok(())
    }
}
