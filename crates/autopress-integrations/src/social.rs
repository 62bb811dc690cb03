//! Social post scheduling integration (demo shim)

use crate::transport::SimulatedTransport;
use autopress_core::{
    AutopressResult, ErrorCategory, RetryOptions, StageHandler, with_retry,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledPost {
    pub platform: String,
    pub url: String,
    pub scheduled_for: DateTime<Utc>,
}

pub struct SocialClient {
    transport: SimulatedTransport,
    retry: RetryOptions,
}

impl Default for SocialClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SocialClient {
    pub fn new() -> Self {
        Self::with_transport(SimulatedTransport::new("post-scheduler"))
    }

    pub fn with_transport(transport: SimulatedTransport) -> Self {
        Self {
            transport,
            // Schedulers throttle aggressively; rate limits are the main
            // transient failure here.
            retry: RetryOptions::new().with_retryable_categories(vec![
                ErrorCategory::Network,
                ErrorCategory::RateLimit,
            ]),
        }
    }

    /// Override the retry policy for this client
    pub fn with_retry_options(mut self, retry: RetryOptions) -> Self {
        self.retry = retry;
        self
    }

    pub async fn schedule_post(&self, platform: &str, url: &str) -> AutopressResult<ScheduledPost> {
        with_retry(|| self.transport.call("schedule"), &self.retry).await?;
        Ok(ScheduledPost {
            platform: platform.to_string(),
            url: url.to_string(),
            scheduled_for: Utc::now() + Duration::hours(2),
        })
    }
}

/// Stage wrapper: schedules one promotional post per platform.
pub struct SocialStage {
    client: SocialClient,
    platforms: Vec<String>,
    url: String,
}

impl SocialStage {
    pub fn new(platforms: Vec<String>, url: impl Into<String>) -> Self {
        Self {
            client: SocialClient::new(),
            platforms,
            url: url.into(),
        }
    }
}

#[async_trait]
impl StageHandler for SocialStage {
    async fn run(&self) -> AutopressResult<()> {
        for platform in &self.platforms {
            let post = self.client.schedule_post(platform, &self.url).await?;
            info!(
                platform = %post.platform,
                scheduled_for = %post.scheduled_for,
                "post scheduled"
            );
        }
        Ok(())
    }
}
