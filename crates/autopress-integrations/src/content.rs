//! Article generation integration (demo shim)

use crate::transport::SimulatedTransport;
use autopress_core::{
    AutopressResult, ErrorCategory, RetryOptions, StageHandler, StructuredError, with_retry,
};
use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use tracing::info;

/// Generated sample article.
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub title: String,
    pub slug: String,
    pub word_count: u32,
    pub body_markdown: String,
}

pub struct ContentClient {
    transport: SimulatedTransport,
    retry: RetryOptions,
}

impl Default for ContentClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentClient {
    pub fn new() -> Self {
        Self::with_transport(SimulatedTransport::new("scribe-api"))
    }

    pub fn with_transport(transport: SimulatedTransport) -> Self {
        Self {
            transport,
            retry: RetryOptions::new().with_retryable_categories(vec![
                ErrorCategory::Network,
                ErrorCategory::Timeout,
                ErrorCategory::RateLimit,
                ErrorCategory::Api,
            ]),
        }
    }

    /// Override the retry policy for this client
    pub fn with_retry_options(mut self, retry: RetryOptions) -> Self {
        self.retry = retry;
        self
    }

    pub async fn generate_article(&self, topic: &str) -> AutopressResult<Article> {
        if topic.trim().is_empty() {
            return Err(StructuredError::validation("article topic must not be empty"));
        }
        with_retry(|| self.transport.call("generate"), &self.retry).await?;
        let title = format!("The Complete Guide to {topic}");
        let slug = topic.to_lowercase().replace(' ', "-");
        let word_count = rand::thread_rng().gen_range(800..2_400);
        Ok(Article {
            body_markdown: format!("# {title}\n\nSample article body about {topic}.\n"),
            title,
            slug,
            word_count,
        })
    }
}

/// Stage wrapper: generates one article for the configured topic.
pub struct ContentStage {
    client: ContentClient,
    topic: String,
}

impl ContentStage {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            client: ContentClient::new(),
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl StageHandler for ContentStage {
    async fn run(&self) -> AutopressResult<()> {
        let article = self.client.generate_article(&self.topic).await?;
        info!(
            title = %article.title,
            slug = %article.slug,
            word_count = article.word_count,
            "article generated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generates_sample_article() {
        let client = ContentClient::with_transport(SimulatedTransport::reliable("scribe-api"));
        let article = client.generate_article("rust testing").await.unwrap();
        assert_eq!(article.slug, "rust-testing");
        assert!(article.title.contains("rust testing"));
        assert!(article.word_count >= 800);
    }

    #[tokio::test]
    async fn test_empty_topic_is_rejected_without_calling_provider() {
        let client = ContentClient::with_transport(SimulatedTransport::reliable("scribe-api"));
        let error = client.generate_article("  ").await.unwrap_err();
        assert_eq!(error.category, ErrorCategory::Validation);
        assert_eq!(client.transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_retryable_provider_error_escapes_immediately() {
        let transport = SimulatedTransport::reliable("scribe-api");
        transport.fail_next(
            StructuredError::authentication("401 unauthorized").with_status_code(401),
        );
        let client = ContentClient::with_transport(transport);
        let error = client.generate_article("rust").await.unwrap_err();
        assert_eq!(error.category, ErrorCategory::Authentication);
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_budget_exhaustion_surfaces_last_error() {
        let transport = SimulatedTransport::reliable("scribe-api");
        for _ in 0..3 {
            transport.fail_next(StructuredError::timeout("scribe-api request timed out"));
        }
        let client = ContentClient::with_transport(transport).with_retry_options(
            RetryOptions::new()
                .with_initial_delay(std::time::Duration::from_millis(1))
                .with_retryable_categories(vec![ErrorCategory::Timeout]),
        );
        let error = client.generate_article("rust").await.unwrap_err();
        assert_eq!(error.category, ErrorCategory::Timeout);
        // Default budget is three attempts.
        assert_eq!(client.transport.calls(), 3);
    }
}
