//! Email digest integration (demo shim)

use crate::transport::SimulatedTransport;
use autopress_core::{
    AutopressResult, ErrorCategory, RetryOptions, StageHandler, StructuredError, with_retry,
};
use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct DigestReceipt {
    pub message_id: Uuid,
    pub recipients: u32,
}

pub struct EmailClient {
    transport: SimulatedTransport,
    retry: RetryOptions,
}

impl Default for EmailClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailClient {
    pub fn new() -> Self {
        Self::with_transport(SimulatedTransport::new("mail-relay"))
    }

    pub fn with_transport(transport: SimulatedTransport) -> Self {
        Self {
            transport,
            retry: RetryOptions::new().with_retryable_categories(vec![
                ErrorCategory::Network,
                ErrorCategory::Timeout,
            ]),
        }
    }

    /// Override the retry policy for this client
    pub fn with_retry_options(mut self, retry: RetryOptions) -> Self {
        self.retry = retry;
        self
    }

    pub async fn send_digest(&self, subject: &str) -> AutopressResult<DigestReceipt> {
        if subject.is_empty() {
            return Err(StructuredError::validation("digest subject must not be empty"));
        }
        with_retry(|| self.transport.call("send"), &self.retry).await?;
        Ok(DigestReceipt {
            message_id: Uuid::new_v4(),
            recipients: rand::thread_rng().gen_range(120..3_500),
        })
    }
}

/// Stage wrapper: sends the weekly digest.
pub struct EmailStage {
    client: EmailClient,
    subject: String,
}

impl EmailStage {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            client: EmailClient::new(),
            subject: subject.into(),
        }
    }
}

#[async_trait]
impl StageHandler for EmailStage {
    async fn run(&self) -> AutopressResult<()> {
        let receipt = self.client.send_digest(&self.subject).await?;
        info!(
            message_id = %receipt.message_id,
            recipients = receipt.recipients,
            "digest sent"
        );
        Ok(())
    }
}
