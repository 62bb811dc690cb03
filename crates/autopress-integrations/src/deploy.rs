//! Site deployment integration (demo shim)

use crate::transport::SimulatedTransport;
use autopress_core::{
    AutopressResult, ErrorCategory, RetryOptions, StageHandler, with_retry,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentInfo {
    pub deploy_id: Uuid,
    pub site_url: String,
}

pub struct DeployClient {
    transport: SimulatedTransport,
    retry: RetryOptions,
    site_url: String,
}

impl Default for DeployClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DeployClient {
    pub fn new() -> Self {
        Self::with_transport(SimulatedTransport::new("pages-platform"))
    }

    pub fn with_transport(transport: SimulatedTransport) -> Self {
        Self {
            transport,
            // Deploy providers throw API-shaped errors for transient build
            // queue hiccups; those retry alongside the network ones.
            retry: RetryOptions::new().with_retryable_categories(vec![
                ErrorCategory::Network,
                ErrorCategory::Timeout,
                ErrorCategory::Api,
            ]),
            site_url: "https://demo-blog.pages.example".to_string(),
        }
    }

    /// Override the retry policy for this client
    pub fn with_retry_options(mut self, retry: RetryOptions) -> Self {
        self.retry = retry;
        self
    }

    /// Trigger a build and wait for it to go live.
    pub async fn publish_site(&self) -> AutopressResult<DeploymentInfo> {
        with_retry(|| self.transport.call("build"), &self.retry).await?;
        with_retry(|| self.transport.call("publish"), &self.retry).await?;
        Ok(DeploymentInfo {
            deploy_id: Uuid::new_v4(),
            site_url: self.site_url.clone(),
        })
    }
}

/// Stage wrapper: builds and publishes the site.
pub struct DeployStage {
    client: DeployClient,
}

impl Default for DeployStage {
    fn default() -> Self {
        Self::new()
    }
}

impl DeployStage {
    pub fn new() -> Self {
        Self {
            client: DeployClient::new(),
        }
    }
}

#[async_trait]
impl StageHandler for DeployStage {
    async fn run(&self) -> AutopressResult<()> {
        let deployment = self.client.publish_site().await?;
        info!(
            deploy_id = %deployment.deploy_id,
            site_url = %deployment.site_url,
            "site deployed"
        );
        Ok(())
    }
}
