//! Autopress Integrations
//!
//! Thin shims around the external content, deployment and analytics
//! providers the pipeline stitches together. Every module here is demo code:
//! it returns fixed or randomly generated sample data over a simulated
//! transport instead of calling a real service. What the shims do take
//! seriously is the failure contract — each wraps its provider calls in the
//! core retry engine with a category allow-list and surfaces classifiable
//! structured errors, exactly as a production integration would.

pub mod analytics;
pub mod content;
pub mod deploy;
pub mod email;
pub mod keywords;
pub mod seo;
pub mod social;
pub mod transport;

pub use analytics::{AnalyticsClient, AnalyticsStage};
pub use content::{Article, ContentClient, ContentStage};
pub use deploy::{DeployClient, DeployStage, DeploymentInfo};
pub use email::{DigestReceipt, EmailClient, EmailStage};
pub use keywords::{KeywordClient, KeywordSet, KeywordStage};
pub use seo::{SeoClient, SeoSnapshot, SeoStage};
pub use social::{ScheduledPost, SocialClient, SocialStage};
pub use transport::SimulatedTransport;

use autopress_core::HandlerRegistry;

/// The demo site every stage operates on.
const DEMO_TOPIC: &str = "batch cooking";
const DEMO_SITE_URL: &str = "https://demo-blog.pages.example";

/// Registry with every demo stage wired up, in content-pipeline order:
/// research, write, publish, then measure and distribute.
pub fn default_registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .register("keywords", Box::new(KeywordStage::new(DEMO_TOPIC)))
        .register("content", Box::new(ContentStage::new(DEMO_TOPIC)))
        .register("deploy", Box::new(DeployStage::new()))
        .register("seo", Box::new(SeoStage::new(DEMO_SITE_URL)))
        .register(
            "social",
            Box::new(SocialStage::new(
                vec!["mastodon".to_string(), "bluesky".to_string()],
                DEMO_SITE_URL,
            )),
        )
        .register(
            "email",
            Box::new(EmailStage::new("This week on the demo blog")),
        )
        .register("analytics", Box::new(AnalyticsStage::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_matches_sample_config() {
        let registry = default_registry();
        let config = autopress_core::PipelineConfig::sample();
        for stage in &config.stages {
            assert!(
                registry.names().contains(&stage.name.as_str()),
                "sample config references unregistered stage {}",
                stage.name
            );
        }
    }
}
