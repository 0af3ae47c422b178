//! Facebook page posting via the Graph API photo endpoint.

use async_trait::async_trait;
use matchcast_core::config::FacebookConfig;
use matchcast_core::error::{MatchcastError, Result};
use matchcast_core::traits::ChannelAdapter;

/// Posts a captioned photo to the page behind the configured access token.
pub struct FacebookAdapter {
    config: FacebookConfig,
    client: reqwest::Client,
}

impl FacebookAdapter {
    pub fn new(config: FacebookConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    fn publish_error(&self, reason: String) -> MatchcastError {
        MatchcastError::ChannelPublish { channel: "facebook".into(), reason }
    }
}

#[async_trait]
impl ChannelAdapter for FacebookAdapter {
    fn name(&self) -> &str {
        "facebook"
    }

    async fn publish(&self, content: &str, image_url: &str) -> Result<()> {
        let url = format!("{}/me/photos", self.config.graph_url);
        let body = serde_json::json!({
            "url": image_url,
            "caption": content,
            "access_token": self.config.access_token,
        });

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.publish_error(format!("Graph API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.publish_error(format!("Graph API error {status}: {error_text}")));
        }

        tracing::info!("✅ Posted on Facebook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_name() {
        let adapter = FacebookAdapter::new(FacebookConfig::default());
        assert_eq!(adapter.name(), "facebook");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_publish_failure() {
        let config = FacebookConfig {
            access_token: "test".into(),
            graph_url: "http://127.0.0.1:1/v20.0".into(),
            enabled: true,
        };
        let adapter = FacebookAdapter::new(config);
        let err = adapter.publish("caption", "https://cdn.example.com/x.png").await.unwrap_err();
        assert_eq!(err.kind(), "channel_publish_failed");
    }
}
