//! Instagram business-account posting.
//!
//! Publishing is a two-step container protocol on the Graph API: create a
//! media container from an image URL + caption, then publish the container by
//! its returned id. The business account id is resolved from the linked
//! Facebook page first.

use async_trait::async_trait;
use matchcast_core::config::InstagramConfig;
use matchcast_core::error::{MatchcastError, Result};
use matchcast_core::traits::ChannelAdapter;

pub struct InstagramAdapter {
    config: InstagramConfig,
    client: reqwest::Client,
}

impl InstagramAdapter {
    pub fn new(config: InstagramConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }

    fn publish_error(&self, reason: String) -> MatchcastError {
        MatchcastError::ChannelPublish { channel: "instagram".into(), reason }
    }

    async fn post_json(&self, url: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(url)
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

        response
            .json()
            .await
            .map_err(|e| self.publish_error(format!("Invalid Graph API response: {e}")))
    }

    /// Resolve the Instagram business account linked to the configured page.
    async fn instagram_account_id(&self) -> Result<String> {
        let url = format!("{}/{}", self.config.graph_url, self.config.page_id);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("fields", "instagram_business_account"),
                ("access_token", self.config.access_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.publish_error(format!("account lookup failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(self.publish_error(format!("account lookup error {status}: {error_text}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| self.publish_error(format!("Invalid account lookup response: {e}")))?;

        body["instagram_business_account"]["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                self.publish_error(format!(
                    "page {} has no linked instagram business account",
                    self.config.page_id
                ))
            })
    }
}

#[async_trait]
impl ChannelAdapter for InstagramAdapter {
    fn name(&self) -> &str {
        "instagram"
    }

    async fn publish(&self, content: &str, image_url: &str) -> Result<()> {
        let account_id = self.instagram_account_id().await?;

        // Step 1: create the media container.
        let media_url = format!("{}/{}/media", self.config.graph_url, account_id);
        let media = self
            .post_json(
                &media_url,
                serde_json::json!({
                    "image_url": image_url,
                    "caption": content,
                    "access_token": self.config.access_token,
                }),
            )
            .await?;
        let creation_id = media["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| self.publish_error("media container response missing id".into()))?;

        // Step 2: publish the container.
        let publish_url = format!("{}/{}/media_publish", self.config.graph_url, account_id);
        self.post_json(
            &publish_url,
            serde_json::json!({
                "creation_id": creation_id,
                "access_token": self.config.access_token,
            }),
        )
        .await?;

        tracing::info!("✅ Posted on Instagram (container {creation_id})");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_name() {
        let adapter = InstagramAdapter::new(InstagramConfig::default());
        assert_eq!(adapter.name(), "instagram");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_publish_failure() {
        let config = InstagramConfig {
            access_token: "test".into(),
            page_id: "106853855657467".into(),
            graph_url: "http://127.0.0.1:1/v20.0".into(),
            enabled: true,
        };
        let adapter = InstagramAdapter::new(config);
        let err = adapter.publish("caption", "https://cdn.example.com/x.png").await.unwrap_err();
        assert_eq!(err.kind(), "channel_publish_failed");
    }
}
