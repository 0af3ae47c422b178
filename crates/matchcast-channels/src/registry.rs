//! Channel registry mapping channel names to adapters.
//!
//! Unknown or unconfigured channels resolve to nothing and are skipped by the
//! coordinator, never a crash: forward-compatible with channels that exist in
//! the enum before an adapter ships.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use matchcast_core::config::MatchcastConfig;
use matchcast_core::error::Result;
use matchcast_core::traits::ChannelAdapter;
use matchcast_core::types::Channel;

use crate::facebook::FacebookAdapter;
use crate::instagram::InstagramAdapter;

/// Registry of configured channel adapters.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Channel, Arc<dyn ChannelAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from config; channels with missing credentials or
    /// `enabled = false` stay unregistered.
    pub fn from_config(config: &MatchcastConfig) -> Self {
        let mut registry = Self::new();
        if config.facebook.enabled && !config.facebook.access_token.is_empty() {
            registry.register(Channel::Facebook, Arc::new(FacebookAdapter::new(config.facebook.clone())));
        }
        if config.instagram.enabled && !config.instagram.access_token.is_empty() {
            registry.register(Channel::Instagram, Arc::new(InstagramAdapter::new(config.instagram.clone())));
        }
        if config.twitter.enabled {
            registry.register(Channel::Twitter, Arc::new(TwitterAdapter::new()));
        }
        registry
    }

    pub fn register(&mut self, channel: Channel, adapter: Arc<dyn ChannelAdapter>) {
        tracing::info!("📡 Registered channel adapter: {channel}");
        self.adapters.insert(channel, adapter);
    }

    pub fn resolve(&self, channel: Channel) -> Option<Arc<dyn ChannelAdapter>> {
        self.adapters.get(&channel).cloned()
    }

    pub fn registered(&self) -> Vec<Channel> {
        let mut channels: Vec<_> = self.adapters.keys().copied().collect();
        channels.sort_by_key(|c| c.as_str());
        channels
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Twitter publishing is declared but not yet wired to an API.
/// The slot exists so triggers naming it route somewhere visible.
pub struct TwitterAdapter;

impl TwitterAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TwitterAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelAdapter for TwitterAdapter {
    fn name(&self) -> &str {
        "twitter"
    }

    async fn publish(&self, _content: &str, _image_url: &str) -> Result<()> {
        tracing::warn!("Twitter publish: not yet implemented, post skipped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = AdapterRegistry::new();
        assert!(registry.resolve(Channel::Facebook).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_from_config_skips_unconfigured_channels() {
        let mut config = MatchcastConfig::default();
        config.facebook.access_token = "fb-token".into();
        // instagram has no token, twitter is disabled by default
        let registry = AdapterRegistry::from_config(&config);
        assert_eq!(registry.registered(), vec![Channel::Facebook]);
        assert!(registry.resolve(Channel::Instagram).is_none());
        assert!(registry.resolve(Channel::Twitter).is_none());
    }

    #[test]
    fn test_twitter_stub_registers_when_enabled() {
        let mut config = MatchcastConfig::default();
        config.twitter.enabled = true;
        let registry = AdapterRegistry::from_config(&config);
        assert!(registry.resolve(Channel::Twitter).is_some());
    }

    #[tokio::test]
    async fn test_twitter_stub_publish_is_noop_ok() {
        let adapter = TwitterAdapter::new();
        adapter.publish("caption", "https://cdn.example.com/x.png").await.unwrap();
    }
}
