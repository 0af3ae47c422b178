//! Dispatch coordination: match the one pending trigger, claim it, fetch
//! content, fan out to every configured channel concurrently, then commit.
//!
//! The pipeline is at-most-once and non-atomic across channels: a failing
//! channel fails the overall dispatch but never rolls back channels that
//! already published.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use matchcast_channels::AdapterRegistry;
use matchcast_core::config::MatchcastConfig;
use matchcast_core::error::{MatchcastError, Result};
use matchcast_core::traits::TriggerStore;
use matchcast_core::types::{Channel, Trigger, TriggerPatch, TriggerStatus};

use crate::content::{ContentSource, FiredEvent, HttpContentFetcher};
use crate::notify::CreatorNotifier;

/// Per-channel publish outcome kept for observability.
#[derive(Debug, Clone)]
pub struct ChannelOutcome {
    pub channel: Channel,
    pub outcome: std::result::Result<(), String>,
}

/// What a completed dispatch did.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub trigger_id: String,
    pub content: String,
    pub channels: Vec<ChannelOutcome>,
}

pub struct DispatchCoordinator {
    store: Arc<dyn TriggerStore>,
    content: Arc<dyn ContentSource>,
    registry: AdapterRegistry,
    notifier: CreatorNotifier,
    channel_timeout: Duration,
}

impl DispatchCoordinator {
    pub fn new(
        store: Arc<dyn TriggerStore>,
        content: Arc<dyn ContentSource>,
        registry: AdapterRegistry,
        notifier: CreatorNotifier,
        channel_timeout: Duration,
    ) -> Self {
        Self { store, content, registry, notifier, channel_timeout }
    }

    /// Wire the coordinator from config: HTTP content fetcher plus the
    /// config-derived adapter registry.
    pub fn from_config(config: &MatchcastConfig, store: Arc<dyn TriggerStore>) -> Self {
        Self::new(
            store,
            Arc::new(HttpContentFetcher::new(config.content.clone())),
            AdapterRegistry::from_config(config),
            CreatorNotifier::new(&config.notify),
            Duration::from_secs(config.dispatch.channel_timeout_secs),
        )
    }

    /// Find the unique pending trigger for the fired tuple. Zero matches is
    /// `TriggerNotFound`; more than one is a data-integrity fault, surfaced
    /// distinctly, never a silent pick.
    pub async fn match_pending(&self, event: &FiredEvent) -> Result<Trigger> {
        let mut found = self
            .store
            .find_pending(event.action, &event.target_id, event.target_type)
            .await?;
        match found.len() {
            0 => Err(MatchcastError::TriggerNotFound(format!(
                "no pending trigger for ({}, {}, {})",
                event.action, event.target_id, event.target_type
            ))),
            1 => Ok(found.remove(0)),
            n => Err(MatchcastError::DataIntegrity(format!(
                "{n} pending triggers share ({}, {}, {})",
                event.action, event.target_id, event.target_type
            ))),
        }
    }

    /// Run the full pipeline for a fired condition.
    pub async fn dispatch(&self, event: &FiredEvent) -> Result<DispatchReport> {
        let trigger = self.match_pending(event).await?;

        // Optimistic claim: a competing dispatch racing this one loses here
        // instead of double-publishing.
        if !self.store.claim(&trigger.id).await? {
            return Err(MatchcastError::TriggerNotFound(format!(
                "trigger {} is already claimed by a concurrent dispatch",
                trigger.id
            )));
        }

        if trigger.human_approval {
            // Modeled but not yet consulted; awaiting product decision.
            tracing::warn!(
                "Trigger {} requires human approval but dispatch is not gated on it",
                trigger.id
            );
        }

        self.notifier.spawn_notice(&trigger, event.creator_email.as_deref());

        let content = match self.content.fetch(event).await {
            Ok(content) => content,
            Err(e) => {
                // Trigger stays pending and untouched; zero channel calls.
                self.store.release(&trigger.id).await?;
                return Err(e);
            }
        };

        let channels = self.fan_out(&trigger, &content).await;
        let all_ok = channels.iter().all(|c| c.outcome.is_ok());

        // Content is persisted once all channel calls settled, success or
        // not; the status flip is reserved for a fully successful dispatch.
        let patch = TriggerPatch {
            content: Some(content.clone()),
            status: all_ok.then_some(TriggerStatus::Sent),
            ..Default::default()
        };
        // The lease is dropped no matter how the persist went; a wedged claim
        // would block every later dispatch for this tuple.
        let updated = self.store.update(&trigger.id, patch).await;
        self.store.release(&trigger.id).await?;
        updated?;

        if let Some(failed) = channels.iter().find(|c| c.outcome.is_err()) {
            let reason = failed.outcome.clone().err().unwrap_or_default();
            return Err(MatchcastError::ChannelPublish {
                channel: failed.channel.as_str().into(),
                reason,
            });
        }

        tracing::info!(
            "✅ Trigger {} dispatched to {} channel(s)",
            trigger.id,
            channels.len()
        );
        Ok(DispatchReport { trigger_id: trigger.id, content, channels })
    }

    /// Fan content out to every resolvable adapter concurrently. Channels
    /// fail independently; each call is bounded by the per-adapter timeout.
    async fn fan_out(&self, trigger: &Trigger, content: &str) -> Vec<ChannelOutcome> {
        let mut publishes = Vec::new();
        for &channel in &trigger.channels {
            let Some(adapter) = self.registry.resolve(channel) else {
                tracing::warn!(
                    "Trigger {} names channel {channel} with no registered adapter, skipping",
                    trigger.id
                );
                continue;
            };
            let content = content.to_string();
            let image_url = trigger.image.url.clone();
            let timeout = self.channel_timeout;
            publishes.push(async move {
                let outcome = match tokio::time::timeout(
                    timeout,
                    adapter.publish(&content, &image_url),
                )
                .await
                {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(_) => Err(format!("publish timed out after {}s", timeout.as_secs())),
                };
                if let Err(reason) = &outcome {
                    tracing::warn!("⚠️ {channel} publish failed: {reason}");
                }
                ChannelOutcome { channel, outcome }
            });
        }
        join_all(publishes).await
    }
}
