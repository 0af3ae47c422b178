//! Seam traits: the persistence collaborator and the polymorphic channel
//! publish capability.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Action, SortOrder, TargetType, Trigger, TriggerPatch, TriggerQuery};

/// A publishing destination. Concrete variants live in matchcast-channels;
/// tests substitute counters.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    fn name(&self) -> &str;

    /// Publish generated copy plus an image reference. Success or a
    /// descriptive failure; adapters never retry internally.
    async fn publish(&self, content: &str, image_url: &str) -> Result<()>;
}

/// Persistence collaborator for trigger records. The core never caches
/// records across calls; the store owns them exclusively.
#[async_trait]
pub trait TriggerStore: Send + Sync {
    async fn insert(&self, trigger: Trigger) -> Result<Trigger>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Trigger>>;

    /// Filtered window. Sort key is always `name`; `skip`/`limit` map from
    /// `(page-1)*limit` / `limit`.
    async fn find(
        &self,
        query: &TriggerQuery,
        sort: SortOrder,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Trigger>>;

    /// Unpaged filtered set, for calendar grouping and free-text scans.
    async fn find_all(&self, query: &TriggerQuery) -> Result<Vec<Trigger>>;

    async fn count(&self, query: &TriggerQuery) -> Result<u64>;

    /// Arbitrary field patch. Refreshes `updated_at`; fails with
    /// `TriggerNotFound` on a miss and rejects sent→pending reversals.
    async fn update(&self, id: &str, patch: TriggerPatch) -> Result<Trigger>;

    async fn delete(&self, id: &str) -> Result<Trigger>;

    /// Every pending trigger for a fired `(action, target_id, target_type)`
    /// tuple. The matcher treats len > 1 as a data-integrity fault.
    async fn find_pending(
        &self,
        action: Action,
        target_id: &str,
        target_type: TargetType,
    ) -> Result<Vec<Trigger>>;

    /// Atomically take the dispatch lease on a pending, unclaimed trigger.
    /// Returns false when the trigger is already claimed or not pending.
    async fn claim(&self, id: &str) -> Result<bool>;

    /// Drop the dispatch lease, leaving the trigger pending.
    async fn release(&self, id: &str) -> Result<()>;
}
