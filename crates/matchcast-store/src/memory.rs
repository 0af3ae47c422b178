//! In-memory trigger store. Reference implementation of the store contract;
//! production deployments point the same trait at a real document store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use matchcast_core::error::{MatchcastError, Result};
use matchcast_core::traits::TriggerStore;
use matchcast_core::types::{
    Action, SortOrder, TargetType, Trigger, TriggerPatch, TriggerQuery, TriggerStatus,
};

use crate::query;

/// HashMap-backed store guarded by a single RwLock. Lock scope never crosses
/// an await point.
#[derive(Default)]
pub struct MemoryTriggerStore {
    records: RwLock<HashMap<String, Trigger>>,
}

impl MemoryTriggerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Trigger>>> {
        self.records
            .read()
            .map_err(|e| MatchcastError::Store(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Trigger>>> {
        self.records
            .write()
            .map_err(|e| MatchcastError::Store(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl TriggerStore for MemoryTriggerStore {
    async fn insert(&self, trigger: Trigger) -> Result<Trigger> {
        let mut records = self.write()?;
        records.insert(trigger.id.clone(), trigger.clone());
        tracing::debug!("📝 Trigger inserted: '{}' ({})", trigger.name, trigger.id);
        Ok(trigger)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Trigger>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find(
        &self,
        q: &TriggerQuery,
        sort: SortOrder,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Trigger>> {
        let mut matched = self.find_all(q).await?;
        query::sort_by_name(&mut matched, sort);
        Ok(query::window(matched, skip, limit))
    }

    async fn find_all(&self, q: &TriggerQuery) -> Result<Vec<Trigger>> {
        Ok(self
            .read()?
            .values()
            .filter(|t| query::matches(q, t))
            .cloned()
            .collect())
    }

    async fn count(&self, q: &TriggerQuery) -> Result<u64> {
        Ok(self.read()?.values().filter(|t| query::matches(q, t)).count() as u64)
    }

    async fn update(&self, id: &str, patch: TriggerPatch) -> Result<Trigger> {
        let mut records = self.write()?;
        let trigger = records
            .get_mut(id)
            .ok_or_else(|| MatchcastError::TriggerNotFound(id.to_string()))?;
        // Status is monotonic: sent never reverts to pending.
        if trigger.status == TriggerStatus::Sent && patch.status == Some(TriggerStatus::Pending) {
            return Err(MatchcastError::Validation(
                "status cannot transition from sent back to pending".into(),
            ));
        }
        // Patch a copy first: a rejected patch must leave the stored record
        // untouched.
        let mut patched = trigger.clone();
        patch.apply(&mut patched);
        patched.validate()?;
        *trigger = patched.clone();
        Ok(patched)
    }

    async fn delete(&self, id: &str) -> Result<Trigger> {
        let mut records = self.write()?;
        records
            .remove(id)
            .ok_or_else(|| MatchcastError::TriggerNotFound(id.to_string()))
    }

    async fn find_pending(
        &self,
        action: Action,
        target_id: &str,
        target_type: TargetType,
    ) -> Result<Vec<Trigger>> {
        Ok(self
            .read()?
            .values()
            .filter(|t| {
                t.status == TriggerStatus::Pending
                    && t.action == action
                    && t.target_id == target_id
                    && t.target_type == target_type
            })
            .cloned()
            .collect())
    }

    async fn claim(&self, id: &str) -> Result<bool> {
        let mut records = self.write()?;
        let trigger = records
            .get_mut(id)
            .ok_or_else(|| MatchcastError::TriggerNotFound(id.to_string()))?;
        if trigger.status != TriggerStatus::Pending || trigger.claimed {
            return Ok(false);
        }
        trigger.claimed = true;
        trigger.updated_at = Utc::now();
        Ok(true)
    }

    async fn release(&self, id: &str) -> Result<()> {
        let mut records = self.write()?;
        if let Some(trigger) = records.get_mut(id) {
            trigger.claimed = false;
            trigger.updated_at = Utc::now();
        }
        Ok(())
    }
}
