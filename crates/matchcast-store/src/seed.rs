//! Dummy-data seeding for demos and local runs. The count is an explicit
//! parameter threaded through the call, no process-wide counters.

use matchcast_core::error::Result;
use matchcast_core::traits::TriggerStore;
use matchcast_core::types::{
    Channel, Condition, ImageRef, Network, TargetType, Trigger, TriggerDraft,
};
use rand::seq::SliceRandom;
use rand::Rng;

const NAME_WORDS: &[&str] = &[
    "Boundary", "Wicket", "Innings", "Powerplay", "Century", "Hattrick", "Partnership",
    "Super Over", "Final", "Derby",
];

fn random_draft(rng: &mut impl Rng) -> TriggerDraft {
    let condition = *Condition::ALL.choose(rng).unwrap_or(&Condition::MatchFinished);
    let action = *condition
        .allowed_actions()
        .choose(rng)
        .unwrap_or(&condition.allowed_actions()[0]);
    let first = NAME_WORDS.choose(rng).unwrap_or(&"Match");
    let second = NAME_WORDS.choose(rng).unwrap_or(&"Post");
    TriggerDraft {
        name: format!("{first} {second}"),
        created_by: uuid::Uuid::new_v4().to_string(),
        condition,
        action,
        target_type: *TargetType::ALL.choose(rng).unwrap_or(&TargetType::Match),
        target_id: uuid::Uuid::new_v4().to_string(),
        channels: vec![Channel::Instagram, Channel::Facebook],
        networks: vec![Network::SocialMedia],
        image: ImageRef {
            url: format!("https://cdn.example.com/media/{}.png", rng.gen_range(1..=9999)),
        },
        human_approval: rng.gen_bool(0.5),
    }
}

/// Insert `count` valid random triggers, actions drawn from each condition's
/// allowed set. Returns the inserted records.
pub async fn seed(store: &dyn TriggerStore, count: usize) -> Result<Vec<Trigger>> {
    let mut rng = rand::thread_rng();
    let mut inserted = Vec::with_capacity(count);
    for _ in 0..count {
        let trigger = random_draft(&mut rng).build()?;
        inserted.push(store.insert(trigger).await?);
    }
    tracing::info!("🌱 Seeded {} dummy triggers", inserted.len());
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTriggerStore;
    use matchcast_core::types::TriggerQuery;

    #[tokio::test]
    async fn test_seed_inserts_exact_count() {
        let store = MemoryTriggerStore::new();
        let inserted = seed(&store, 12).await.unwrap();
        assert_eq!(inserted.len(), 12);
        assert_eq!(store.count(&TriggerQuery::default()).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_seeded_triggers_are_valid() {
        let store = MemoryTriggerStore::new();
        for trigger in seed(&store, 20).await.unwrap() {
            trigger.validate().unwrap();
            assert!(trigger.condition.allowed_actions().contains(&trigger.action));
        }
    }
}
