//! # Matchcast Core
//!
//! Shared foundation for the Matchcast workspace: the trigger domain model,
//! the error taxonomy, configuration, and the store/adapter seam traits.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::MatchcastConfig;
pub use error::{MatchcastError, Result};
pub use traits::{ChannelAdapter, TriggerStore};
pub use types::{
    Action, Channel, Condition, ImageRef, Network, PaginationMeta, SortOrder, TargetType,
    TimeRange, Trigger, TriggerDraft, TriggerPatch, TriggerQuery, TriggerStatus,
};
