//! # Matchcast Dispatch
//!
//! The condition-fired pipeline: resolve the unique pending trigger, claim
//! it, fetch generated content, fan out to every configured channel
//! concurrently, and commit the result.

pub mod content;
pub mod coordinator;
pub mod notify;

pub use content::{ContentSource, FiredEvent, HttpContentFetcher, SubjectStatus};
pub use coordinator::{ChannelOutcome, DispatchCoordinator, DispatchReport};
pub use notify::CreatorNotifier;
