//! # Matchcast Store
//!
//! The trigger persistence surface: compound filters, free-text search over
//! an explicit field list, name-sorted pagination, listing operations and an
//! in-memory reference store.

pub mod listing;
pub mod memory;
pub mod query;
pub mod seed;

pub use listing::{day_listing, fetch, trigger_count, DayFilters, Listing, PageRequest};
pub use memory::MemoryTriggerStore;
pub use seed::seed;
