//! # Matchcast Calendar
//!
//! Read-side calendar browsing: timeframe keyword + partial date fields
//! resolve to an absolute window, matching triggers are grouped into one
//! bucket per calendar day.
//!
//! Flow: `timeframe::resolve` → `TriggerStore::find_all` → `bucket::bucket`.

pub mod bucket;
pub mod timeframe;
pub mod view;

pub use bucket::{bucket, CalendarBucketMap};
pub use timeframe::{parse_month, resolve, resolve_at, RangeParams, Timeframe};
pub use view::{calendar_view, CalendarFilters, CalendarRequest, CalendarView};
