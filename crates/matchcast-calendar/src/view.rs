//! Calendar view assembly: resolve the timeframe, fetch matching triggers,
//! group them per day and attach pagination metadata.

use matchcast_core::error::Result;
use matchcast_core::traits::TriggerStore;
use matchcast_core::types::{Condition, PaginationMeta, TargetType, TriggerQuery, TriggerStatus};
use serde::{Deserialize, Serialize};

use crate::bucket::{bucket, CalendarBucketMap};
use crate::timeframe::{resolve, RangeParams, Timeframe};

/// Optional structured filters applied on top of the resolved range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarFilters {
    pub name: Option<String>,
    /// Condition membership ("type" on the wire, kept from the original API).
    #[serde(rename = "type")]
    pub conditions: Option<Vec<Condition>>,
    pub status: Option<Vec<TriggerStatus>>,
    pub target_type: Option<Vec<TargetType>>,
    pub target_id: Option<Vec<String>>,
}

/// Calendar browse request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarRequest {
    pub time_frame: Timeframe,
    #[serde(flatten)]
    pub params: RangeParams,
    #[serde(default)]
    pub filters: CalendarFilters,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    10
}

/// Grouped-by-day response plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarView {
    pub data: CalendarBucketMap,
    pub meta: PaginationMeta,
}

fn to_query(request: &CalendarRequest, range: matchcast_core::types::TimeRange) -> TriggerQuery {
    TriggerQuery {
        created_from: Some(range.start),
        created_to: Some(range.end),
        name_contains: request.filters.name.clone(),
        conditions: request.filters.conditions.clone(),
        statuses: request.filters.status.clone(),
        target_types: request.filters.target_type.clone(),
        target_ids: request.filters.target_id.clone(),
        ..Default::default()
    }
}

/// Resolve → find → bucket. "No results" yields the dense empty-bucket map,
/// never an error.
pub async fn calendar_view(
    store: &dyn TriggerStore,
    request: &CalendarRequest,
) -> Result<CalendarView> {
    let range = resolve(request.time_frame, &request.params)?;
    let query = to_query(request, range);

    let matched = store.find_all(&query).await?;
    let total = matched.len() as u64;
    tracing::debug!(
        "📅 Calendar {} window {} → {}: {total} matching triggers",
        request.time_frame,
        range.start,
        range.end
    );

    Ok(CalendarView {
        data: bucket(&range, matched),
        meta: PaginationMeta::new(total, request.page, request.limit),
    })
}
