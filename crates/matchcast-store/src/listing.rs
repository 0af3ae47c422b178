//! Listing operations over the store contract: free-text fetch, single-day
//! filtered listing and day counts. Reads never fail on "no results"; an
//! empty page is a legitimate answer.

use chrono::NaiveDate;
use matchcast_core::error::Result;
use matchcast_core::traits::TriggerStore;
use matchcast_core::types::{
    day_end, day_start, PaginationMeta, SortOrder, TargetType, Trigger, TriggerQuery,
    TriggerStatus,
};
use serde::Serialize;

use crate::query;

/// One page of triggers plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub data: Vec<Trigger>,
    pub meta: PaginationMeta,
}

/// Listing request knobs shared by fetch and day listing.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub sort: SortOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10, sort: SortOrder::Asc }
    }
}

impl PageRequest {
    fn skip(&self) -> u64 {
        self.page.saturating_sub(1) * self.limit
    }
}

/// Fetch triggers. A non-blank `search` switches to the free-text scan over
/// the enumerated fields; otherwise a structured name-sorted window is
/// returned. Search and structured filtering are mutually exclusive request
/// shapes, not composable.
pub async fn fetch(
    store: &dyn TriggerStore,
    search: Option<&str>,
    page_req: PageRequest,
) -> Result<Listing> {
    let all = TriggerQuery::default();

    if let Some(needle) = search
        && !needle.trim().is_empty()
    {
        let mut matched: Vec<Trigger> = store
            .find_all(&all)
            .await?
            .into_iter()
            .filter(|t| query::matches_search(t, needle.trim()))
            .collect();
        query::sort_by_name(&mut matched, page_req.sort);
        let meta = PaginationMeta::new(matched.len() as u64, page_req.page, page_req.limit);
        return Ok(Listing { data: matched, meta });
    }

    let data = store.find(&all, page_req.sort, page_req.skip(), page_req.limit).await?;
    let total = store.count(&all).await?;
    Ok(Listing { data, meta: PaginationMeta::new(total, page_req.page, page_req.limit) })
}

/// Optional single-day filter fields, each ANDed when present.
#[derive(Debug, Clone, Default)]
pub struct DayFilters {
    pub name: Option<String>,
    pub status: Option<TriggerStatus>,
    pub target_type: Option<TargetType>,
}

fn day_query(date: NaiveDate, filters: &DayFilters) -> TriggerQuery {
    TriggerQuery {
        created_from: Some(day_start(date)),
        created_to: Some(day_end(date)),
        name: filters.name.clone(),
        statuses: filters.status.map(|s| vec![s]),
        target_types: filters.target_type.map(|t| vec![t]),
        ..Default::default()
    }
}

/// Triggers created on the given day, filtered, name-sorted and paged.
pub async fn day_listing(
    store: &dyn TriggerStore,
    date: NaiveDate,
    filters: &DayFilters,
    page_req: PageRequest,
) -> Result<Listing> {
    let q = day_query(date, filters);
    let data = store.find(&q, page_req.sort, page_req.skip(), page_req.limit).await?;
    let total = store.count(&q).await?;
    Ok(Listing { data, meta: PaginationMeta::new(total, page_req.page, page_req.limit) })
}

/// Count of triggers created on the given day under the same compound filter.
pub async fn trigger_count(
    store: &dyn TriggerStore,
    date: NaiveDate,
    filters: &DayFilters,
) -> Result<u64> {
    store.count(&day_query(date, filters)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTriggerStore;
    use matchcast_core::types::{
        Action, Channel, Condition, ImageRef, Network, TriggerDraft,
    };

    async fn seeded() -> MemoryTriggerStore {
        let store = MemoryTriggerStore::new();
        for (name, target_id) in [("alpha", "m-1"), ("bravo", "m-2"), ("charlie", "m-3")] {
            let t = TriggerDraft {
                name: name.into(),
                created_by: "u-1".into(),
                condition: Condition::MatchScheduled,
                action: Action::MatchScheduled,
                target_type: TargetType::Match,
                target_id: target_id.into(),
                channels: vec![Channel::Instagram],
                networks: vec![Network::SocialMedia],
                image: ImageRef { url: "https://cdn.example.com/s.png".into() },
                human_approval: false,
            }
            .build()
            .unwrap();
            store.insert(t).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_fetch_structured_page() {
        let store = seeded().await;
        let listing = fetch(&store, None, PageRequest { page: 1, limit: 2, sort: SortOrder::Asc })
            .await
            .unwrap();
        assert_eq!(listing.data.len(), 2);
        assert_eq!(listing.data[0].name, "alpha");
        assert_eq!(listing.meta.total_count, 3);
        assert_eq!(listing.meta.total_pages, 2);
        assert!(listing.meta.has_next_page);
    }

    #[tokio::test]
    async fn test_fetch_blank_search_is_structured() {
        let store = seeded().await;
        let listing = fetch(&store, Some("   "), PageRequest::default()).await.unwrap();
        assert_eq!(listing.data.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_free_text() {
        let store = seeded().await;
        let listing = fetch(&store, Some("BRAVO"), PageRequest::default()).await.unwrap();
        assert_eq!(listing.data.len(), 1);
        assert_eq!(listing.data[0].name, "bravo");
        assert_eq!(listing.meta.total_count, 1);
    }

    #[tokio::test]
    async fn test_fetch_no_results_is_empty_not_error() {
        let store = seeded().await;
        let listing = fetch(&store, Some("zebra"), PageRequest::default()).await.unwrap();
        assert!(listing.data.is_empty());
        assert_eq!(listing.meta.total_count, 0);
        assert_eq!(listing.meta.total_pages, 0);
    }

    #[tokio::test]
    async fn test_day_listing_and_count() {
        let store = seeded().await;
        let today = chrono::Utc::now().date_naive();
        let filters = DayFilters { name: Some("alpha".into()), ..Default::default() };

        let listing = day_listing(&store, today, &filters, PageRequest::default()).await.unwrap();
        assert_eq!(listing.data.len(), 1);
        assert_eq!(trigger_count(&store, today, &filters).await.unwrap(), 1);

        let other_day = today.pred_opt().unwrap();
        assert_eq!(trigger_count(&store, other_day, &DayFilters::default()).await.unwrap(), 0);
    }
}
