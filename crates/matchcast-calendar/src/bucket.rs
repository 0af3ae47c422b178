//! Per-day calendar grouping: a dense bucket map over a resolved range.

use std::collections::BTreeMap;

use chrono::Duration;
use matchcast_core::types::{TimeRange, Trigger};

/// Ordered `YYYY-MM-DD` → triggers map. Every day in the range is present,
/// empty or not.
pub type CalendarBucketMap = BTreeMap<String, Vec<Trigger>>;

fn date_key(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Group records by the calendar day of their `created_at`. Records whose day
/// key falls outside the range (clock skew) are silently dropped; callers
/// needing exact totals cross-check with the store count.
pub fn bucket(range: &TimeRange, records: Vec<Trigger>) -> CalendarBucketMap {
    let mut buckets = CalendarBucketMap::new();

    let mut day = range.start.date_naive();
    let last = range.end.date_naive();
    while day <= last {
        buckets.insert(date_key(day), Vec::new());
        day += Duration::days(1);
    }

    for record in records {
        let key = date_key(record.created_at.date_naive());
        match buckets.get_mut(&key) {
            Some(slot) => slot.push(record),
            None => {
                tracing::debug!("📆 Dropping record {} outside range ({key})", record.id);
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use matchcast_core::types::{
        day_end, day_start, Action, Channel, Condition, ImageRef, Network, TargetType,
        TriggerDraft,
    };

    fn range(from: (i32, u32, u32), to: (i32, u32, u32)) -> TimeRange {
        TimeRange {
            start: day_start(NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap()),
            end: day_end(NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap()),
        }
    }

    fn trigger_on(year: i32, month: u32, day: u32) -> Trigger {
        let mut t = TriggerDraft {
            name: "Recap".into(),
            created_by: "u-1".into(),
            condition: Condition::MatchFinished,
            action: Action::MatchSummary,
            target_type: TargetType::Match,
            target_id: "m-1".into(),
            channels: vec![Channel::Facebook],
            networks: vec![Network::SocialMedia],
            image: ImageRef { url: "https://cdn.example.com/r.png".into() },
            human_approval: false,
        }
        .build()
        .unwrap();
        t.created_at = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
        t
    }

    #[test]
    fn test_seven_day_range_yields_seven_keys_even_empty() {
        let buckets = bucket(&range((2024, 3, 11), (2024, 3, 17)), Vec::new());
        assert_eq!(buckets.len(), 7);
        assert!(buckets.values().all(|v| v.is_empty()));
        let keys: Vec<_> = buckets.keys().cloned().collect();
        assert_eq!(keys.first().map(String::as_str), Some("2024-03-11"));
        assert_eq!(keys.last().map(String::as_str), Some("2024-03-17"));
    }

    #[test]
    fn test_records_land_in_their_day() {
        let records = vec![trigger_on(2024, 3, 12), trigger_on(2024, 3, 12), trigger_on(2024, 3, 15)];
        let buckets = bucket(&range((2024, 3, 11), (2024, 3, 17)), records);
        assert_eq!(buckets["2024-03-12"].len(), 2);
        assert_eq!(buckets["2024-03-15"].len(), 1);
        assert!(buckets["2024-03-11"].is_empty());
    }

    #[test]
    fn test_out_of_range_record_is_dropped() {
        let records = vec![trigger_on(2024, 4, 1)];
        let buckets = bucket(&range((2024, 3, 11), (2024, 3, 17)), records);
        assert_eq!(buckets.len(), 7);
        assert!(buckets.values().all(|v| v.is_empty()));
    }

    #[test]
    fn test_single_day_range() {
        let buckets = bucket(&range((2024, 2, 29), (2024, 2, 29)), vec![trigger_on(2024, 2, 29)]);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets["2024-02-29"].len(), 1);
    }
}
