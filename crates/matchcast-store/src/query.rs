//! Query evaluation: compound filters, free-text search over an explicit
//! field list, name sorting and skip/take windows.

use matchcast_core::types::{SortOrder, Trigger, TriggerQuery};

/// Whether a trigger satisfies every present field of the query (AND
/// semantics; list fields are IN-matches).
pub fn matches(query: &TriggerQuery, trigger: &Trigger) -> bool {
    if let Some(from) = query.created_from
        && trigger.created_at < from
    {
        return false;
    }
    if let Some(to) = query.created_to
        && trigger.created_at > to
    {
        return false;
    }
    if let Some(name) = &query.name
        && trigger.name != *name
    {
        return false;
    }
    if let Some(needle) = &query.name_contains
        && !trigger.name.to_lowercase().contains(&needle.to_lowercase())
    {
        return false;
    }
    if let Some(conditions) = &query.conditions
        && !conditions.contains(&trigger.condition)
    {
        return false;
    }
    if let Some(statuses) = &query.statuses
        && !statuses.contains(&trigger.status)
    {
        return false;
    }
    if let Some(target_types) = &query.target_types
        && !target_types.contains(&trigger.target_type)
    {
        return false;
    }
    if let Some(target_ids) = &query.target_ids
        && !target_ids.contains(&trigger.target_id)
    {
        return false;
    }
    true
}

/// The enumerated searchable fields of a trigger. Free-text search scans
/// exactly these, nothing reflective.
fn searchable_fields(trigger: &Trigger) -> Vec<String> {
    let mut fields = vec![
        trigger.name.clone(),
        trigger.action.as_str().to_string(),
        trigger.condition.as_str().to_string(),
        trigger.status.as_str().to_string(),
        trigger.target_type.as_str().to_string(),
        trigger.target_id.clone(),
    ];
    fields.extend(trigger.channels.iter().map(|c| c.as_str().to_string()));
    fields.extend(trigger.networks.iter().map(|n| n.as_str().to_string()));
    if let Some(content) = &trigger.content {
        fields.push(content.clone());
    }
    fields
}

/// Case-insensitive substring match, OR'd across the searchable fields.
pub fn matches_search(trigger: &Trigger, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    searchable_fields(trigger)
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Sort in place by the fixed `name` key.
pub fn sort_by_name(triggers: &mut [Trigger], order: SortOrder) {
    triggers.sort_by(|a, b| a.name.cmp(&b.name));
    if order == SortOrder::Desc {
        triggers.reverse();
    }
}

/// Apply a `skip`/`take` window.
pub fn window(triggers: Vec<Trigger>, skip: u64, limit: u64) -> Vec<Trigger> {
    triggers
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchcast_core::types::{
        Action, Channel, Condition, ImageRef, Network, TargetType, TriggerDraft, TriggerStatus,
    };

    fn trigger(name: &str) -> Trigger {
        TriggerDraft {
            name: name.into(),
            created_by: "seed".into(),
            condition: Condition::TossDone,
            action: Action::TossResult,
            target_type: TargetType::Match,
            target_id: "m-1".into(),
            channels: vec![Channel::Facebook],
            networks: vec![Network::SocialMedia],
            image: ImageRef { url: "https://cdn.example.com/toss.png".into() },
            human_approval: false,
        }
        .build()
        .unwrap()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let q = TriggerQuery::default();
        assert!(matches(&q, &trigger("Toss post")));
    }

    #[test]
    fn test_and_semantics() {
        let t = trigger("Toss post");
        let q = TriggerQuery {
            statuses: Some(vec![TriggerStatus::Pending]),
            target_types: Some(vec![TargetType::Match]),
            ..Default::default()
        };
        assert!(matches(&q, &t));

        let q = TriggerQuery {
            statuses: Some(vec![TriggerStatus::Pending]),
            target_types: Some(vec![TargetType::League]),
            ..Default::default()
        };
        assert!(!matches(&q, &t), "one failing field must reject");
    }

    #[test]
    fn test_created_range_is_inclusive() {
        let t = trigger("Toss post");
        let q = TriggerQuery {
            created_from: Some(t.created_at),
            created_to: Some(t.created_at),
            ..Default::default()
        };
        assert!(matches(&q, &t));
    }

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let t = trigger("Grand Final Recap");
        let q = TriggerQuery { name_contains: Some("final".into()), ..Default::default() };
        assert!(matches(&q, &t));
    }

    #[test]
    fn test_search_hits_enumerated_fields_only() {
        let t = trigger("Toss post");
        assert!(matches_search(&t, "TOSS"));
        assert!(matches_search(&t, "facebook"));
        assert!(matches_search(&t, "social"));
        assert!(matches_search(&t, "m-1"));
        assert!(!matches_search(&t, "instagram"));
        // id is not a searchable field
        assert!(!matches_search(&t, &t.id));
    }

    #[test]
    fn test_sort_and_window() {
        let mut set = vec![trigger("bravo"), trigger("alpha"), trigger("charlie")];
        sort_by_name(&mut set, SortOrder::Asc);
        let names: Vec<_> = set.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["alpha", "bravo", "charlie"]);

        sort_by_name(&mut set, SortOrder::Desc);
        assert_eq!(set[0].name, "charlie");

        let page = window(set, 1, 1);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "bravo");
    }
}
