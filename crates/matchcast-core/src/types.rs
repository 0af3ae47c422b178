//! Domain types: triggers, conditions, actions, channels and the
//! query/patch shapes the store contract is written against.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MatchcastError, Result};

/// Real-world event that makes a trigger eligible to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    MatchFinished,
    TossDone,
    MatchScheduled,
    MatchInProgress,
    LeagueCreated,
    LeagueFinished,
    LeagueScheduled,
}

impl Condition {
    pub const ALL: [Condition; 7] = [
        Condition::MatchFinished,
        Condition::TossDone,
        Condition::MatchScheduled,
        Condition::MatchInProgress,
        Condition::LeagueCreated,
        Condition::LeagueFinished,
        Condition::LeagueScheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::MatchFinished => "match_finished",
            Condition::TossDone => "toss_done",
            Condition::MatchScheduled => "match_scheduled",
            Condition::MatchInProgress => "match_in_progress",
            Condition::LeagueCreated => "league_created",
            Condition::LeagueFinished => "league_finished",
            Condition::LeagueScheduled => "league_scheduled",
        }
    }

    /// Fixed `condition → allowed actions` mapping. An action outside its
    /// condition's set is invalid.
    pub fn allowed_actions(&self) -> &'static [Action] {
        match self {
            Condition::MatchFinished => &[Action::MatchSummary, Action::MatchResult],
            Condition::TossDone => &[Action::TossResult],
            Condition::MatchScheduled => &[Action::MatchScheduled],
            Condition::MatchInProgress => &[Action::MatchUpdate],
            Condition::LeagueCreated => &[Action::AnnounceLeague],
            Condition::LeagueScheduled => &[Action::ScheduleLeagueEvents],
            Condition::LeagueFinished => &[Action::LeagueSummary],
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publishable action template associated with a fired condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MatchSummary,
    MatchResult,
    TossResult,
    MatchScheduled,
    MatchUpdate,
    AnnounceLeague,
    ScheduleLeagueEvents,
    LeagueSummary,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MatchSummary => "match_summary",
            Action::MatchResult => "match_result",
            Action::TossResult => "toss_result",
            Action::MatchScheduled => "match_scheduled",
            Action::MatchUpdate => "match_update",
            Action::AnnounceLeague => "announce_league",
            Action::ScheduleLeagueEvents => "schedule_league_events",
            Action::LeagueSummary => "league_summary",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity kind a trigger concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Match,
    Account,
    League,
}

impl TargetType {
    pub const ALL: [TargetType; 3] = [TargetType::Match, TargetType::Account, TargetType::League];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Match => "match",
            TargetType::Account => "account",
            TargetType::League => "league",
        }
    }
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External publishing destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Facebook,
    Instagram,
    Twitter,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Facebook, Channel::Instagram, Channel::Twitter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Facebook => "facebook",
            Channel::Instagram => "instagram",
            Channel::Twitter => "twitter",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery network a trigger belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    SocialMedia,
    Email,
    Sms,
    Push,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::SocialMedia => "social_media",
            Network::Email => "email",
            Network::Sms => "sms",
            Network::Push => "push",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trigger lifecycle status. The transition is monotonic: pending → sent,
/// never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerStatus {
    Pending,
    Sent,
}

impl TriggerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerStatus::Pending => "pending",
            TriggerStatus::Sent => "sent",
        }
    }
}

impl std::fmt::Display for TriggerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the media asset attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

/// Persisted unit of work: "when X happens, publish Y to these channels".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub updated_by: String,
    pub condition: Condition,
    pub action: Action,
    pub target_type: TargetType,
    pub target_id: String,
    pub channels: Vec<Channel>,
    pub networks: Vec<Network>,
    /// Generated post copy, populated by the content fetcher at dispatch.
    #[serde(default)]
    pub content: Option<String>,
    pub image: ImageRef,
    pub status: TriggerStatus,
    /// Dispatch lease. Set while a coordinator owns this trigger so a
    /// competing dispatch for the same tuple cannot double-process it.
    #[serde(default)]
    pub claimed: bool,
    pub human_approval: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create-side shape. `build` validates and stamps identity, status and
/// timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerDraft {
    pub name: String,
    pub created_by: String,
    pub condition: Condition,
    pub action: Action,
    pub target_type: TargetType,
    pub target_id: String,
    pub channels: Vec<Channel>,
    pub networks: Vec<Network>,
    pub image: ImageRef,
    #[serde(default)]
    pub human_approval: bool,
}

impl TriggerDraft {
    pub fn build(self) -> Result<Trigger> {
        let now = Utc::now();
        let trigger = Trigger {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.name,
            updated_by: self.created_by.clone(),
            created_by: self.created_by,
            condition: self.condition,
            action: self.action,
            target_type: self.target_type,
            target_id: self.target_id,
            channels: self.channels,
            networks: self.networks,
            content: None,
            image: self.image,
            status: TriggerStatus::Pending,
            claimed: false,
            human_approval: self.human_approval,
            created_at: now,
            updated_at: now,
        };
        trigger.validate()?;
        Ok(trigger)
    }
}

impl Trigger {
    /// Domain validation shared by create and update paths.
    pub fn validate(&self) -> Result<()> {
        if !self.name.chars().next().is_some_and(|c| c.is_alphabetic()) {
            return Err(MatchcastError::Validation(
                "name must start with an alphabetic character".into(),
            ));
        }
        if !self.condition.allowed_actions().contains(&self.action) {
            return Err(MatchcastError::Validation(format!(
                "action '{}' is not allowed for condition '{}'",
                self.action, self.condition
            )));
        }
        if self.channels.is_empty() {
            return Err(MatchcastError::Validation("channels must not be empty".into()));
        }
        if self.networks.is_empty() {
            return Err(MatchcastError::Validation("networks must not be empty".into()));
        }
        if self.target_id.is_empty() {
            return Err(MatchcastError::Validation("target id must not be empty".into()));
        }
        if self.image.url.is_empty() {
            return Err(MatchcastError::Validation("image url must not be empty".into()));
        }
        Ok(())
    }
}

/// Arbitrary field patch applied by the update operation and by dispatch.
/// Absent fields are left untouched; `updated_at` always refreshes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerPatch {
    pub name: Option<String>,
    pub updated_by: Option<String>,
    pub condition: Option<Condition>,
    pub action: Option<Action>,
    pub target_type: Option<TargetType>,
    pub target_id: Option<String>,
    pub channels: Option<Vec<Channel>>,
    pub networks: Option<Vec<Network>>,
    pub content: Option<String>,
    pub image: Option<ImageRef>,
    pub status: Option<TriggerStatus>,
    pub human_approval: Option<bool>,
}

impl TriggerPatch {
    pub fn apply(&self, trigger: &mut Trigger) {
        if let Some(v) = &self.name {
            trigger.name = v.clone();
        }
        if let Some(v) = &self.updated_by {
            trigger.updated_by = v.clone();
        }
        if let Some(v) = self.condition {
            trigger.condition = v;
        }
        if let Some(v) = self.action {
            trigger.action = v;
        }
        if let Some(v) = self.target_type {
            trigger.target_type = v;
        }
        if let Some(v) = &self.target_id {
            trigger.target_id = v.clone();
        }
        if let Some(v) = &self.channels {
            trigger.channels = v.clone();
        }
        if let Some(v) = &self.networks {
            trigger.networks = v.clone();
        }
        if let Some(v) = &self.content {
            trigger.content = Some(v.clone());
        }
        if let Some(v) = &self.image {
            trigger.image = v.clone();
        }
        if let Some(v) = self.status {
            trigger.status = v;
        }
        if let Some(v) = self.human_approval {
            trigger.human_approval = v;
        }
        trigger.updated_at = Utc::now();
    }
}

/// Compound store filter. Every present field is ANDed; list fields are
/// IN-matches.
#[derive(Debug, Clone, Default)]
pub struct TriggerQuery {
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub name: Option<String>,
    /// Case-insensitive substring on name (the calendar name filter).
    pub name_contains: Option<String>,
    pub conditions: Option<Vec<Condition>>,
    pub statuses: Option<Vec<TriggerStatus>>,
    pub target_types: Option<Vec<TargetType>>,
    pub target_ids: Option<Vec<String>>,
}

/// Sort direction for the fixed `name` sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

/// Pagination metadata attached to every listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationMeta {
    pub fn new(total_count: u64, current_page: u64, per_page: u64) -> Self {
        let total_pages = if per_page == 0 { 0 } else { total_count.div_ceil(per_page) };
        Self {
            total_count,
            total_pages,
            current_page,
            per_page,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}

/// Resolved absolute window. Both bounds inclusive, `end` pinned to the last
/// millisecond of its calendar unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// First instant of the given calendar day.
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last millisecond of the given calendar day (23:59:59.999).
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    (date.and_time(NaiveTime::MIN) + Duration::milliseconds(86_399_999)).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> TriggerDraft {
        TriggerDraft {
            name: "Final whistle summary".into(),
            created_by: "user-1".into(),
            condition: Condition::MatchFinished,
            action: Action::MatchSummary,
            target_type: TargetType::Match,
            target_id: "match-42".into(),
            channels: vec![Channel::Facebook, Channel::Instagram],
            networks: vec![Network::SocialMedia],
            image: ImageRef { url: "https://cdn.example.com/42.png".into() },
            human_approval: false,
        }
    }

    #[test]
    fn test_build_valid_draft() {
        let trigger = draft().build().unwrap();
        assert_eq!(trigger.status, TriggerStatus::Pending);
        assert!(trigger.content.is_none());
        assert!(!trigger.claimed);
        assert_eq!(trigger.created_at, trigger.updated_at);
    }

    #[test]
    fn test_action_must_match_condition() {
        let mut d = draft();
        d.action = Action::TossResult;
        let err = d.build().unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_name_must_start_with_letter() {
        let mut d = draft();
        d.name = "42 summary".into();
        assert!(d.build().is_err());
    }

    #[test]
    fn test_channels_must_not_be_empty() {
        let mut d = draft();
        d.channels.clear();
        assert!(d.build().is_err());
    }

    #[test]
    fn test_every_condition_has_actions() {
        for condition in Condition::ALL {
            assert!(!condition.allowed_actions().is_empty(), "{condition}");
        }
    }

    #[test]
    fn test_patch_refreshes_updated_at() {
        let mut trigger = draft().build().unwrap();
        let before = trigger.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        let patch = TriggerPatch { content: Some("copy".into()), ..Default::default() };
        patch.apply(&mut trigger);
        assert_eq!(trigger.content.as_deref(), Some("copy"));
        assert!(trigger.updated_at > before);
    }

    #[test]
    fn test_pagination_meta_arithmetic() {
        let meta = PaginationMeta::new(25, 2, 10);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);
        assert!(meta.has_prev_page);

        let empty = PaginationMeta::new(0, 1, 10);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);
        assert!(!empty.has_prev_page);
    }

    #[test]
    fn test_day_bounds() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(day_start(date).to_rfc3339(), "2024-03-15T00:00:00+00:00");
        assert_eq!(
            day_end(date).timestamp_millis() - day_start(date).timestamp_millis(),
            86_399_999
        );
    }

    #[test]
    fn test_enum_wire_names() {
        let json = serde_json::to_string(&Condition::MatchFinished).unwrap();
        assert_eq!(json, "\"match_finished\"");
        let json = serde_json::to_string(&Network::SocialMedia).unwrap();
        assert_eq!(json, "\"social_media\"");
    }
}
