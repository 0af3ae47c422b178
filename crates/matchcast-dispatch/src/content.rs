//! Content generation client. Shapes the request by the subject's lifecycle
//! status and calls the external generation service for post copy.

use std::time::Duration;

use async_trait::async_trait;
use matchcast_core::config::ContentServiceConfig;
use matchcast_core::error::{MatchcastError, Result};
use matchcast_core::types::{Action, TargetType};
use serde::{Deserialize, Serialize};

/// Inbound "condition fired" event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiredEvent {
    pub action: Action,
    pub target_id: String,
    pub target_type: TargetType,
    /// The match/league object as delivered by the upstream feed; must carry
    /// a numeric lifecycle status at `status.id`.
    pub subject: serde_json::Value,
    #[serde(default)]
    pub achievement: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Where the creator notice goes, when the event carries one.
    #[serde(default)]
    pub creator_email: Option<String>,
}

/// Subject lifecycle status, keyed by the upstream feed's numeric ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectStatus {
    Scheduled,
    InProgress,
    Finished,
    AboutToStart,
}

impl SubjectStatus {
    /// Map the upstream status id; anything unrecognized is fatal, never
    /// silently defaulted.
    pub fn from_id(id: i64) -> Result<Self> {
        match id {
            1 => Ok(SubjectStatus::Scheduled),
            2 => Ok(SubjectStatus::InProgress),
            3 => Ok(SubjectStatus::Finished),
            4 => Ok(SubjectStatus::AboutToStart),
            other => Err(MatchcastError::UnsupportedState(format!(
                "unknown subject status id {other}"
            ))),
        }
    }
}

impl FiredEvent {
    pub fn subject_status(&self) -> Result<SubjectStatus> {
        let id = self.subject["status"]["id"].as_i64().ok_or_else(|| {
            MatchcastError::UnsupportedState("subject carries no status id".into())
        })?;
        SubjectStatus::from_id(id)
    }
}

/// Build the generation request body. A finished subject includes the
/// achievement/category metadata; in-flight subjects send only the subject.
pub fn shape_request_body(event: &FiredEvent) -> Result<serde_json::Value> {
    match event.subject_status()? {
        SubjectStatus::Finished => {
            let mut body = serde_json::json!({ "matchobj": event.subject });
            if let Some(category) = &event.category {
                body["category"] = serde_json::Value::String(category.clone());
            }
            if let Some(achievement) = &event.achievement {
                body["achievement"] = serde_json::Value::String(achievement.clone());
            }
            Ok(body)
        }
        SubjectStatus::Scheduled | SubjectStatus::InProgress | SubjectStatus::AboutToStart => {
            Ok(serde_json::json!({ "matchobj": event.subject }))
        }
    }
}

/// Source of generated post copy. The HTTP client implements it; tests
/// substitute canned responses.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, event: &FiredEvent) -> Result<String>;
}

/// HTTP client for the generation service: JSON POST with bearer auth,
/// response body carries `generated_content`.
pub struct HttpContentFetcher {
    config: ContentServiceConfig,
    client: reqwest::Client,
}

impl HttpContentFetcher {
    pub fn new(config: ContentServiceConfig) -> Self {
        Self { config, client: reqwest::Client::new() }
    }
}

#[async_trait]
impl ContentSource for HttpContentFetcher {
    async fn fetch(&self, event: &FiredEvent) -> Result<String> {
        let body = shape_request_body(event)?;

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.token))
            .json(&body)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
            .map_err(|e| MatchcastError::ContentFetch(format!("generation request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(MatchcastError::ContentFetch(format!(
                "generation service error {status}: {error_text}"
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MatchcastError::ContentFetch(format!("invalid generation response: {e}")))?;

        payload["generated_content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                MatchcastError::ContentFetch("response missing generated_content".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(status_id: i64) -> FiredEvent {
        FiredEvent {
            action: Action::MatchSummary,
            target_id: "m-9".into(),
            target_type: TargetType::Match,
            subject: serde_json::json!({
                "id": "m-9",
                "teams": ["Strikers", "Chargers"],
                "status": { "id": status_id }
            }),
            achievement: Some("highest chase".into()),
            category: Some("t20".into()),
            creator_email: None,
        }
    }

    #[test]
    fn test_finished_subject_includes_metadata() {
        let body = shape_request_body(&event(3)).unwrap();
        assert_eq!(body["matchobj"]["id"], "m-9");
        assert_eq!(body["category"], "t20");
        assert_eq!(body["achievement"], "highest chase");
    }

    #[test]
    fn test_finished_subject_metadata_is_optional() {
        let mut e = event(3);
        e.achievement = None;
        e.category = None;
        let body = shape_request_body(&e).unwrap();
        assert!(body.get("category").is_none());
        assert!(body.get("achievement").is_none());
    }

    #[test]
    fn test_in_flight_subjects_send_subject_only() {
        for id in [1, 2, 4] {
            let body = shape_request_body(&event(id)).unwrap();
            assert!(body.get("matchobj").is_some(), "status {id}");
            assert!(body.get("category").is_none(), "status {id}");
            assert!(body.get("achievement").is_none(), "status {id}");
        }
    }

    #[test]
    fn test_unknown_status_is_fatal() {
        let err = shape_request_body(&event(7)).unwrap_err();
        assert_eq!(err.kind(), "unsupported_state");
    }

    #[test]
    fn test_missing_status_is_fatal() {
        let mut e = event(1);
        e.subject = serde_json::json!({ "id": "m-9" });
        let err = shape_request_body(&e).unwrap_err();
        assert_eq!(err.kind(), "unsupported_state");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_content_fetch_failure() {
        let fetcher = HttpContentFetcher::new(ContentServiceConfig {
            endpoint: "http://127.0.0.1:1/generate".into(),
            token: "secret".into(),
            timeout_secs: 1,
        });
        let err = fetcher.fetch(&event(3)).await.unwrap_err();
        assert_eq!(err.kind(), "content_fetch_failed");
    }
}
