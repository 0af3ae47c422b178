//! Matchcast error taxonomy.
//!
//! Every failure surfaces as a typed variant with a stable machine-readable
//! kind plus a human message. Nothing here is retried automatically; retry
//! policy belongs to callers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchcastError>;

#[derive(Debug, Error)]
pub enum MatchcastError {
    /// Bad or unsupported timeframe keyword, or an unparsable date component.
    #[error("invalid timeframe: {0}")]
    InvalidTimeframe(String),

    /// A create/update payload failed domain validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No trigger matches the lookup. For dispatch this is a loud failure:
    /// absence signals a double-fire or stale condition, not an empty state.
    #[error("trigger not found: {0}")]
    TriggerNotFound(String),

    /// The pending-trigger uniqueness invariant is broken. Distinct from
    /// not-found: the matcher must never silently pick one.
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    /// The content generation service failed or answered non-2xx.
    #[error("content fetch failed: {0}")]
    ContentFetch(String),

    /// A channel adapter failed to publish. Aggregated per dispatch: one
    /// failing channel fails the overall call without undoing the others.
    #[error("channel publish failed on {channel}: {reason}")]
    ChannelPublish { channel: String, reason: String },

    /// Subject lifecycle status the content shaping logic does not recognize.
    #[error("unsupported subject state: {0}")]
    UnsupportedState(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MatchcastError {
    /// Stable machine-readable kind for logs and API consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTimeframe(_) => "invalid_timeframe",
            Self::Validation(_) => "validation",
            Self::TriggerNotFound(_) => "trigger_not_found",
            Self::DataIntegrity(_) => "data_integrity_violation",
            Self::ContentFetch(_) => "content_fetch_failed",
            Self::ChannelPublish { .. } => "channel_publish_failed",
            Self::UnsupportedState(_) => "unsupported_state",
            Self::Store(_) => "store",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable() {
        let err = MatchcastError::DataIntegrity("two pending triggers".into());
        assert_eq!(err.kind(), "data_integrity_violation");
        let err = MatchcastError::ChannelPublish {
            channel: "facebook".into(),
            reason: "401".into(),
        };
        assert_eq!(err.kind(), "channel_publish_failed");
    }

    #[test]
    fn test_not_found_and_integrity_are_distinct() {
        let missing = MatchcastError::TriggerNotFound("x".into());
        let dup = MatchcastError::DataIntegrity("x".into());
        assert_ne!(missing.kind(), dup.kind());
    }
}
