//! Matchcast configuration system.
//!
//! Credentials (Graph API tokens, content-service bearer token) are supplied
//! here or via environment, resolved at call time and never compiled into
//! the artifact.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MatchcastError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchcastConfig {
    #[serde(default)]
    pub content: ContentServiceConfig,
    #[serde(default)]
    pub facebook: FacebookConfig,
    #[serde(default)]
    pub instagram: InstagramConfig,
    #[serde(default)]
    pub twitter: TwitterConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl MatchcastConfig {
    /// Load config from the default path (~/.matchcast/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MatchcastError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| MatchcastError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| MatchcastError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".matchcast")
            .join("config.toml")
    }
}

/// Content generation service (post copy) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentServiceConfig {
    #[serde(default)]
    pub endpoint: String,
    /// Bearer token sent with every generation request.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ContentServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            token: String::new(),
            timeout_secs: default_request_timeout(),
        }
    }
}

/// Facebook Graph API page posting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookConfig {
    #[serde(default)]
    pub access_token: String,
    #[serde(default = "default_graph_url")]
    pub graph_url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            graph_url: default_graph_url(),
            enabled: true,
        }
    }
}

/// Instagram business-account posting configuration. Publishing goes through
/// the linked Facebook page, so this also needs the page id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramConfig {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub page_id: String,
    #[serde(default = "default_graph_url")]
    pub graph_url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            page_id: String::new(),
            graph_url: default_graph_url(),
            enabled: true,
        }
    }
}

/// Twitter posting is a declared-but-stubbed channel slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    #[serde(default)]
    pub enabled: bool,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

/// Best-effort creator notice configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Optional webhook; when unset the notice is log-only.
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_notify_timeout")]
    pub timeout_secs: u64,
}

fn default_notify_timeout() -> u64 {
    10
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_notify_timeout(),
        }
    }
}

/// Dispatch pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Per-adapter publish timeout so one slow channel cannot stall the
    /// fan-in or the final persist step.
    #[serde(default = "default_channel_timeout")]
    pub channel_timeout_secs: u64,
}

fn default_channel_timeout() -> u64 {
    15
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            channel_timeout_secs: default_channel_timeout(),
        }
    }
}

fn default_graph_url() -> String {
    "https://graph.facebook.com/v20.0".into()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchcastConfig::default();
        assert_eq!(config.dispatch.channel_timeout_secs, 15);
        assert_eq!(config.facebook.graph_url, "https://graph.facebook.com/v20.0");
        assert!(config.notify.webhook_url.is_none());
        assert!(!config.twitter.enabled);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            [content]
            endpoint = "https://copy.example.com/generate"
            token = "secret"

            [facebook]
            access_token = "fb-token"
        "#;
        let config: MatchcastConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.content.endpoint, "https://copy.example.com/generate");
        assert_eq!(config.content.timeout_secs, 30);
        assert_eq!(config.facebook.access_token, "fb-token");
        assert!(config.facebook.enabled);
    }
}
