//! Best-effort creator notice. Fired out-of-band when a dispatch starts;
//! failures are logged and swallowed, a notice must never abort a dispatch.

use std::time::Duration;

use matchcast_core::config::NotifyConfig;
use matchcast_core::types::Trigger;

#[derive(Clone)]
pub struct CreatorNotifier {
    webhook_url: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl CreatorNotifier {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            webhook_url: config.webhook_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            client: reqwest::Client::new(),
        }
    }

    /// Spawn the notice and return immediately.
    pub fn spawn_notice(&self, trigger: &Trigger, email: Option<&str>) {
        let notifier = self.clone();
        let trigger = trigger.clone();
        let email = email.map(String::from);
        tokio::spawn(async move {
            if let Err(e) = notifier.send(&trigger, email.as_deref()).await {
                tracing::warn!("⚠️ Creator notice for trigger {} failed: {e}", trigger.id);
            }
        });
    }

    async fn send(&self, trigger: &Trigger, email: Option<&str>) -> reqwest::Result<()> {
        let Some(url) = &self.webhook_url else {
            tracing::info!(
                "📣 Creator {} notified: trigger '{}' is dispatching (log only)",
                email.unwrap_or(&trigger.created_by),
                trigger.name
            );
            return Ok(());
        };

        self.client
            .post(url)
            .json(&serde_json::json!({
                "trigger_id": trigger.id,
                "name": trigger.name,
                "creator": trigger.created_by,
                "email": email,
                "message": format!("Trigger '{}' is being dispatched", trigger.name),
            }))
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;
        tracing::info!("📣 Creator notice sent for trigger {}", trigger.id);
        Ok(())
    }
}
