use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

use crate::config::DiscordConfig;
use crate::plugins::traits::{Notifier, Receipt};
use crate::utils::error::NotifyError;

/// Discord rejects message content longer than this.
const MAX_CONTENT_CHARS: usize = 2000;

/// Posts announcements to a channel webhook and operator reports to a
/// second, private webhook.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: Url,
    operator_webhook_url: Option<Url>,
    username: String,
}

impl DiscordNotifier {
    pub fn from_config(config: &DiscordConfig) -> Result<Self, NotifyError> {
        let webhook_url = config
            .webhook_url
            .as_deref()
            .ok_or_else(|| NotifyError::NotConfigured("Discord webhook_url".to_string()))?;
        let webhook_url = parse_webhook(webhook_url)?;
        let operator_webhook_url = config
            .operator_webhook_url
            .as_deref()
            .map(parse_webhook)
            .transpose()?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(DiscordNotifier {
            client,
            webhook_url,
            operator_webhook_url,
            username: config.username.clone(),
        })
    }

    fn create_payload(&self, content: &str) -> serde_json::Value {
        json!({
            "content": truncate(content, MAX_CONTENT_CHARS),
            "username": self.username,
        })
    }

    async fn send(&self, webhook: &Url, content: &str) -> Result<Receipt, NotifyError> {
        let response = self
            .client
            .post(webhook.clone())
            .query(&[("wait", "true")])
            .json(&self.create_payload(content))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // With wait=true Discord answers with the created message.
        let message: serde_json::Value = response.json().await.unwrap_or_default();
        let id = message
            .get("id")
            .and_then(|v| v.as_str())
            .map(|id| id.to_string())
            .unwrap_or_else(|| format!("discord-{}", chrono::Utc::now().timestamp()));

        Ok(Receipt::new(id))
    }
}

fn parse_webhook(raw: &str) -> Result<Url, NotifyError> {
    Url::parse(raw).map_err(|e| NotifyError::NotConfigured(format!("invalid Discord webhook URL: {}", e)))
}

fn truncate(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => content[..idx].to_string(),
        None => content.to_string(),
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn publish(&self, message: &str) -> Result<Receipt, NotifyError> {
        self.send(&self.webhook_url, message).await
    }

    async fn notify_operator(&self, message: &str) -> Result<Receipt, NotifyError> {
        let webhook = self
            .operator_webhook_url
            .as_ref()
            .ok_or_else(|| NotifyError::NotConfigured("Discord operator_webhook_url".to_string()))?;
        self.send(webhook, message).await
    }
}
