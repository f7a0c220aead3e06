//! Chat webhook notifications

use crate::config::NotifyConfig;
use crate::net::HttpClient;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Serialize)]
struct WebhookMessage<'a> {
    text: &'a str,
    username: &'a str,
    icon_emoji: &'a str,
}

/// Posts short status messages to an incoming webhook.
///
/// Without a configured URL every post is a no-op. Delivery problems are
/// logged and otherwise ignored.
pub struct Notifier {
    client: Arc<dyn HttpClient>,
    webhook: Option<Url>,
    config: NotifyConfig,
}

impl Notifier {
    pub fn new(client: Arc<dyn HttpClient>, config: NotifyConfig) -> Self {
        let webhook = config
            .webhook_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .and_then(|url| match Url::parse(url) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!("Ignoring invalid webhook URL: {}", e);
                    None
                }
            });

        Self {
            client,
            webhook,
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook.is_some()
    }

    /// Returns true when the webhook accepted the message
    pub async fn post(&self, text: &str) -> bool {
        let Some(webhook) = &self.webhook else {
            tracing::debug!("Notifications disabled, not posting {:?}", text);
            return false;
        };

        let message = WebhookMessage {
            text,
            username: &self.config.username,
            icon_emoji: &self.config.icon_emoji,
        };
        let body = match serde_json::to_value(&message) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to encode notification: {}", e);
                return false;
            }
        };

        match self.client.post_json(webhook, &body).await {
            Ok(response) if response.status / 100 == 2 => true,
            Ok(response) => {
                tracing::warn!(
                    "Webhook returned HTTP {}: {}",
                    response.status,
                    response.text().trim()
                );
                false
            }
            Err(e) => {
                tracing::warn!("Failed to post notification: {}", e);
                false
            }
        }
    }
}
