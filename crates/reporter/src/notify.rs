//! Webhook delivery client
//!
//! Wraps a [`reqwest::Client`] pointed at a single webhook endpoint. The
//! endpoint is validated once at construction; a missing or invalid URL
//! leaves the notifier unconfigured so the surrounding run is never
//! affected by a bad notification setup.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use crate::config::validate_webhook_url;
use crate::error::{ReporterError, ReporterResult};
use crate::message::NotificationPayload;

const USER_AGENT: &str = concat!("chime-reporter/", env!("CARGO_PKG_VERSION"));

/// HTTP client for posting run notifications.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: Option<Url>,
}

impl WebhookNotifier {
    /// Build a notifier for the given webhook URL.
    ///
    /// A `None` or invalid URL produces an unconfigured notifier whose
    /// [`send`](Self::send) is a no-op.
    pub fn new(webhook_url: Option<&str>, request_timeout: Duration) -> ReporterResult<Self> {
        let endpoint = match webhook_url {
            Some(raw) => match validate_webhook_url(raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!("Webhook disabled: {}", e);
                    None
                }
            },
            None => {
                warn!("No webhook URL configured, notifications will not be sent");
                None
            }
        };

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, endpoint })
    }

    /// Whether a valid webhook endpoint is set.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// POST the payload to the webhook endpoint.
    ///
    /// Returns `Ok(())` without sending when unconfigured. A non-2xx
    /// response maps to [`ReporterError::WebhookStatus`].
    pub async fn send(&self, payload: &NotificationPayload) -> ReporterResult<()> {
        let Some(endpoint) = &self.endpoint else {
            debug!("Skipping notification, no webhook endpoint");
            return Ok(());
        };

        let body = serde_json::to_string(payload)?;
        let response = self
            .client
            .post(endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ReporterError::WebhookStatus(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifier_with_valid_url() {
        let notifier =
            WebhookNotifier::new(Some("https://hooks.example.com/T00/B00"), Duration::from_secs(5))
                .unwrap();
        assert!(notifier.is_configured());
    }

    #[test]
    fn test_notifier_without_url() {
        let notifier = WebhookNotifier::new(None, Duration::from_secs(5)).unwrap();
        assert!(!notifier.is_configured());
    }

    #[test]
    fn test_notifier_with_invalid_url_degrades() {
        let notifier = WebhookNotifier::new(Some("not a url"), Duration::from_secs(5)).unwrap();
        assert!(!notifier.is_configured());

        let notifier = WebhookNotifier::new(Some("ftp://example.com/hook"), Duration::from_secs(5))
            .unwrap();
        assert!(!notifier.is_configured());
    }
}
