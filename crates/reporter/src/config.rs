//! Reporter configuration: webhook endpoint, CI context, message options
//!
//! Everything the reporter consults is carried in [`ReporterConfig`] and
//! passed in explicitly. The `from_env` constructors exist for CI use
//! and read:
//!
//! - `CHIME_WEBHOOK_URL` - webhook endpoint
//! - `CHIME_FORMAT` - `text` or `blocks`
//! - `CHIME_LOCALE` - `en` or `es`
//! - `GITHUB_REPOSITORY`, `GITHUB_SERVER_URL`, `GITHUB_RUN_ID` - CI context

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use url::Url;

use crate::error::{ReporterError, ReporterResult};

/// Wire shape of the notification message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageFormat {
    /// Plain `{ "text": … }` message.
    #[default]
    Text,
    /// Structured header/section/actions blocks.
    Blocks,
}

impl MessageFormat {
    /// Parse a config value; unknown values fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "blocks" => MessageFormat::Blocks,
            _ => MessageFormat::Text,
        }
    }
}

/// Language of the rendered message labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Parse a config value; unknown values fall back to `En`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "es" => Locale::Es,
            _ => Locale::En,
        }
    }
}

/// Identifiers describing the CI run, used to build deep links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiContext {
    /// Repository in `owner/repo` form.
    pub repository: String,

    /// CI server base URL.
    pub server_url: String,

    /// Run identifier, when known.
    pub run_id: Option<String>,
}

impl CiContext {
    /// Read the standard GitHub Actions variables.
    ///
    /// Returns `None` outside CI (no `GITHUB_REPOSITORY`), which disables
    /// link generation only - the summary itself is unaffected.
    pub fn from_env() -> Option<Self> {
        let repository = std::env::var("GITHUB_REPOSITORY")
            .ok()
            .filter(|v| !v.is_empty())?;
        let server_url = std::env::var("GITHUB_SERVER_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "https://github.com".to_string());
        let run_id = std::env::var("GITHUB_RUN_ID").ok().filter(|v| !v.is_empty());

        Some(Self {
            repository,
            server_url,
            run_id,
        })
    }

    /// Repository split into `(owner, repo)`; `None` unless both are non-empty.
    fn owner_repo(&self) -> Option<(&str, &str)> {
        let (owner, repo) = self.repository.split_once('/')?;
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some((owner, repo))
    }

    /// Published HTML report location, `https://<owner>.github.io/<repo>/`.
    ///
    /// `None` when the repository identifier is not `owner/repo` shaped.
    pub fn report_url(&self) -> Option<String> {
        let (owner, repo) = self.owner_repo()?;
        Some(format!("https://{}.github.io/{}/", owner, repo))
    }

    /// Run log location on the CI server.
    ///
    /// Needs a well-formed repository and a run id; `None` otherwise.
    pub fn run_url(&self) -> Option<String> {
        let (owner, repo) = self.owner_repo()?;
        let run_id = self.run_id.as_deref()?;
        Some(format!(
            "{}/{}/{}/actions/runs/{}",
            self.server_url.trim_end_matches('/'),
            owner,
            repo,
            run_id
        ))
    }
}

/// Deep links derived from the CI context at notification time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLinks {
    pub report: Option<String>,
    pub logs: Option<String>,
}

impl RunLinks {
    pub fn from_ci(ci: Option<&CiContext>) -> Self {
        match ci {
            Some(ci) => Self {
                report: ci.report_url(),
                logs: ci.run_url(),
            },
            None => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.report.is_none() && self.logs.is_none()
    }
}

/// Check a configured webhook URL: must be non-empty and parse as http(s).
pub fn validate_webhook_url(raw: &str) -> ReporterResult<Url> {
    if raw.trim().is_empty() {
        return Err(ReporterError::InvalidWebhook("empty URL".to_string()));
    }
    let url =
        Url::parse(raw).map_err(|e| ReporterError::InvalidWebhook(format!("{}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ReporterError::InvalidWebhook(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

/// Configuration for [`RunReporter`](crate::RunReporter).
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Webhook endpoint. `None` or an invalid value turns notification into
    /// a no-op instead of an error.
    pub webhook_url: Option<String>,

    /// Timeout applied to the HTTP client when it is built.
    pub request_timeout: Duration,

    /// Wire shape of the message.
    pub format: MessageFormat,

    /// Language of the message labels.
    pub locale: Locale,

    /// Fixed UTC offset used to render the summary timestamp.
    pub timestamp_offset: FixedOffset,

    /// CI identifiers for deep links; `None` outside CI.
    pub ci: Option<CiContext>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            request_timeout: Duration::from_secs(10),
            format: MessageFormat::default(),
            locale: Locale::default(),
            timestamp_offset: Utc.fix(),
            ci: None,
        }
    }
}

impl ReporterConfig {
    /// Build from the process environment (see module docs for variables).
    pub fn from_env() -> Self {
        let webhook_url = std::env::var("CHIME_WEBHOOK_URL")
            .ok()
            .filter(|v| !v.is_empty());
        let format = std::env::var("CHIME_FORMAT")
            .map(|v| MessageFormat::parse(&v))
            .unwrap_or_default();
        let locale = std::env::var("CHIME_LOCALE")
            .map(|v| Locale::parse(&v))
            .unwrap_or_default();

        Self {
            webhook_url,
            format,
            locale,
            ci: CiContext::from_env(),
            ..Self::default()
        }
    }

    /// Configuration with just a webhook endpoint and defaults elsewhere.
    pub fn with_webhook(url: impl Into<String>) -> Self {
        Self {
            webhook_url: Some(url.into()),
            ..Self::default()
        }
    }
}
