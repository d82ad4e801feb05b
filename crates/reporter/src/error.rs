//! Error types for run reporting

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Invalid webhook URL: {0}")]
    InvalidWebhook(String),

    #[error("Webhook returned status {0}")]
    WebhookStatus(u16),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ReporterResult<T> = Result<T, ReporterError>;
