//! Notification message rendering
//!
//! Two wire shapes are supported: a plain `{ "text": … }` message and a
//! structured block list (`header`/`section`/`actions`) for chat services
//! that render block kits. Labels come from a per-locale table so the same
//! summary can be posted in English or Spanish.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::collector::RunSummary;
use crate::config::{Locale, MessageFormat, RunLinks};

/// Timestamp shape used in the summary, e.g. `2026-08-25 14:03:12 +00:00`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// User-visible strings for one locale.
struct Labels {
    run_passed: &'static str,
    run_failed: &'static str,
    summary_heading: &'static str,
    date: &'static str,
    total: &'static str,
    passed: &'static str,
    failed: &'static str,
    report_line: &'static str,
    logs_line: &'static str,
    report_button: &'static str,
    logs_button: &'static str,
}

const EN: Labels = Labels {
    run_passed: "Test run passed",
    run_failed: "Test run failed",
    summary_heading: "Test Summary",
    date: "Date",
    total: "Total",
    passed: "Passed",
    failed: "Failed",
    report_line: "Report",
    logs_line: "Logs",
    report_button: "View report",
    logs_button: "View logs",
};

const ES: Labels = Labels {
    run_passed: "Pruebas exitosas",
    run_failed: "Pruebas con fallas",
    summary_heading: "Resumen de Pruebas",
    date: "Fecha",
    total: "Total",
    passed: "Aprobadas",
    failed: "Fallidas",
    report_line: "Reporte",
    logs_line: "Logs",
    report_button: "Ver reporte",
    logs_button: "Ver logs",
};

impl Locale {
    fn labels(self) -> &'static Labels {
        match self {
            Locale::En => &EN,
            Locale::Es => &ES,
        }
    }
}

/// Serialized body of the webhook POST.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum NotificationPayload {
    /// Plain message: `{ "text": … }`.
    Text { text: String },
    /// Structured message: `{ "blocks": [ … ] }`.
    Blocks { blocks: Vec<Block> },
}

/// One element of a structured message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: TextObject },
    Section { text: TextObject },
    Actions { elements: Vec<BlockElement> },
}

/// Text content inside a block.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String, emoji: bool },
    Mrkdwn { text: String },
}

/// Interactive element inside an actions block.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockElement {
    Button { text: TextObject, url: String },
}

/// Render the notification for the configured format and locale.
pub fn render(
    format: MessageFormat,
    locale: Locale,
    summary: &RunSummary,
    timestamp: DateTime<FixedOffset>,
    links: &RunLinks,
) -> NotificationPayload {
    match format {
        MessageFormat::Text => render_text(locale, summary, timestamp, links),
        MessageFormat::Blocks => render_blocks(locale, summary, timestamp, links),
    }
}

fn headline(labels: &Labels, summary: &RunSummary) -> String {
    if summary.all_passed() {
        format!("✅ {}", labels.run_passed)
    } else {
        format!("❌ {}", labels.run_failed)
    }
}

fn summary_body(labels: &Labels, summary: &RunSummary, timestamp: DateTime<FixedOffset>) -> String {
    format!(
        "*{}*\n{}: {}\n{}: {}\n✅ {}: {}\n❌ {}: {}",
        labels.summary_heading,
        labels.date,
        timestamp.format(TIMESTAMP_FORMAT),
        labels.total,
        summary.total,
        labels.passed,
        summary.passed,
        labels.failed,
        summary.failed,
    )
}

fn render_text(
    locale: Locale,
    summary: &RunSummary,
    timestamp: DateTime<FixedOffset>,
    links: &RunLinks,
) -> NotificationPayload {
    let labels = locale.labels();

    let mut text = format!(
        "{}\n{}",
        headline(labels, summary),
        summary_body(labels, summary, timestamp)
    );
    if let Some(url) = &links.report {
        text.push_str(&format!("\n{}: {}", labels.report_line, url));
    }
    if let Some(url) = &links.logs {
        text.push_str(&format!("\n{}: {}", labels.logs_line, url));
    }

    NotificationPayload::Text { text }
}

fn render_blocks(
    locale: Locale,
    summary: &RunSummary,
    timestamp: DateTime<FixedOffset>,
    links: &RunLinks,
) -> NotificationPayload {
    let labels = locale.labels();

    let mut blocks = vec![
        Block::Header {
            text: TextObject::PlainText {
                text: headline(labels, summary),
                emoji: true,
            },
        },
        Block::Section {
            text: TextObject::Mrkdwn {
                text: summary_body(labels, summary, timestamp),
            },
        },
    ];

    let mut elements = Vec::new();
    if let Some(url) = &links.report {
        elements.push(BlockElement::Button {
            text: TextObject::PlainText {
                text: labels.report_button.to_string(),
                emoji: true,
            },
            url: url.clone(),
        });
    }
    if let Some(url) = &links.logs {
        elements.push(BlockElement::Button {
            text: TextObject::PlainText {
                text: labels.logs_button.to_string(),
                emoji: true,
            },
            url: url.clone(),
        });
    }
    if !elements.is_empty() {
        blocks.push(Block::Actions { elements });
    }

    NotificationPayload::Blocks { blocks }
}
