//! Chime Reporter
//!
//! This crate provides the reporting core for browser E2E test runs:
//! - Collects per-test outcomes from concurrent test workers
//! - Tallies them into a pass/fail run summary
//! - Derives report and log links from the CI environment
//! - Posts one webhook notification when the run ends
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      RunReporter                       │
//! ├────────────────────────────────────────────────────────┤
//! │  record(TestOutcome)        upsert by id, keep order   │
//! │  finalize()                 at most once per run       │
//! │    ├── RunCollector::summarize() -> RunSummary         │
//! │    ├── RunLinks::from_ci(CiContext) -> report, logs    │
//! │    ├── message::render(format, locale) -> Payload      │
//! │    └── WebhookNotifier::send(payload)   single POST    │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Delivery problems never propagate to the caller: a missing or invalid
//! webhook degrades the reporter to a no-op, and failures surface only as
//! log lines and a [`FinalizeStatus`].

pub mod outcome;
pub mod collector;
pub mod config;
pub mod message;
pub mod notify;
pub mod reporter;
pub mod error;

pub use collector::{RunCollector, RunSummary};
pub use config::{CiContext, Locale, MessageFormat, ReporterConfig, RunLinks};
pub use error::{ReporterError, ReporterResult};
pub use message::NotificationPayload;
pub use notify::WebhookNotifier;
pub use outcome::{TestLocation, TestOutcome, TestStatus};
pub use reporter::{FinalizeStatus, RunReporter};
