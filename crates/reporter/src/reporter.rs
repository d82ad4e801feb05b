//! Run lifecycle: collect outcomes, then notify once
//!
//! [`RunReporter`] owns the record set behind a mutex so test workers can
//! report concurrently, and drives the single end-of-run notification.
//! The reporter moves through two phases: it starts out collecting,
//! and the first [`finalize`](RunReporter::finalize) call switches it to
//! finalized for good. Notification problems are logged and folded into
//! the returned [`FinalizeStatus`], never raised, so a broken webhook
//! cannot fail an otherwise green run.

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::collector::{RunCollector, RunSummary};
use crate::config::{ReporterConfig, RunLinks};
use crate::error::{ReporterError, ReporterResult};
use crate::message;
use crate::notify::WebhookNotifier;
use crate::outcome::TestOutcome;

/// Where a finalize call ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeStatus {
    /// The webhook accepted the notification.
    Delivered,
    /// No valid webhook endpoint, nothing was sent.
    NotConfigured,
    /// The run was already finalized by an earlier call.
    AlreadyFinalized,
    /// The POST failed or the webhook rejected it. Details are logged.
    DeliveryFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Collecting,
    Finalized,
}

#[derive(Default)]
struct RunState {
    collector: RunCollector,
    phase: Phase,
}

/// Collects test outcomes and posts one summary when the run ends.
pub struct RunReporter {
    state: Mutex<RunState>,
    notifier: WebhookNotifier,
    config: ReporterConfig,
}

impl RunReporter {
    pub fn new(config: ReporterConfig) -> ReporterResult<Self> {
        let notifier = WebhookNotifier::new(config.webhook_url.as_deref(), config.request_timeout)?;
        Ok(Self {
            state: Mutex::new(RunState::default()),
            notifier,
            config,
        })
    }

    /// Build a reporter from process environment variables.
    pub fn from_env() -> ReporterResult<Self> {
        Self::new(ReporterConfig::from_env())
    }

    /// Record one test outcome.
    ///
    /// Re-recording an id replaces the earlier outcome in place, so a
    /// retried test keeps its original position but reports its final
    /// status. Outcomes recorded after finalize are dropped.
    pub fn record(&self, outcome: TestOutcome) {
        let mut state = self.state.lock();
        match state.phase {
            Phase::Collecting => state.collector.upsert(outcome),
            Phase::Finalized => {
                warn!(
                    "Ignoring {} outcome for '{}' recorded after finalize",
                    outcome.status, outcome.id
                );
            }
        }
    }

    /// Snapshot of the recorded outcomes in first-seen order.
    pub fn recorded(&self) -> Vec<TestOutcome> {
        self.state.lock().collector.outcomes().to_vec()
    }

    /// Tally of the outcomes recorded so far.
    pub fn summary(&self) -> RunSummary {
        self.state.lock().collector.summarize()
    }

    pub fn is_finalized(&self) -> bool {
        self.state.lock().phase == Phase::Finalized
    }

    /// End the run and post the summary notification.
    ///
    /// The first call flips the reporter to finalized whether or not a
    /// webhook is configured; later calls return
    /// [`FinalizeStatus::AlreadyFinalized`] without sending anything.
    pub async fn finalize(&self) -> FinalizeStatus {
        // Snapshot under the lock, release it before any I/O.
        let summary = {
            let mut state = self.state.lock();
            if state.phase == Phase::Finalized {
                debug!("finalize called more than once, ignoring");
                return FinalizeStatus::AlreadyFinalized;
            }
            state.phase = Phase::Finalized;
            state.collector.summarize()
        };

        if !self.notifier.is_configured() {
            debug!("Run finished, no webhook configured");
            return FinalizeStatus::NotConfigured;
        }

        let timestamp = Utc::now().with_timezone(&self.config.timestamp_offset);
        let links = RunLinks::from_ci(self.config.ci.as_ref());
        let payload = message::render(
            self.config.format,
            self.config.locale,
            &summary,
            timestamp,
            &links,
        );

        match self.notifier.send(&payload).await {
            Ok(()) => {
                info!(
                    "Run notification delivered: {} passed, {} failed",
                    summary.passed, summary.failed
                );
                FinalizeStatus::Delivered
            }
            Err(ReporterError::WebhookStatus(code)) => {
                warn!("Webhook rejected run notification with status {}", code);
                FinalizeStatus::DeliveryFailed
            }
            Err(e) => {
                error!("Failed to deliver run notification: {}", e);
                FinalizeStatus::DeliveryFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{TestLocation, TestStatus};

    fn outcome(id: &str, status: TestStatus) -> TestOutcome {
        TestOutcome::new(id, format!("test {id}"), status, TestLocation::new("suite.rs", 1))
    }

    #[test]
    fn test_record_and_summarize() {
        let reporter = RunReporter::new(ReporterConfig::default()).unwrap();
        reporter.record(outcome("a", TestStatus::Passed));
        reporter.record(outcome("b", TestStatus::Failed));
        reporter.record(outcome("c", TestStatus::Passed));

        let summary = reporter.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);

        let recorded = reporter.recorded();
        let ids: Vec<&str> = recorded.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_record_replaces_by_id() {
        let reporter = RunReporter::new(ReporterConfig::default()).unwrap();
        reporter.record(outcome("flaky", TestStatus::Failed));
        reporter.record(outcome("stable", TestStatus::Passed));
        reporter.record(outcome("flaky", TestStatus::Passed));

        let recorded = reporter.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].id, "flaky");
        assert_eq!(recorded[0].status, TestStatus::Passed);
        assert!(reporter.summary().all_passed());
    }

    #[test]
    fn test_concurrent_recording_from_workers() {
        let reporter = RunReporter::new(ReporterConfig::default()).unwrap();

        // Four workers report the same shared ids plus one id of their own.
        // The shared status depends only on the id, so the final set is the
        // same under any interleaving.
        std::thread::scope(|s| {
            for worker in 0..4 {
                let reporter = &reporter;
                s.spawn(move || {
                    for i in 0..25 {
                        let status = if i % 2 == 0 {
                            TestStatus::Passed
                        } else {
                            TestStatus::Failed
                        };
                        reporter.record(outcome(&format!("shared-{i:02}"), status));
                    }
                    reporter.record(outcome(&format!("worker-{worker}"), TestStatus::Passed));
                });
            }
        });

        let summary = reporter.summary();
        assert_eq!(summary.total, 29);
        assert_eq!(summary.passed, 17);
        assert_eq!(summary.failed, 12);

        for recorded in reporter.recorded() {
            if let Some(n) = recorded.id.strip_prefix("shared-") {
                let i: usize = n.parse().unwrap();
                let expected = if i % 2 == 0 {
                    TestStatus::Passed
                } else {
                    TestStatus::Failed
                };
                assert_eq!(recorded.status, expected);
            }
        }
    }

    #[test]
    fn test_reporter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RunReporter>();
    }

    #[tokio::test]
    async fn test_finalize_without_webhook() {
        let reporter = RunReporter::new(ReporterConfig::default()).unwrap();
        reporter.record(outcome("a", TestStatus::Passed));

        assert!(!reporter.is_finalized());
        assert_eq!(reporter.finalize().await, FinalizeStatus::NotConfigured);
        assert!(reporter.is_finalized());
    }

    #[tokio::test]
    async fn test_finalize_is_at_most_once() {
        let reporter = RunReporter::new(ReporterConfig::default()).unwrap();
        assert_eq!(reporter.finalize().await, FinalizeStatus::NotConfigured);
        assert_eq!(reporter.finalize().await, FinalizeStatus::AlreadyFinalized);
        assert_eq!(reporter.finalize().await, FinalizeStatus::AlreadyFinalized);
    }

    #[tokio::test]
    async fn test_record_after_finalize_is_dropped() {
        let reporter = RunReporter::new(ReporterConfig::default()).unwrap();
        reporter.record(outcome("a", TestStatus::Passed));
        reporter.finalize().await;

        reporter.record(outcome("late", TestStatus::Failed));
        assert_eq!(reporter.recorded().len(), 1);
        assert_eq!(reporter.summary().failed, 0);
    }

    #[tokio::test]
    async fn test_invalid_webhook_degrades_to_not_configured() {
        let reporter = RunReporter::new(ReporterConfig::with_webhook("nonsense")).unwrap();
        reporter.record(outcome("a", TestStatus::Failed));
        assert_eq!(reporter.finalize().await, FinalizeStatus::NotConfigured);
    }
}
