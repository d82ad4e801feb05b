//! Ordered record set of test outcomes with last-write-wins upserts

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::outcome::{TestOutcome, TestStatus};

/// Insertion-ordered record set keyed by test id.
///
/// A retried test reports the same id more than once; the replacement keeps
/// the record's original position, so iteration order is first-seen order
/// while the value is always the last one reported.
#[derive(Debug, Default)]
pub struct RunCollector {
    entries: Vec<TestOutcome>,
    by_id: HashMap<String, usize>,
}

impl RunCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the outcome for its id. Last write wins.
    pub fn upsert(&mut self, outcome: TestOutcome) {
        match self.by_id.get(&outcome.id) {
            Some(&idx) => self.entries[idx] = outcome,
            None => {
                self.by_id.insert(outcome.id.clone(), self.entries.len());
                self.entries.push(outcome);
            }
        }
    }

    /// Number of distinct tests recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outcomes in first-reported order.
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.entries
    }

    /// Tally the current record set.
    pub fn summarize(&self) -> RunSummary {
        RunSummary::from_outcomes(&self.entries)
    }
}

/// Pass/fail tally, derived from the record set at notification time and
/// never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a TestOutcome>) -> Self {
        let mut passed = 0;
        let mut failed = 0;
        for outcome in outcomes {
            match outcome.status {
                TestStatus::Passed => passed += 1,
                TestStatus::Failed => failed += 1,
            }
        }
        Self {
            total: passed + failed,
            passed,
            failed,
        }
    }

    /// True when nothing failed. An empty run counts as passing.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
