//! Per-test outcome records reported by the test framework

use std::fmt;

use serde::{Deserialize, Serialize};

/// Final status of one executed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
}

impl TestStatus {
    /// Map a framework status string onto the two-state model.
    ///
    /// Only an exact `"passed"` counts as a pass; everything else the
    /// framework can report (failed, timedOut, interrupted) is a failure.
    pub fn from_raw(raw: &str) -> Self {
        if raw == "passed" {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "passed"),
            TestStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Source position of a test, rendered as `file:line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestLocation {
    pub file: String,
    pub line: u32,
}

impl TestLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for TestLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One completed test, immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Unique identifier of the test instance, the upsert key.
    pub id: String,

    /// Human-readable test title.
    pub title: String,

    /// Final status.
    pub status: TestStatus,

    /// Where the test lives in the suite sources.
    pub location: TestLocation,
}

impl TestOutcome {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        status: TestStatus,
        location: TestLocation,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_raw() {
        assert_eq!(TestStatus::from_raw("passed"), TestStatus::Passed);
        assert_eq!(TestStatus::from_raw("failed"), TestStatus::Failed);
        assert_eq!(TestStatus::from_raw("timedOut"), TestStatus::Failed);
        assert_eq!(TestStatus::from_raw("interrupted"), TestStatus::Failed);
        assert_eq!(TestStatus::from_raw(""), TestStatus::Failed);
        assert_eq!(TestStatus::from_raw("Passed"), TestStatus::Failed); // Case sensitive
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TestStatus::Passed.to_string(), "passed");
        assert_eq!(TestStatus::Failed.to_string(), "failed");
    }

    #[test]
    fn test_location_display() {
        let loc = TestLocation::new("tests/login.spec.ts", 42);
        assert_eq!(loc.to_string(), "tests/login.spec.ts:42");
    }
}
