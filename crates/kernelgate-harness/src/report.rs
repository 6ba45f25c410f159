//! Conformance report.
//!
//! One record per (scenario, capability, shape) observation and per bundle
//! check, serializable for machine consumption and summarizable for
//! humans. A mismatch terminates its scenario with a failure record; there
//! is no retry or recovery.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of one recorded check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skip,
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Scenario name, or a synthetic name for bundle checks.
    pub scenario: String,
    /// Capability the scenario was expanded for, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,
    /// Submission shape, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    pub status: CheckStatus,
    /// Failure or skip detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregated result of a harness run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub records: Vec<ScenarioRecord>,
}

impl ConformanceReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ScenarioRecord) {
        self.records.push(record);
    }

    pub fn passed(&self) -> usize {
        self.count(CheckStatus::Pass)
    }

    pub fn failed(&self) -> usize {
        self.count(CheckStatus::Fail)
    }

    pub fn skipped(&self) -> usize {
        self.count(CheckStatus::Skip)
    }

    fn count(&self, status: CheckStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// `true` when no check failed (skips do not count against
    /// conformance).
    pub fn is_conforming(&self) -> bool {
        self.failed() == 0
    }

    /// Records that failed, for detailed reporting.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.records.iter().filter(|r| r.status == CheckStatus::Fail)
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        let verdict = if self.is_conforming() { "CONFORMANT" } else { "NON-CONFORMANT" };
        format!(
            "{verdict}: {} passed, {} failed, {} skipped ({} checks)",
            self.passed(),
            self.failed(),
            self.skipped(),
            self.records.len(),
        )
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for record in self.failures() {
            let cap = record.capability.as_deref().unwrap_or("-");
            let shape = record.shape.as_deref().unwrap_or("-");
            let detail = record.detail.as_deref().unwrap_or("");
            writeln!(f, "  FAIL {} [{cap}/{shape}] {detail}", record.scenario)?;
        }
        Ok(())
    }
}
