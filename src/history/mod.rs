//! # Run History
//!
//! Tracks the most recent harness runs so regressions can be compared
//! across nights.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::report::RunSummary;
use crate::runner::StepOutcome;

/// Maximum number of run records to retain.
const MAX_HISTORY_ENTRIES: usize = 100;

/// A single history entry recording one past run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp: u64,
    pub title: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub report_path: String,
}

impl RunRecord {
    pub fn from_summary(summary: &RunSummary, report_path: &str) -> Self {
        Self {
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            title: summary.title.clone(),
            total: summary.total(),
            passed: summary.count(StepOutcome::Pass),
            failed: summary.count(StepOutcome::Fail),
            errors: summary.count(StepOutcome::Error),
            report_path: report_path.to_string(),
        }
    }
}

/// Manages the run history list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<RunRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to the front of the list, evicting the oldest entry
    /// if the list exceeds the maximum size.
    pub fn push(&mut self, record: RunRecord) {
        if self.entries.len() >= MAX_HISTORY_ENTRIES {
            self.entries.pop_back();
        }
        self.entries.push_front(record);
    }

    /// All records, most recent first.
    pub fn entries(&self) -> &VecDeque<RunRecord> {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
