//! # Sequential Sheet Runner
//!
//! Iterates the rows of one sheet strictly in source order: request →
//! decode → classify → evaluate, appending one [`StepResult`] per row.
//! A fault in one row (unknown method, transport error) is recorded as
//! [`StepOutcome::Error`] and the run continues with the next row.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::http::{ApiClient, HttpMethod};
use crate::suite::{TestSheet, TestStep};
use crate::verdict::{Envelope, evaluate};

/// How one row ended.
///
/// `Error` is distinct from `Fail`: a failed verdict is a test result,
/// an error is a harness/transport fault for that row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepOutcome {
    Pass,
    Fail,
    Error,
}

/// The recorded result of one row, in row order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub sequence: String,
    pub name: String,
    pub outcome: StepOutcome,
    pub reason: String,
    pub duration_ms: u128,
}

/// All results of one sheet, in row order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetReport {
    pub sheet: String,
    pub results: Vec<StepResult>,
}

impl SheetReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.outcome == StepOutcome::Pass)
    }
}

/// Run every row of a sheet, in order.
pub async fn run_sheet(client: &ApiClient, sheet: &TestSheet) -> SheetReport {
    info!(sheet = %sheet.sheet, rows = sheet.steps.len(), "running sheet");

    let mut results = Vec::with_capacity(sheet.steps.len());
    for step in &sheet.steps {
        let result = run_step(client, step).await;
        match result.outcome {
            StepOutcome::Pass => {
                info!(seq = %result.sequence, name = %result.name, "passed: {}", result.reason);
            }
            StepOutcome::Fail => {
                error!(seq = %result.sequence, name = %result.name, "failed: {}", result.reason);
            }
            StepOutcome::Error => {
                warn!(seq = %result.sequence, name = %result.name, "error: {}", result.reason);
            }
        }
        results.push(result);
    }

    SheetReport {
        sheet: sheet.sheet.clone(),
        results,
    }
}

async fn run_step(client: &ApiClient, step: &TestStep) -> StepResult {
    let started = Instant::now();
    let (outcome, reason) = execute(client, step).await;
    StepResult {
        sequence: step.seq.clone(),
        name: step.name.clone(),
        outcome,
        reason,
        duration_ms: started.elapsed().as_millis(),
    }
}

async fn execute(client: &ApiClient, step: &TestStep) -> (StepOutcome, String) {
    let method: HttpMethod = match step.method.parse() {
        Ok(method) => method,
        Err(e) => return (StepOutcome::Error, e.to_string()),
    };

    let response = match client.send(method, &step.url, step.payload.as_ref()).await {
        Ok(response) => response,
        Err(e) => return (StepOutcome::Error, e.to_string()),
    };

    // A body that does not decode is reported as a distinct failure
    // before the verdict engine is ever consulted.
    let Some(body) = response.json() else {
        return (
            StepOutcome::Fail,
            format!(
                "response body is not valid JSON ({}): {}",
                response.status,
                response.display_body()
            ),
        );
    };

    let verdict = evaluate(&Envelope::classify(&body), &step.expectation());
    let outcome = if verdict.passed {
        StepOutcome::Pass
    } else {
        StepOutcome::Fail
    };
    (outcome, verdict.reason)
}
