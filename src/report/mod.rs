//! # HTML Run Report
//!
//! Renders the aggregated per-sheet results into a single HTML page and
//! prints a console summary. The template is embedded so the binary has
//! no runtime asset dependencies.

use std::fs;
use std::path::Path;

use chrono::Local;
use minijinja::{Environment, context};
use serde::Serialize;
use tracing::info;

use crate::error::HarnessError;
use crate::runner::{SheetReport, StepOutcome};

const REPORT_TEMPLATE: &str = include_str!("template.html");

/// One whole run: every sheet that was executed, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub title: String,
    pub generated_at: String,
    pub sheets: Vec<SheetReport>,
}

impl RunSummary {
    pub fn new(title: String, sheets: Vec<SheetReport>) -> Self {
        Self {
            title,
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            sheets,
        }
    }

    pub fn total(&self) -> usize {
        self.sheets.iter().map(SheetReport::total).sum()
    }

    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.sheets.iter().map(|s| s.count(outcome)).sum()
    }

    pub fn all_passed(&self) -> bool {
        self.sheets.iter().all(SheetReport::all_passed)
    }
}

#[derive(Serialize)]
struct SheetView<'a> {
    sheet: &'a str,
    total: usize,
    passed: usize,
    failed: usize,
    errors: usize,
    results: &'a [crate::runner::StepResult],
}

/// Render the run summary to HTML.
pub fn render_html(summary: &RunSummary) -> Result<String, HarnessError> {
    let mut env = Environment::new();
    env.add_template("report", REPORT_TEMPLATE)?;

    let sheets: Vec<SheetView<'_>> = summary
        .sheets
        .iter()
        .map(|sheet| SheetView {
            sheet: &sheet.sheet,
            total: sheet.total(),
            passed: sheet.count(StepOutcome::Pass),
            failed: sheet.count(StepOutcome::Fail),
            errors: sheet.count(StepOutcome::Error),
            results: &sheet.results,
        })
        .collect();

    let total = summary.total();
    let passed = summary.count(StepOutcome::Pass);
    let pass_rate = if total == 0 {
        100.0
    } else {
        passed as f64 * 100.0 / total as f64
    };

    let html = env.get_template("report")?.render(context! {
        title => summary.title,
        generated_at => summary.generated_at,
        sheets => sheets,
        total => total,
        passed => passed,
        failed => summary.count(StepOutcome::Fail),
        errors => summary.count(StepOutcome::Error),
        pass_rate => format!("{pass_rate:.1}"),
    })?;
    Ok(html)
}

/// Render and write the report file.
pub fn write_report(path: &Path, summary: &RunSummary) -> Result<(), HarnessError> {
    let html = render_html(summary)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::StepResult;

    fn sample_summary() -> RunSummary {
        RunSummary::new(
            "Nightly API Run".to_string(),
            vec![SheetReport {
                sheet: "user".to_string(),
                results: vec![
                    StepResult {
                        sequence: "1".to_string(),
                        name: "create user".to_string(),
                        outcome: StepOutcome::Pass,
                        reason: "primary code matched".to_string(),
                        duration_ms: 12,
                    },
                    StepResult {
                        sequence: "2".to_string(),
                        name: "delete user twice".to_string(),
                        outcome: StepOutcome::Fail,
                        reason: "no batch record matched expected error code".to_string(),
                        duration_ms: 8,
                    },
                ],
            }],
        )
    }

    #[test]
    fn report_contains_rows_and_counts() {
        let html = render_html(&sample_summary()).unwrap();
        assert!(html.contains("Nightly API Run"));
        assert!(html.contains("delete user twice"));
        assert!(html.contains("no batch record matched expected error code"));
        assert!(html.contains("50.0"));
    }

    #[test]
    fn empty_run_renders() {
        let summary = RunSummary::new("Empty".to_string(), Vec::new());
        let html = render_html(&summary).unwrap();
        assert!(html.contains("Empty"));
    }
}
