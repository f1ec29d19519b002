use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use testman::config::Settings;
use testman::history::RunRecord;
use testman::http::ApiClient;
use testman::report::RunSummary;
use testman::runner::{StepOutcome, run_sheet};
use testman::{report, storage, suite};

#[derive(Parser)]
#[command(name = "testman", version, about = "API test automation harness")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one or more suite files against the service under test.
    Run {
        /// Suite files (JSON), executed in the given order.
        #[arg(required = true)]
        suites: Vec<PathBuf>,
        /// Settings file (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the configured base URL.
        #[arg(long)]
        base_url: Option<String>,
        /// Override the configured report path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Show the most recent run summaries.
    History {
        /// How many entries to show.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Run {
            suites,
            config,
            base_url,
            report,
        } => run(suites, config, base_url, report).await,
        Command::History { limit } => show_history(limit),
    }
}

async fn run(
    suites: Vec<PathBuf>,
    config: Option<PathBuf>,
    base_url: Option<String>,
    report_path: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let mut settings = Settings::load(config.as_deref()).context("loading settings")?;
    if let Some(base_url) = base_url {
        settings.base_url = base_url;
    }
    if let Some(report_path) = report_path {
        settings.report_path = report_path;
    }

    let client = ApiClient::new(&settings)?;
    if let Some(login) = &settings.login {
        let response = client.login(login).await.context("logging in")?;
        info!(status = %response.status, "login completed");
    }

    let mut sheets = Vec::with_capacity(suites.len());
    for path in &suites {
        let sheet = suite::load_sheet(path)?;
        sheets.push(run_sheet(&client, &sheet).await);
    }

    let summary = RunSummary::new(settings.report_title.clone(), sheets);
    report::write_report(&settings.report_path, &summary)?;

    let mut history = storage::load_history().unwrap_or_else(|e| {
        warn!("discarding unreadable history: {e}");
        testman::history::History::new()
    });
    history.push(RunRecord::from_summary(
        &summary,
        &settings.report_path.display().to_string(),
    ));
    storage::save_history(&history)?;

    info!(
        total = summary.total(),
        passed = summary.count(StepOutcome::Pass),
        failed = summary.count(StepOutcome::Fail),
        errors = summary.count(StepOutcome::Error),
        "run finished"
    );

    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn show_history(limit: usize) -> anyhow::Result<ExitCode> {
    let history = storage::load_history()?;
    for record in history.entries().iter().take(limit) {
        println!(
            "{}  {}  total={} passed={} failed={} errors={}  {}",
            record.timestamp,
            record.title,
            record.total,
            record.passed,
            record.failed,
            record.errors,
            record.report_path,
        );
    }
    Ok(ExitCode::SUCCESS)
}
