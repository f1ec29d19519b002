//! # Configuration Layer
//!
//! Settings are built exactly once at process start and handed to
//! consumers by reference; there is no ambient global. Three layers, each
//! overriding the previous:
//!
//! 1. compiled-in defaults,
//! 2. an optional TOML settings file,
//! 3. `TESTMAN_*` environment variables.
//!
//! [`tree::SettingsTree`] additionally exposes free-form, dotted-path
//! addressable settings for values the typed struct does not model.

pub mod tree;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::HarnessError;

pub use tree::SettingsTree;

/// Process-wide configuration, built once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URL every row url is joined onto.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Where the HTML report is written.
    pub report_path: PathBuf,
    pub report_title: String,
    /// Optional login performed once before the first row.
    pub login: Option<LoginSettings>,
    /// Free-form extra settings, addressable by dotted path.
    pub extra: SettingsTree,
}

/// Credentials posted once at client construction; the session cookie
/// then covers the rest of the run.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginSettings {
    pub url: String,
    pub payload: Value,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 30,
            report_path: PathBuf::from("report.html"),
            report_title: "API Test Report".to_string(),
            login: None,
            extra: SettingsTree::new(),
        }
    }
}

impl Settings {
    /// Build the layered settings: defaults, then the file (if any), then
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, HarnessError> {
        let mut settings = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| {
                    HarnessError::Config(format!("cannot read `{}`: {e}", path.display()))
                })?;
                toml::from_str(&raw).map_err(|e| {
                    HarnessError::Config(format!("cannot parse `{}`: {e}", path.display()))
                })?
            }
            None => Self::default(),
        };
        settings.apply_overrides(std::env::vars());
        Ok(settings)
    }

    /// Apply environment-style overrides. Takes an iterator so tests can
    /// feed overrides without touching the process environment.
    pub fn apply_overrides(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            match key.as_str() {
                "TESTMAN_BASE_URL" => self.base_url = value,
                "TESTMAN_TIMEOUT_SECS" => {
                    if let Ok(secs) = value.parse() {
                        self.timeout_secs = secs;
                    }
                }
                "TESTMAN_REPORT_PATH" => self.report_path = PathBuf::from(value),
                "TESTMAN_REPORT_TITLE" => self.report_title = value,
                _ => {}
            }
        }
    }
}
