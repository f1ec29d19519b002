//! # Test Suite Model & Ingestion
//!
//! Loads sheet-shaped suite files: one sheet per file, one row per test
//! step, each row carrying a sequence id, name, url, payload, HTTP
//! method, and the expected status/error codes.
//!
//! Expectation cells come from spreadsheet exports, so they arrive in
//! loose forms: numbers, numeric strings, the empty string (meaning "not
//! specified"), and the literal `"errors"` sentinel for the error-code
//! column (meaning "an errors list being present is itself the
//! expectation").

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use crate::error::HarnessError;

/// The expected secondary (error) code of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorExpectation {
    /// Compare batch record fields against this code.
    Code(i64),
    /// Pass when a nested `errors` list exists, whatever it contains.
    ErrorsPresent,
}

/// The pair of expected-code fields driving one verdict.
///
/// At most one of the two drives the outcome: `expected_code` wins
/// whenever it is `Some`, and `expected_error_code` is only consulted
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expectation {
    pub expected_code: Option<i64>,
    pub expected_error_code: Option<ErrorExpectation>,
}

/// One row of a test sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct TestStep {
    #[serde(deserialize_with = "de_sequence")]
    pub seq: String,
    pub name: String,
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default, deserialize_with = "de_expected_code")]
    pub expected_code: Option<i64>,
    #[serde(default, deserialize_with = "de_expected_error_code")]
    pub expected_error_code: Option<ErrorExpectation>,
}

impl TestStep {
    pub fn expectation(&self) -> Expectation {
        Expectation {
            expected_code: self.expected_code,
            expected_error_code: self.expected_error_code.clone(),
        }
    }
}

/// One suite file: a named sheet with its ordered steps.
#[derive(Debug, Clone, Deserialize)]
pub struct TestSheet {
    pub sheet: String,
    pub steps: Vec<TestStep>,
}

/// Load a suite file from disk.
pub fn load_sheet(path: &Path) -> Result<TestSheet, HarnessError> {
    let raw = fs::read_to_string(path).map_err(|e| HarnessError::Suite {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| HarnessError::Suite {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn de_sequence<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    // Sequence ids are numeric in some sheets and strings in others;
    // they are only used for reporting, so normalize to a string.
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "sequence id must be a number or string, got {other}"
        ))),
    }
}

/// `""` means "not specified"; `0` is a legitimate code.
fn de_expected_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_code_cell(Option::<Value>::deserialize(deserializer)?).map_err(de::Error::custom)
}

fn de_expected_error_code<'de, D>(deserializer: D) -> Result<Option<ErrorExpectation>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    if let Some(Value::String(s)) = &raw
        && s.trim() == "errors"
    {
        return Ok(Some(ErrorExpectation::ErrorsPresent));
    }
    Ok(parse_code_cell(raw)
        .map_err(de::Error::custom)?
        .map(ErrorExpectation::Code))
}

fn parse_code_cell(raw: Option<Value>) -> Result<Option<i64>, String> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| format!("expected an integer code, got {n}")),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("expected a numeric code, got `{s}`")),
        Some(other) => Err(format!("expected a numeric code cell, got {other}")),
    }
}
