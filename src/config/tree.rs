//! Dotted-path settings tree.
//!
//! A recursively-addressable key/value tree for settings outside the
//! typed [`Settings`](super::Settings) struct. Paths are dotted strings
//! (`"report.keep_days"`); writes auto-vivify intermediate branches,
//! reads of missing paths return `None` and never panic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Truthy spellings accepted by [`SettingsTree::get_bool`], matching the
/// loose forms settings files have historically used.
const TRUE_VALUES: [&str; 6] = ["t", "true", "enabled", "1", "on", "yes"];
const FALSE_VALUES: [&str; 7] = ["f", "false", "disabled", "0", "off", "no", ""];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsTree {
    root: Map<String, Value>,
}

impl SettingsTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value by dotted path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Write a value at a dotted path, creating intermediate branches as
    /// needed. A non-object value sitting mid-path is replaced by a
    /// branch.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let mut segments = path.split('.').peekable();
        let mut current = &mut self.root;
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.insert(segment.to_string(), value.into());
                return;
            }
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = entry.as_object_mut().expect("branch was just made an object");
        }
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    /// Integer lookup; numeric strings coerce.
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        match self.get(path)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean lookup; the usual loose string spellings coerce.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        match self.get(path)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => {
                let s = s.trim().to_ascii_lowercase();
                if TRUE_VALUES.contains(&s.as_str()) {
                    Some(true)
                } else if FALSE_VALUES.contains(&s.as_str()) {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
