//! Local persistence for the harness data directory.

use std::fs;
use std::path::PathBuf;

use crate::error::HarnessError;
use crate::history::History;

const DATA_DIR: &str = ".testman";
const HISTORY_FILE: &str = "history.json";

pub fn load_history() -> Result<History, HarnessError> {
    let file = data_dir().join(HISTORY_FILE);
    if !file.exists() {
        return Ok(History::new());
    }

    let raw = fs::read_to_string(&file)?;
    serde_json::from_str(&raw).map_err(|e| {
        HarnessError::Config(format!("cannot parse history file `{}`: {e}", file.display()))
    })
}

pub fn save_history(history: &History) -> Result<(), HarnessError> {
    ensure_data_dir()?;
    let file = data_dir().join(HISTORY_FILE);
    let raw = serde_json::to_string_pretty(history)
        .map_err(|e| HarnessError::Config(format!("cannot serialize history: {e}")))?;
    fs::write(&file, raw)?;
    Ok(())
}

fn data_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(DATA_DIR)
}

fn ensure_data_dir() -> Result<(), HarnessError> {
    fs::create_dir_all(data_dir())?;
    Ok(())
}
