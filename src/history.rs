// File: history.rs
// Location: /src/history.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::content::DataType;

/// History keeps at most this many entries, most recent first.
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub content: String,
    pub data_type: DataType,
    /// Self-contained PNG data URL of the final composited image.
    pub image: String,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(content: String, data_type: DataType, image: String) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: now.timestamp_millis(),
            content,
            data_type,
            image,
            timestamp: now.to_rfc3339(),
        }
    }
}

/// Inserts at the front and evicts the oldest entries past the limit.
pub fn push(history: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    history.insert(0, entry);
    history.truncate(HISTORY_LIMIT);
}

pub fn history_path() -> PathBuf {
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".config/qr-studio/history.json"))
        .unwrap_or_else(|_| PathBuf::from("/tmp/qr-studio-history.json"))
}

pub fn load_history(path: &Path) -> Result<Vec<HistoryEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    let mut history: Vec<HistoryEntry> = serde_json::from_str(&content)?;
    history.truncate(HISTORY_LIMIT);
    Ok(history)
}

pub fn save_history(path: &Path, history: &[HistoryEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut to_save = history.to_vec();
    to_save.truncate(HISTORY_LIMIT);
    let json = serde_json::to_string_pretty(&to_save)?;
    std::fs::write(path, json)?;
    Ok(())
}
