//! Persistence: the selected level, the level list and the local submission history.
//!
//! All readers are forgiving. A missing or corrupt progress file means "no
//! saved state"; history lines that are not game memos are skipped.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{parse_levels, GameEntry, Level};

/// Level selection restored on the next start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProgress {
    /// `None` when a custom or practice seed was being played.
    pub level_id: Option<u32>,
    pub seed: String,
}

pub fn load_progress(path: &Path) -> Option<SavedProgress> {
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

pub fn save_progress(path: &Path, progress: &SavedProgress) -> Result<()> {
    let json = serde_json::to_string_pretty(progress).context("encode progress")?;
    fs::write(path, json).with_context(|| format!("write progress to {}", path.display()))
}

/// Read the level list. An unreadable file is an error; an empty one is not.
pub fn read_levels(path: &Path) -> Result<Vec<Level>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read level list {}", path.display()))?;
    Ok(parse_levels(&text))
}

/// Parse history text: one memo per line, optionally prefixed by
/// `<unix seconds>\t`.
pub fn parse_history(text: &str) -> Vec<GameEntry> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let (block_time, memo) = match line.split_once('\t') {
                Some((time, memo)) => (time.trim().parse().unwrap_or(0), memo),
                None => (0, line),
            };
            GameEntry::from_memo(format!("local-{}", index + 1), block_time, memo).ok()
        })
        .collect()
}

/// Read the history file; a missing file is an empty history.
pub fn load_history(path: &Path) -> Result<Vec<GameEntry>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(parse_history(&text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e).with_context(|| format!("read history {}", path.display())),
    }
}

/// Append a memo to the history file, stamped with the current time.
pub fn append_history(path: &Path, memo: &str) -> Result<()> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open history {}", path.display()))?;
    writeln!(file, "{now}\t{memo}").with_context(|| format!("append to {}", path.display()))
}
