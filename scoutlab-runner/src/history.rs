//! Run history: one JSON object per pipeline run, appended to a JSONL file.
//!
//! Each line stands alone, so a partially written line never corrupts the
//! earlier ones; malformed lines are skipped on read.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::runner::{ModelStatus, RunSummary};

/// File name of the history inside the warehouse root.
pub const HISTORY_FILE: &str = "run_history.jsonl";

/// Condensed record of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub run_id: String,
    pub dataset_hash: String,
    pub season: i32,
    pub started_at: NaiveDateTime,
    pub elapsed_ms: u64,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Row counts of the models that succeeded.
    pub rows_by_model: BTreeMap<String, usize>,
}

impl HistoryEntry {
    pub fn from_summary(summary: &RunSummary) -> Self {
        let count = |status: ModelStatus| summary.models.iter().filter(|m| m.status == status).count();
        Self {
            run_id: summary.run_id.to_string(),
            dataset_hash: summary.dataset_hash.to_string(),
            season: summary.season,
            started_at: summary.started_at,
            elapsed_ms: summary.elapsed_ms,
            succeeded: count(ModelStatus::Success),
            failed: count(ModelStatus::Failed),
            skipped: count(ModelStatus::Skipped),
            rows_by_model: summary
                .models
                .iter()
                .filter(|m| m.status == ModelStatus::Success)
                .map(|m| (m.model.clone(), m.rows))
                .collect(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

/// JSONL history file manager.
pub struct RunHistory {
    path: PathBuf,
}

impl RunHistory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The history file of a warehouse root.
    pub fn in_warehouse(root: &Path) -> Self {
        Self::new(root.join(HISTORY_FILE))
    }

    pub fn append(&self, entry: &HistoryEntry) -> io::Result<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(file, "{json}")?;
        file.flush()
    }

    /// Every readable entry, oldest first.
    pub fn read_all(&self) -> io::Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path)?;
        let reader = io::BufReader::new(file);
        let mut entries = Vec::new();

        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(line = n + 1, error = %e, "skipping malformed history line"),
            }
        }

        Ok(entries)
    }

    /// The `n` most recent entries, newest first.
    pub fn recent(&self, n: usize) -> io::Result<Vec<HistoryEntry>> {
        let mut entries = self.read_all()?;
        entries.reverse();
        entries.truncate(n);
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(run_id: &str, failed: usize) -> HistoryEntry {
        HistoryEntry {
            run_id: run_id.into(),
            dataset_hash: "abc".into(),
            season: 2024,
            started_at: chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            elapsed_ms: 42,
            succeeded: 14 - failed,
            failed,
            skipped: 0,
            rows_by_model: BTreeMap::from([("gold_player_stats".to_string(), 10)]),
        }
    }

    #[test]
    fn append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let history = RunHistory::in_warehouse(dir.path());
        assert!(history.read_all().unwrap().is_empty());

        history.append(&entry("r1", 0)).unwrap();
        history.append(&entry("r2", 1)).unwrap();

        let all = history.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], entry("r1", 0));
        assert!(all[0].is_clean());
        assert!(!all[1].is_clean());

        let recent = history.recent(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].run_id, "r2");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let history = RunHistory::in_warehouse(dir.path());
        history.append(&entry("r1", 0)).unwrap();
        let mut content = fs::read_to_string(history.path()).unwrap();
        content.push_str("{not json\n\n");
        fs::write(history.path(), content).unwrap();
        history.append(&entry("r2", 0)).unwrap();

        let ids: Vec<String> = history.read_all().unwrap().into_iter().map(|e| e.run_id).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }
}
