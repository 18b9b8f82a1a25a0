use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Tag name to value, as reported by the metadata tool for one file.
pub type TagSet = HashMap<String, Value>;

/// Decision taken for a single file's tag set.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    NoActionNeeded,
    Repairable { tag: String, value: Value },
    UnrepairableMissingTag,
    ReadFailed,
}

/// Terminal state of one file after the batch has handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Processed,
    DryRun,
    Skipped,
    Missing,
    Error,
}

impl FileStatus {
    pub const ALL: [FileStatus; 5] = [
        FileStatus::Processed,
        FileStatus::DryRun,
        FileStatus::Skipped,
        FileStatus::Missing,
        FileStatus::Error,
    ];
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTally {
    pub total: usize,
    pub processed: usize,
    pub dry_run_processed: usize,
    pub skipped: usize,
    pub missing_tag: usize,
    pub error: usize,
}

impl BatchTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, status: FileStatus) {
        match status {
            FileStatus::Processed => self.processed += 1,
            FileStatus::DryRun => self.dry_run_processed += 1,
            FileStatus::Skipped => self.skipped += 1,
            FileStatus::Missing => self.missing_tag += 1,
            FileStatus::Error => self.error += 1,
        }
    }

    /// Number of files that reached a terminal status.
    pub fn completed(&self) -> usize {
        self.processed + self.dry_run_processed + self.skipped + self.missing_tag + self.error
    }
}

/// Renders a tag value for log lines without JSON quoting.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
