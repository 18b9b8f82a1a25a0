//! Boundary to the external metadata tool.
//!
//! The core never parses or writes metadata containers itself; it asks a
//! `MetadataTool` for a file's tags and to copy one tag onto another.

use crate::config::ExiftoolConfig;
use crate::models::TagSet;
use serde_json::Value;
use std::ffi::OsString;
use std::path::Path;
use std::process::Output;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("timed out after {0}s")]
    Timeout(u64),
    #[error("exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("unparsable output: {0}")]
    Parse(String),
    #[error("no metadata record returned")]
    NoRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Rewrite the file in place.
    Overwrite,
    /// Keep the untouched original next to the rewritten file.
    Preserve,
}

impl WriteMode {
    pub fn from_backup(backup: bool) -> Self {
        if backup {
            WriteMode::Preserve
        } else {
            WriteMode::Overwrite
        }
    }
}

#[async_trait::async_trait]
pub trait MetadataTool: Send + Sync {
    async fn read_tags(&self, path: &Path) -> Result<TagSet, ToolError>;

    /// Copies the value of `source` into `target` inside the file itself.
    async fn write_tag(
        &self,
        path: &Path,
        target: &str,
        source: &str,
        mode: WriteMode,
    ) -> Result<(), ToolError>;
}

#[derive(Debug, Clone)]
pub struct Exiftool {
    program: String,
    timeout_secs: u64,
}

impl Exiftool {
    pub fn new(cfg: &ExiftoolConfig) -> Self {
        Self {
            program: cfg.program.clone(),
            timeout_secs: cfg.timeout_secs,
        }
    }

    async fn run(&self, args: Vec<OsString>) -> Result<Output, ToolError> {
        let mut command = Command::new(&self.program);
        command.args(args);
        command.kill_on_drop(true);

        let output = if self.timeout_secs == 0 {
            command.output().await
        } else {
            timeout(Duration::from_secs(self.timeout_secs), command.output())
                .await
                .map_err(|_| ToolError::Timeout(self.timeout_secs))?
        }
        .map_err(|source| ToolError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ToolError::Failed {
                status: output.status.to_string(),
                stderr: if stderr.is_empty() {
                    "(no stderr output)".to_string()
                } else {
                    stderr
                },
            });
        }
        Ok(output)
    }
}

#[async_trait::async_trait]
impl MetadataTool for Exiftool {
    async fn read_tags(&self, path: &Path) -> Result<TagSet, ToolError> {
        let output = self.run(read_args(path)).await?;
        parse_read_output(&output.stdout)
    }

    async fn write_tag(
        &self,
        path: &Path,
        target: &str,
        source: &str,
        mode: WriteMode,
    ) -> Result<(), ToolError> {
        self.run(write_args(path, target, source, mode)).await?;
        Ok(())
    }
}

pub fn read_args(path: &Path) -> Vec<OsString> {
    vec!["-j".into(), path.as_os_str().to_owned()]
}

pub fn write_args(path: &Path, target: &str, source: &str, mode: WriteMode) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(3);
    if mode == WriteMode::Overwrite {
        args.push("-overwrite_original".into());
    }
    args.push(format!("-{target}<{source}").into());
    args.push(path.as_os_str().to_owned());
    args
}

/// `exiftool -j` prints an array with one object per file.
pub fn parse_read_output(stdout: &[u8]) -> Result<TagSet, ToolError> {
    let parsed: Value =
        serde_json::from_slice(stdout).map_err(|e| ToolError::Parse(e.to_string()))?;
    let first = match parsed {
        Value::Array(items) => items.into_iter().next().ok_or(ToolError::NoRecord)?,
        other => return Err(ToolError::Parse(format!("expected array, got {other}"))),
    };
    match first {
        Value::Object(map) if !map.is_empty() => Ok(map.into_iter().collect()),
        Value::Object(_) => Err(ToolError::NoRecord),
        other => Err(ToolError::Parse(format!("expected object, got {other}"))),
    }
}
