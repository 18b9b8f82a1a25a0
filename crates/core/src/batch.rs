//! Bounded worker pool that runs read, resolve and write for every file.
//!
//! At most `workers` per-file tasks run at once. The dispatching task is the
//! only place the tally is mutated; workers hand back a `FileReport`.

use crate::exiftool::{MetadataTool, WriteMode};
use crate::models::{display_value, BatchTally, FileReport, FileStatus, Outcome};
use crate::resolver::TagPolicy;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub workers: usize,
    pub dry_run: bool,
    pub write_mode: WriteMode,
}

type Joined = Result<(Id, FileReport), JoinError>;

pub async fn run_batch(
    files: Vec<PathBuf>,
    tool: Arc<dyn MetadataTool>,
    policy: Arc<TagPolicy>,
    options: &BatchOptions,
) -> BatchTally {
    let workers = options.workers.max(1);
    let mut tally = BatchTally::new(files.len());
    let mut set = JoinSet::new();
    let mut in_flight: HashMap<Id, PathBuf> = HashMap::new();

    for path in files {
        while set.len() >= workers {
            if let Some(joined) = set.join_next_with_id().await {
                let report = collect(&mut in_flight, joined);
                tally.record(report.status);
            }
        }
        let tool = Arc::clone(&tool);
        let policy = Arc::clone(&policy);
        let options = options.clone();
        let task_path = path.clone();
        let handle = set.spawn(async move {
            process_file(task_path, tool.as_ref(), &policy, &options).await
        });
        in_flight.insert(handle.id(), path);
    }

    while let Some(joined) = set.join_next_with_id().await {
        let report = collect(&mut in_flight, joined);
        tally.record(report.status);
    }
    tally
}

/// Turns a finished task into its report; a panicked task becomes an error for its file.
fn collect(in_flight: &mut HashMap<Id, PathBuf>, joined: Joined) -> FileReport {
    match joined {
        Ok((id, report)) => {
            in_flight.remove(&id);
            debug!(
                "{:?} | {}{}",
                report.status,
                report.path.display(),
                report
                    .detail
                    .as_deref()
                    .map(|d| format!(" ({d})"))
                    .unwrap_or_default()
            );
            report
        }
        Err(err) => {
            let path = in_flight.remove(&err.id()).unwrap_or_default();
            error!("worker task failed: {} | {}", err, path.display());
            report(path, FileStatus::Error, Some(err.to_string()))
        }
    }
}

/// Handles one file end to end. Never fails; problems become `FileStatus::Error`.
pub async fn process_file(
    path: PathBuf,
    tool: &dyn MetadataTool,
    policy: &TagPolicy,
    options: &BatchOptions,
) -> FileReport {
    let outcome = match tool.read_tags(&path).await {
        Ok(tags) => policy.resolve(&tags),
        Err(err) => {
            error!("failed to read metadata: {} | {}", err, path.display());
            return report(path, FileStatus::Error, Some(err.to_string()));
        }
    };

    match outcome {
        Outcome::NoActionNeeded => {
            debug!("canonical date tag exists | {}", path.display());
            report(path, FileStatus::Skipped, None)
        }
        Outcome::UnrepairableMissingTag => {
            warn!("missing date tag, nothing to do | {}", path.display());
            report(path, FileStatus::Missing, None)
        }
        Outcome::ReadFailed => {
            error!("no metadata found | {}", path.display());
            report(path, FileStatus::Error, Some("empty metadata record".into()))
        }
        Outcome::Repairable { tag, value } => {
            let value = display_value(&value);
            if options.dry_run {
                info!(
                    "[dry-run] {}: would set {} from '{}' ({})",
                    path.display(),
                    policy.target(),
                    tag,
                    value
                );
                return report(path, FileStatus::DryRun, Some(tag));
            }
            info!("{}: {} <- {} ({})", path.display(), policy.target(), tag, value);
            // The tool copies the source tag as it is on disk at write time.
            match tool
                .write_tag(&path, policy.target(), &tag, options.write_mode)
                .await
            {
                Ok(()) => report(path, FileStatus::Processed, Some(tag)),
                Err(err) => {
                    error!("failed to write {}: {} | {}", policy.target(), err, path.display());
                    report(path, FileStatus::Error, Some(err.to_string()))
                }
            }
        }
    }
}

fn report(path: PathBuf, status: FileStatus, detail: Option<String>) -> FileReport {
    FileReport {
        path,
        status,
        detail,
    }
}
