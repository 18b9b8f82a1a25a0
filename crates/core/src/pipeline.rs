use crate::batch::{self, BatchOptions};
use crate::config::AppConfig;
use crate::exiftool::{Exiftool, MetadataTool, WriteMode};
use crate::models::BatchTally;
use crate::resolver::TagPolicy;
use crate::scanner;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

impl From<&AppConfig> for BatchOptions {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            workers: cfg.batch.workers,
            dry_run: cfg.batch.dry_run,
            write_mode: WriteMode::from_backup(cfg.batch.backup),
        }
    }
}

pub async fn run(config: &AppConfig, source_dir: &Path) -> anyhow::Result<BatchTally> {
    let tool: Arc<dyn MetadataTool> = Arc::new(Exiftool::new(&config.exiftool));
    run_with_tool(config, source_dir, tool).await
}

/// Scans `source_dir` and repairs every supported file with the given tool.
pub async fn run_with_tool(
    config: &AppConfig,
    source_dir: &Path,
    tool: Arc<dyn MetadataTool>,
) -> anyhow::Result<BatchTally> {
    let scan_cfg = config.scan.clone();
    let root = source_dir.to_path_buf();
    let files = tokio::task::spawn_blocking(move || scanner::scan(&root, &scan_cfg))
        .await?
        .with_context(|| format!("scanning {}", source_dir.display()))?;
    info!("{} supported files.", files.len());

    let policy = Arc::new(TagPolicy::from(&config.tags));
    let options = BatchOptions::from(config);
    Ok(batch::run_batch(files, tool, policy, &options).await)
}
