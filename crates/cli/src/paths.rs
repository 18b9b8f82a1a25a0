use anyhow::{bail, Result};
use std::path::Path;

/// Fails unless `path` exists and is a directory.
pub fn validate_source_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        bail!("source_dir is not a folder or does not exist: {}", path.display());
    }
    Ok(())
}
