use exfix_core::models::BatchTally;

/// Plain-text summary printed once the batch is finished.
pub fn render_summary(tally: &BatchTally, dry_run: bool) -> String {
    let mut lines = vec![format!("Finished processing {} files:", tally.total)];
    if dry_run {
        lines.push(format!("    {} dry-run processed", tally.dry_run_processed));
    } else {
        lines.push(format!("    {} processed", tally.processed));
    }
    lines.push(format!("    {} skipped", tally.skipped));
    lines.push(format!("    {} missing tags, unable to fix", tally.missing_tag));
    lines.push(format!("    {} failed to fix (see errors detail)", tally.error));
    lines.join("\n")
}

pub fn render_json(tally: &BatchTally, dry_run: bool) -> serde_json::Result<String> {
    let summary = serde_json::json!({
        "status": "ok",
        "dry_run": dry_run,
        "total": tally.total,
        "processed": tally.processed,
        "dry_run_processed": tally.dry_run_processed,
        "skipped": tally.skipped,
        "missing_tag": tally.missing_tag,
        "error": tally.error,
    });
    serde_json::to_string_pretty(&summary)
}
