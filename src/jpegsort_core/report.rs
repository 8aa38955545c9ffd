use crate::jpegsort_core::sorter::{FileOutcome, SortReport};
use std::io::{self, Write};

/// Write the human-readable report: dry-run plan and skips to `out`,
/// failures to `err`, then the summary line to `out`.
pub fn write_text<WStd, WErr>(report: &SortReport, mut out: WStd, mut err: WErr) -> io::Result<()>
where
    WStd: Write,
    WErr: Write,
{
    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Planned {
                source,
                destination,
            } => writeln!(
                out,
                "[DRY RUN] {} -> {}",
                source.display(),
                destination.display()
            )?,
            FileOutcome::Skipped { source, reason } => {
                writeln!(out, "skipped: {}: {}", source.display(), reason)?
            }
            FileOutcome::Failed { source, reason } => {
                writeln!(err, "failed: {}: {}", source.display(), reason)?
            }
            FileOutcome::Copied { .. } => {}
        }
    }

    if report.dry_run {
        write!(out, "[DRY RUN] ")?;
    }
    writeln!(out, "{}", report.summary)
}

/// Serialize the full report as pretty-printed JSON.
pub fn to_json(report: &SortReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
