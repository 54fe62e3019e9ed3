//! Console output for pdfmerge.
//!
//! Status lines, the file list, the progress bar and the final report.
//! Diagnostics go through `tracing` instead.

pub mod formatter;
pub mod progress;

pub use formatter::OutputFormatter;
pub use progress::{ProgressBar, ProgressStyle};

use pdfmerge::{MergeStatistics, SessionView};
use serde::Serialize;
use std::path::Path;

/// Display the file list in merge order.
pub fn display_view(formatter: &OutputFormatter, view: &SessionView) {
    if view.entries.is_empty() {
        formatter.info("  (no files)");
        return;
    }

    for entry in &view.entries {
        formatter.list_item(entry.position, &entry.name);
    }
}

/// Display merge statistics (verbose mode only).
pub fn display_statistics(formatter: &OutputFormatter, stats: &MergeStatistics) {
    if !formatter.is_verbose() {
        return;
    }

    formatter.section("Statistics");
    formatter.detail("Input files", &stats.files_merged.to_string());
    formatter.detail("Total pages", &stats.total_pages.to_string());
    formatter.detail("Input size", &stats.format_input_size());
    formatter.detail("Output size", &stats.format_output_size());
    formatter.detail(
        "Merge time",
        &format!("{:.2}s", stats.merge_time.as_secs_f64()),
    );
}

/// Machine-readable summary printed with `--json`.
#[derive(Debug, Serialize)]
pub struct MergeReport<'a> {
    /// Where the merged file was written.
    pub output: &'a Path,
    /// Source names in merge order.
    pub files: Vec<&'a str>,
    /// Number of pages in the output.
    pub pages: usize,
    /// Size of the output in bytes.
    pub bytes: u64,
    /// Wall-clock merge time in milliseconds.
    pub merge_time_ms: u128,
}

impl<'a> MergeReport<'a> {
    /// Build a report for a finished merge.
    pub fn new(output: &'a Path, view: &'a SessionView, stats: &MergeStatistics) -> Self {
        Self {
            output,
            files: view.entries.iter().map(|e| e.name.as_str()).collect(),
            pages: stats.total_pages,
            bytes: stats.output_size,
            merge_time_ms: stats.merge_time.as_millis(),
        }
    }
}
