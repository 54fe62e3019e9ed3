//! Operations shared by batch mode and the interactive shell.

use anyhow::{Context, Result};
use pdfmerge::utils::format_file_size;
use pdfmerge::{Command, MergeSession, SourceFile};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::output::{MergeReport, OutputFormatter, ProgressBar, ProgressStyle, display_statistics};
use crate::writer::{Destination, OutputTarget, WriteError, write_atomic};

/// Add files by path, warning about anything that is not a PDF.
///
/// # Errors
///
/// Fails with `NoValidFiles` when none of the paths is a PDF. The session
/// status describes the outcome either way.
pub fn add_paths(
    session: &mut MergeSession,
    paths: Vec<PathBuf>,
    formatter: &OutputFormatter,
) -> pdfmerge::Result<usize> {
    let offered = paths.len();
    let before = session.collection().len();

    let files = paths.into_iter().map(SourceFile::from_path).collect();
    let result = session.apply(Command::AddFiles(files));

    let added = session.collection().len() - before;
    if added < offered {
        formatter.warning(&format!(
            "Skipped {} file(s) that are not PDFs",
            offered - added
        ));
    }

    result?;
    formatter.status(session.status());
    Ok(added)
}

/// Whether a prompt answer means yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Resolve where to write `file_name`, asking on stdin when the file exists.
///
/// # Errors
///
/// Fails when overwriting is refused by policy or by the user. In quiet
/// mode there is nobody to ask, so an existing file is never overwritten.
pub async fn confirm_destination(
    target: &OutputTarget,
    file_name: &str,
    formatter: &OutputFormatter,
) -> Result<PathBuf> {
    match target.check(file_name).await? {
        Destination::Ready(path) => Ok(path),
        Destination::NeedsConfirmation(path) => {
            if formatter.is_quiet() {
                return Err(WriteError::OutputExists { path }.into());
            }

            formatter.warning(&format!("Output file already exists: {}", path.display()));
            print!("Overwrite? [y/N]: ");
            std::io::stdout().flush().ok();

            let mut response = String::new();
            std::io::stdin()
                .read_line(&mut response)
                .context("Failed to read input")?;

            if is_yes(&response) {
                Ok(path)
            } else {
                Err(WriteError::Cancelled.into())
            }
        }
    }
}

/// Merge the session's files and write the result to `path`.
///
/// Progress is drawn on the terminal unless output is suppressed. With
/// `json`, a [`MergeReport`] is printed on stdout once the file is saved.
///
/// # Errors
///
/// Returns the merge error, or a [`WriteError`] if saving fails.
pub async fn merge_and_save(
    session: &mut MergeSession,
    output_name: Option<&str>,
    path: &Path,
    formatter: &OutputFormatter,
    json: bool,
) -> Result<()> {
    let mut progress = if formatter.should_print() {
        ProgressBar::new(ProgressStyle::Bar)
    } else {
        ProgressBar::disabled()
    };

    let result = session
        .start_merge(output_name, |state| progress.update(state))
        .await;

    let merged = match result {
        Ok(merged) => {
            progress.finish();
            merged
        }
        Err(err) => {
            progress.clear();
            return Err(err.into());
        }
    };

    formatter.debug(&format!(
        "Writing {} ({} pages)",
        path.display(),
        merged.statistics.total_pages
    ));
    let written = write_atomic(path, &merged.bytes).await?;

    formatter.status(session.status());
    formatter.success(&format!(
        "Saved {} ({})",
        path.display(),
        format_file_size(written)
    ));
    display_statistics(formatter, &merged.statistics);

    if json {
        let view = session.view();
        let report = MergeReport::new(path, &view, &merged.statistics);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
