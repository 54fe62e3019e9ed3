//! Merge orchestration.
//!
//! A merge job walks a snapshot of the collection in order, loads each
//! source, copies all of its pages to the end of one output document and
//! finally serializes that document. Sources are processed strictly one after
//! another; the output page order is the concatenation of every source's
//! pages in collection order.

use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::config::MergeOptions;
use crate::engine::{DocumentEngine, LopdfEngine};
use crate::error::{MergeError, Result};
use crate::merge::progress::ProgressState;
use crate::source::SourceFile;
use crate::utils::format_file_size;

/// Minimum number of sources a merge job accepts.
pub const MIN_SOURCES: usize = 2;

/// Statistics about a merge operation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MergeStatistics {
    /// Number of sources merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of the source bytes.
    pub input_size: u64,

    /// Size of the merged document.
    pub output_size: u64,

    /// Wall time of the whole job.
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// A finished merge: the output bytes and the name to save them under.
#[derive(Debug, Clone)]
pub struct MergedDocument {
    /// File name including extension.
    pub file_name: String,

    /// Serialized PDF.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Runs merge jobs against a [`DocumentEngine`].
#[derive(Debug, Clone)]
pub struct Merger<E = LopdfEngine> {
    engine: E,
    options: MergeOptions,
}

impl Merger<LopdfEngine> {
    /// Create a merger backed by lopdf.
    pub fn new(options: MergeOptions) -> Self {
        let engine = LopdfEngine::from_options(&options);
        Self { engine, options }
    }
}

impl Default for Merger<LopdfEngine> {
    fn default() -> Self {
        Self::new(MergeOptions::default())
    }
}

impl<E: DocumentEngine> Merger<E> {
    /// Create a merger with a custom engine.
    pub fn with_engine(engine: E, options: MergeOptions) -> Self {
        Self { engine, options }
    }

    /// Options used for output naming.
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// The engine driving this merger.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Merge `sources` in order into a single document.
    ///
    /// `output_name` is the user-supplied base name; blank or missing falls
    /// back to the configured default. `on_progress` is called after each
    /// source has been copied, plus once at start, before serialization and
    /// at completion.
    ///
    /// # Errors
    ///
    /// - [`MergeError::InsufficientFiles`] if fewer than two sources are given;
    ///   no work is done.
    /// - [`MergeError::ReadFailure`] or [`MergeError::ParseFailure`] naming
    ///   the source that could not be loaded.
    /// - [`MergeError::MergeFailed`] for any other engine failure.
    ///
    /// Any failure aborts the job; no partial output is returned.
    pub async fn merge<F>(
        &self,
        sources: &[SourceFile],
        output_name: Option<&str>,
        mut on_progress: F,
    ) -> Result<MergedDocument>
    where
        F: FnMut(&ProgressState),
    {
        if sources.len() < MIN_SOURCES {
            return Err(MergeError::InsufficientFiles {
                count: sources.len(),
            });
        }

        let result = self.run(sources, output_name, &mut on_progress).await;
        if let Err(err) = &result {
            error!(error = %err, "merge failed");
        }
        result
    }

    async fn run<F>(
        &self,
        sources: &[SourceFile],
        output_name: Option<&str>,
        on_progress: &mut F,
    ) -> Result<MergedDocument>
    where
        F: FnMut(&ProgressState),
    {
        let start = Instant::now();
        let total = sources.len();
        info!(files = total, "merge started");
        on_progress(&ProgressState::starting(total));

        let mut output = self
            .engine
            .create_empty()
            .map_err(MergeError::merge_failed)?;

        let mut total_pages = 0;
        let mut input_size = 0;

        for (index, source) in sources.iter().enumerate() {
            let bytes = source.read_bytes().await?;
            input_size += bytes.len() as u64;

            let parsed = self
                .engine
                .parse(&bytes)
                .map_err(|e| MergeError::parse_failure(source.name(), e))?;

            let indices = self.engine.page_indices(&parsed);
            let pages = self
                .engine
                .copy_pages(&mut output, parsed, &indices)
                .map_err(|e| MergeError::merge_failed(format!("{}: {e}", source.name())))?;

            let page_count = pages.len();
            for page in pages {
                self.engine
                    .append(&mut output, page)
                    .map_err(|e| MergeError::merge_failed(format!("{}: {e}", source.name())))?;
            }
            total_pages += page_count;

            debug!(index, name = source.name(), pages = page_count, "source merged");
            on_progress(&ProgressState::processed(index, total, source.name()));
        }

        on_progress(&ProgressState::serializing());
        let bytes = self
            .engine
            .serialize(&mut output)
            .map_err(MergeError::merge_failed)?;

        let file_name = self.options.output_name(output_name).to_string();
        let statistics = MergeStatistics {
            files_merged: total,
            total_pages,
            input_size,
            output_size: bytes.len() as u64,
            merge_time: start.elapsed(),
        };

        on_progress(&ProgressState::complete(total));
        info!(
            files = total,
            pages = total_pages,
            output = %file_name,
            size = %statistics.format_output_size(),
            "merge finished"
        );

        Ok(MergedDocument {
            file_name,
            bytes,
            statistics,
        })
    }
}

/// Merge `sources` with the lopdf engine and default options.
pub async fn merge_sources(sources: &[SourceFile]) -> Result<MergedDocument> {
    Merger::default().merge(sources, None, |_| {}).await
}
