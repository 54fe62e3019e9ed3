//! pdfmerge - Combine an ordered list of PDF files into a single document.
//!
//! The library keeps the user's file list, merges it page by page in list
//! order, and reports progress while it does so. It provides:
//!
//! - An ordered file collection that only accepts PDFs
//! - A sequential merge orchestrator with progress events
//! - A pluggable document engine, with a lopdf implementation
//! - A session type that shells drive with commands
//!
//! # Examples
//!
//! ## Merging files directly
//!
//! ```no_run
//! use pdfmerge::{MergeOptions, Merger, SourceFile};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sources = vec![SourceFile::from_path("a.pdf"), SourceFile::from_path("b.pdf")];
//! let merged = Merger::new(MergeOptions::default())
//!     .merge(&sources, None, |_| {})
//!     .await?;
//! println!("{} pages -> {}", merged.statistics.total_pages, merged.file_name);
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving a session
//!
//! ```no_run
//! use pdfmerge::{Command, MergeOptions, MergeSession, SourceFile};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = MergeSession::new(MergeOptions::default())?;
//! session.apply(Command::AddFiles(vec![
//!     SourceFile::from_path("cover.pdf"),
//!     SourceFile::from_path("body.pdf"),
//! ]))?;
//! session.apply(Command::MoveDown(0))?;
//!
//! let merged = session
//!     .start_merge(Some("report"), |p| println!("{}%", p.percent))
//!     .await?;
//! std::fs::write(&merged.file_name, &merged.bytes)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod session;
pub mod source;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use collection::FileCollection;
pub use config::{CompressionLevel, MergeOptions, Metadata, OutputName};
pub use engine::{DocumentEngine, LopdfEngine};
pub use error::{EngineError, MergeError, Result};
pub use merge::{MergeStatistics, MergedDocument, Merger, Phase, ProgressState};
pub use session::{Command, MergeSession, SessionView, StatusLevel, StatusMessage};
pub use source::{PDF_MEDIA_TYPE, SourceFile};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
