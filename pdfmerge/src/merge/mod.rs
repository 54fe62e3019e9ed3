//! PDF merging.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::merge::Merger;
//! use pdfmerge::{MergeOptions, SourceFile};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sources = vec![
//!     SourceFile::from_path("a.pdf"),
//!     SourceFile::from_path("b.pdf"),
//! ];
//!
//! let merger = Merger::new(MergeOptions::default());
//! let merged = merger
//!     .merge(&sources, Some("bundle"), |p| println!("{}% {}", p.percent, p.label()))
//!     .await?;
//! std::fs::write(&merged.file_name, &merged.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod merger;
pub mod progress;

pub use merger::{MIN_SOURCES, MergeStatistics, MergedDocument, Merger, merge_sources};
pub use progress::{Phase, ProgressState};
