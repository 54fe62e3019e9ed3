//! Error types for pdfmerge.
//!
//! Every failure the collection, the orchestrator or the session can raise is
//! a [`MergeError`]. Failures inside the document engine are reported as
//! [`EngineError`] and folded into a [`MergeError`] by the orchestrator.
//!
//! # Error Categories
//!
//! - **Collection Errors**: rejected files, stale list indices
//! - **Job Errors**: too few files, unreadable or unparsable sources, engine failures
//! - **Session Errors**: a merge already in progress, invalid configuration

use std::io;

/// Result type alias for pdfmerge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Main error type for pdfmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// None of the files submitted to the collection were PDFs.
    #[error("Only PDF files can be added\n  Hint: files are accepted by their declared type (application/pdf)")]
    NoValidFiles,

    /// A list position did not refer to an entry of the collection.
    #[error("Index {index} is out of range for a collection of {len} file(s)")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Collection length at the time of the request.
        len: usize,
    },

    /// A merge was requested with fewer than two files.
    #[error("At least 2 PDF files are required to merge, found {count}")]
    InsufficientFiles {
        /// Number of files in the snapshot.
        count: usize,
    },

    /// A source could not be interpreted as a PDF document.
    #[error("Failed to parse PDF: {name}\n  Reason: {reason}")]
    ParseFailure {
        /// Display name of the offending source.
        name: String,
        /// Underlying cause reported by the engine.
        reason: String,
    },

    /// A source's bytes could not be read.
    #[error("Failed to read file: {name}\n  Reason: {source}")]
    ReadFailure {
        /// Display name of the source.
        name: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The engine failed while copying pages or serializing the output.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// A merge job is already running for this session.
    #[error("A merge is already in progress")]
    Busy,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

/// Errors raised by a [`DocumentEngine`](crate::engine::DocumentEngine).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The input bytes are not a usable PDF.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The document is encrypted.
    #[error("document is encrypted")]
    Encrypted,

    /// A page index does not exist in the source document.
    #[error("page index {index} is out of range for a document of {count} page(s)")]
    PageOutOfRange {
        /// Requested zero-based page index.
        index: usize,
        /// Number of pages in the source.
        count: usize,
    },

    /// The output document has no pages to serialize.
    #[error("output document has no pages")]
    EmptyOutput,

    /// The document structure is not what the engine expects.
    #[error("invalid document structure: {0}")]
    Structure(String),

    /// Error raised by lopdf.
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),

    /// Failed to write the serialized document.
    #[error("failed to write document: {0}")]
    Io(#[from] io::Error),
}

impl MergeError {
    /// Create an IndexOutOfRange error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a ParseFailure error.
    pub fn parse_failure(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::ParseFailure {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl ToString) -> Self {
        Self::MergeFailed {
            reason: reason.to_string(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Check if this error is meant to be shown to the user and recovered from.
    pub fn is_user_facing(&self) -> bool {
        !self.is_defect()
    }

    /// Check if this error indicates a programming defect.
    ///
    /// A stale index means the presentation layer is out of sync with the
    /// collection.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// Check if this error aborted a merge job.
    pub fn is_job_failure(&self) -> bool {
        matches!(
            self,
            Self::ParseFailure { .. } | Self::ReadFailure { .. } | Self::MergeFailed { .. }
        )
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoValidFiles => 2,
            Self::IndexOutOfRange { .. } => 70, // EX_SOFTWARE
            Self::InsufficientFiles { .. } => 1,
            Self::ParseFailure { .. } => 3,
            Self::ReadFailure { .. } => 2,
            Self::MergeFailed { .. } => 6,
            Self::Busy => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Io { .. } => 5,
        }
    }
}
