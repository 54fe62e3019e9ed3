//! Saving merged documents to disk.
//!
//! Writes are atomic: bytes go to a temporary file next to the target,
//! which is then renamed into place.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::cli::OverwriteMode;

/// Errors raised while saving the merged file.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Output file exists and overwriting is not allowed.
    #[error("Output file already exists: {path} (use --force to overwrite)")]
    OutputExists {
        /// Existing file.
        path: PathBuf,
    },

    /// The user declined to overwrite the output.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Failed to write the output.
    #[error("Failed to write output file {path}: {source}")]
    FailedToWrite {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::OutputExists { .. } => 4,
            Self::Cancelled => 130,
            Self::FailedToWrite { .. } => 5,
        }
    }
}

/// Result of checking the target path before merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Safe to write.
    Ready(PathBuf),
    /// The file exists and the user must confirm the overwrite.
    NeedsConfirmation(PathBuf),
}

/// Directory and overwrite policy for merged output.
#[derive(Debug, Clone)]
pub struct OutputTarget {
    dir: PathBuf,
    mode: OverwriteMode,
}

impl OutputTarget {
    /// Create a target writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>, mode: OverwriteMode) -> Self {
        Self {
            dir: dir.into(),
            mode,
        }
    }

    /// Full path for a merged file name.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Decide whether `file_name` can be written under the overwrite policy.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::OutputExists`] in no-clobber mode when the
    /// file exists.
    pub async fn check(&self, file_name: &str) -> Result<Destination, WriteError> {
        let path = self.path_for(file_name);

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(Destination::Ready(path));
        }

        match self.mode {
            OverwriteMode::Force => Ok(Destination::Ready(path)),
            OverwriteMode::NoClobber => Err(WriteError::OutputExists { path }),
            OverwriteMode::Prompt => Ok(Destination::NeedsConfirmation(path)),
        }
    }
}

/// Atomically write `bytes` to `path`, creating parent directories.
///
/// Returns the number of bytes written.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<u64, WriteError> {
    let failed = |source| WriteError::FailedToWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(failed)?;
    }

    let temp_path = temp_path_for(path);
    let result = async {
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, path).await
    }
    .await;

    if let Err(err) = result {
        let _ = fs::remove_file(&temp_path).await;
        return Err(failed(err));
    }

    debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(bytes.len() as u64)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
