//! Source documents selected by the user.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{MergeError, Result};

/// Media type that marks a file as a PDF.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Media type declared for files whose extension is not recognized.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Where the bytes of a source live.
#[derive(Debug, Clone)]
pub enum SourceContent {
    /// Bytes already held in memory.
    Memory(Arc<[u8]>),
    /// A file read when the merge job loads it.
    Path(PathBuf),
}

/// One user-supplied file.
///
/// The media type is whatever the caller declares; it is never derived from
/// the content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    media_type: String,
    content: SourceContent,
}

impl SourceFile {
    /// Create a source from in-memory bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            content: SourceContent::Memory(bytes.into()),
        }
    }

    /// Create a PDF source from in-memory bytes.
    pub fn pdf(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::from_bytes(name, PDF_MEDIA_TYPE, bytes)
    }

    /// Create a source backed by a file on disk.
    ///
    /// The display name is the file name and the media type is declared
    /// from the extension. Nothing is read until the merge job loads it.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            media_type: media_type_for_path(&path).to_string(),
            content: SourceContent::Path(path),
        }
    }

    /// Display name of the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Where the bytes live.
    pub fn content(&self) -> &SourceContent {
        &self.content
    }

    /// Whether the declared media type is exactly the PDF media type.
    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }

    /// Size in bytes when it is known without touching the disk.
    pub fn size_hint(&self) -> Option<u64> {
        match &self.content {
            SourceContent::Memory(bytes) => Some(bytes.len() as u64),
            SourceContent::Path(_) => None,
        }
    }

    /// Read the raw bytes of the source.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::ReadFailure`] if a path-backed source cannot be read.
    pub async fn read_bytes(&self) -> Result<Arc<[u8]>> {
        match &self.content {
            SourceContent::Memory(bytes) => Ok(Arc::clone(bytes)),
            SourceContent::Path(path) => tokio::fs::read(path)
                .await
                .map(Arc::from)
                .map_err(|source| MergeError::ReadFailure {
                    name: self.name.clone(),
                    source,
                }),
        }
    }
}

/// Declared media type for a path, by extension only.
pub fn media_type_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MEDIA_TYPE,
        _ => FALLBACK_MEDIA_TYPE,
    }
}
