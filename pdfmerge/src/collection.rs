//! Ordered collection of source files.
//!
//! Position in the collection is the only identity a file has, and the
//! collection order is the merge order. Duplicates are allowed.

use tracing::{debug, warn};

use crate::error::{MergeError, Result};
use crate::source::SourceFile;

/// Source files in merge order.
#[derive(Debug, Clone, Default)]
pub struct FileCollection {
    files: Vec<SourceFile>,
}

impl FileCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every PDF from `files`, keeping their relative order.
    ///
    /// Non-PDF files are skipped. Partial acceptance is a success.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::NoValidFiles`] if nothing was accepted; the
    /// collection is left unchanged.
    pub fn add<I>(&mut self, files: I) -> Result<usize>
    where
        I: IntoIterator<Item = SourceFile>,
    {
        let (accepted, rejected): (Vec<_>, Vec<_>) =
            files.into_iter().partition(SourceFile::is_pdf);

        for file in &rejected {
            warn!(name = file.name(), media_type = file.media_type(), "skipping non-PDF file");
        }

        if accepted.is_empty() {
            return Err(MergeError::NoValidFiles);
        }

        let count = accepted.len();
        self.files.extend(accepted);
        debug!(added = count, len = self.files.len(), "files added");
        Ok(count)
    }

    /// Remove the file at `index`, shifting later files down by one.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::IndexOutOfRange`] if `index` is not a valid
    /// position; the collection is left unchanged.
    pub fn remove_at(&mut self, index: usize) -> Result<SourceFile> {
        if index >= self.files.len() {
            return Err(MergeError::index_out_of_range(index, self.files.len()));
        }

        let removed = self.files.remove(index);
        debug!(index, name = removed.name(), len = self.files.len(), "file removed");
        Ok(removed)
    }

    /// Move the file at `index` to `new_index`.
    ///
    /// This removes the file and reinserts it, so files between the two
    /// positions shift by one slot. It is not a swap. Returns `false` without
    /// touching the collection when either position is out of range.
    pub fn move_to(&mut self, index: usize, new_index: usize) -> bool {
        let len = self.files.len();
        if new_index >= len || index >= len {
            return false;
        }

        let file = self.files.remove(index);
        self.files.insert(new_index, file);
        debug!(from = index, to = new_index, "file moved");
        true
    }

    /// Remove every file.
    pub fn clear(&mut self) {
        self.files.clear();
        debug!("collection cleared");
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// File at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&SourceFile> {
        self.files.get(index)
    }

    /// Files in merge order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    /// Files in merge order as a slice.
    pub fn as_slice(&self) -> &[SourceFile] {
        &self.files
    }

    /// Copy of the current order, handed to a merge job.
    pub fn snapshot(&self) -> Vec<SourceFile> {
        self.files.clone()
    }
}
