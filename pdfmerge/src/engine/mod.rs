//! Document engine seam.
//!
//! The merge orchestrator never touches PDF structure itself. It drives a
//! [`DocumentEngine`], which parses sources, copies pages into an output
//! document and serializes the result. [`LopdfEngine`] is the production
//! implementation.

mod info;
mod pdf;

pub use info::format_pdf_date;
pub use pdf::{LopdfEngine, OutputDocument};

use crate::error::EngineError;

/// Page-level document manipulation used by the merge orchestrator.
///
/// Output pages appear in the order they are passed to [`append`].
///
/// [`append`]: DocumentEngine::append
pub trait DocumentEngine {
    /// Document being assembled.
    type Output;
    /// Parsed source document.
    type Source;
    /// Reference to a page copied into an output document.
    type Page;

    /// Create a new output document with no pages.
    fn create_empty(&self) -> Result<Self::Output, EngineError>;

    /// Parse a source document from raw bytes.
    fn parse(&self, bytes: &[u8]) -> Result<Self::Source, EngineError>;

    /// Zero-based indices of every page of `source`, in document order.
    fn page_indices(&self, source: &Self::Source) -> Vec<usize>;

    /// Copy the pages at `indices` from `source` into `output`.
    ///
    /// The returned pages belong to `output` but are not part of its page
    /// sequence until appended.
    fn copy_pages(
        &self,
        output: &mut Self::Output,
        source: Self::Source,
        indices: &[usize],
    ) -> Result<Vec<Self::Page>, EngineError>;

    /// Append a copied page to the end of the output's page sequence.
    fn append(&self, output: &mut Self::Output, page: Self::Page) -> Result<(), EngineError>;

    /// Serialize the output document.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::EmptyOutput`] if no page was appended.
    fn serialize(&self, output: &mut Self::Output) -> Result<Vec<u8>, EngineError>;
}
