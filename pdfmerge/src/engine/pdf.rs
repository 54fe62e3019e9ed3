//! lopdf-backed document engine.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::time::SystemTime;
use tracing::{debug, trace};

use super::DocumentEngine;
use super::info::write_info;
use crate::config::{CompressionLevel, MergeOptions, Metadata};
use crate::error::EngineError;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Output document under construction.
#[derive(Debug)]
pub struct OutputDocument {
    document: Document,
    pages_id: ObjectId,
    page_count: usize,
}

impl OutputDocument {
    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// The underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// [`DocumentEngine`] built on lopdf.
#[derive(Debug, Clone)]
pub struct LopdfEngine {
    pdf_version: String,
    compression: CompressionLevel,
    metadata: Metadata,
}

impl LopdfEngine {
    /// Create an engine with default options.
    pub fn new() -> Self {
        Self::from_options(&MergeOptions::default())
    }

    /// Create an engine that writes documents according to `options`.
    pub fn from_options(options: &MergeOptions) -> Self {
        Self {
            pdf_version: options.pdf_version.clone(),
            compression: options.compression,
            metadata: options.metadata.clone(),
        }
    }
}

impl Default for LopdfEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentEngine for LopdfEngine {
    type Output = OutputDocument;
    type Source = Document;
    type Page = ObjectId;

    fn create_empty(&self) -> Result<OutputDocument, EngineError> {
        let mut document = Document::with_version(self.pdf_version.as_str());

        let pages_id = document.add_object(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => Object::Array(vec![]),
            "Count" => Object::Integer(0),
        });
        let catalog_id = document.add_object(dictionary! {
            "Type" => Object::Name(b"Catalog".to_vec()),
            "Pages" => Object::Reference(pages_id),
        });
        document.trailer.set("Root", Object::Reference(catalog_id));

        Ok(OutputDocument {
            document,
            pages_id,
            page_count: 0,
        })
    }

    fn parse(&self, bytes: &[u8]) -> Result<Document, EngineError> {
        let document =
            Document::load_mem(bytes).map_err(|e| EngineError::Malformed(e.to_string()))?;

        if document.is_encrypted() {
            return Err(EngineError::Encrypted);
        }

        trace!(objects = document.objects.len(), version = %document.version, "parsed source");
        Ok(document)
    }

    fn page_indices(&self, source: &Document) -> Vec<usize> {
        (0..source.get_pages().len()).collect()
    }

    fn copy_pages(
        &self,
        output: &mut OutputDocument,
        mut source: Document,
        indices: &[usize],
    ) -> Result<Vec<ObjectId>, EngineError> {
        // Move the source's ids above everything already in the output.
        source.renumber_objects_with(output.document.max_id + 1);

        let pages: Vec<ObjectId> = source.get_pages().into_values().collect();
        let selected = indices
            .iter()
            .map(|&index| {
                pages.get(index).copied().ok_or(EngineError::PageOutOfRange {
                    index,
                    count: pages.len(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for &page_id in &selected {
            flatten_inherited_attributes(&mut source, page_id)?;
        }

        output.document.max_id = output.document.max_id.max(source.max_id);
        output.document.objects.extend(
            source
                .objects
                .into_iter()
                .filter(|(_, object)| !is_catalog(object)),
        );

        debug!(pages = selected.len(), "copied pages into output");
        Ok(selected)
    }

    fn append(&self, output: &mut OutputDocument, page: ObjectId) -> Result<(), EngineError> {
        output
            .document
            .get_dictionary_mut(page)?
            .set("Parent", Object::Reference(output.pages_id));

        let pages = output.document.get_dictionary_mut(output.pages_id)?;
        pages
            .get_mut(b"Kids")?
            .as_array_mut()
            .map_err(|_| EngineError::Structure("Kids is not an array".to_string()))?
            .push(Object::Reference(page));

        let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        pages.set("Count", Object::Integer(count + 1));

        output.page_count += 1;
        Ok(())
    }

    fn serialize(&self, output: &mut OutputDocument) -> Result<Vec<u8>, EngineError> {
        if output.page_count == 0 {
            return Err(EngineError::EmptyOutput);
        }

        let document = &mut output.document;
        write_info(document, &self.metadata, SystemTime::now())?;

        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => document.compress(),
            CompressionLevel::Maximum => {
                document.compress();
                let pruned = document.prune_objects();
                trace!(pruned = pruned.len(), "pruned unreachable objects");
            }
        }
        document.renumber_objects();

        let mut buffer = Vec::new();
        document.save_to(&mut buffer)?;
        debug!(bytes = buffer.len(), pages = output.page_count, "serialized output");
        Ok(buffer)
    }
}

fn is_catalog(object: &Object) -> bool {
    object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name)
        .map(|name| name == b"Catalog")
        .unwrap_or(false)
}

/// Copy inheritable attributes from the page's ancestors onto the page.
///
/// The page is re-parented under the output page tree, so anything it used
/// to inherit has to live on the page itself.
fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> Result<(), EngineError> {
    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();

    {
        let page = doc.get_dictionary(page_id)?;
        let mut missing: Vec<&[u8]> = INHERITABLE
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();
        let mut parent = parent_of(page);
        let mut depth = 0;

        while let Some(parent_id) = parent {
            if missing.is_empty() || depth >= MAX_TREE_DEPTH {
                break;
            }

            let node = doc.get_dictionary(parent_id)?;
            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((key.to_vec(), value.clone()));
                    false
                }
                Err(_) => true,
            });

            parent = parent_of(node);
            depth += 1;
        }
    }

    if !inherited.is_empty() {
        let page = doc.get_dictionary_mut(page_id)?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }

    Ok(())
}

fn parent_of(node: &Dictionary) -> Option<ObjectId> {
    node.get(b"Parent").and_then(Object::as_reference).ok()
}
