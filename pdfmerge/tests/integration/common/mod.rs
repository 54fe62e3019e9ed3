//! Shared helpers for integration tests.
//!
//! Fixtures are generated in memory with lopdf so the tests need no binary
//! files on disk.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};
use pdfmerge::SourceFile;
use std::path::{Path, PathBuf};

/// Build a PDF with `pages` pages.
///
/// Each page's MediaBox width is `tag * 100 + page_number`, which lets tests
/// read the page order back out of a merged document.
pub fn build_pdf(tag: u32, pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for page in 1..=pages {
        let label = tag * 100 + page;
        let content = format!("BT 72 720 Td (page {label}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), Object::Integer(label as i64), 842.into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(pages as i64),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("Failed to serialize fixture");
    buffer
}

/// In-memory PDF source.
pub fn pdf_source(name: &str, tag: u32, pages: u32) -> SourceFile {
    SourceFile::pdf(name, build_pdf(tag, pages))
}

/// In-memory source with a non-PDF media type.
pub fn text_source(name: &str) -> SourceFile {
    SourceFile::from_bytes(name, "text/plain", b"plain text".to_vec())
}

/// Write a fixture PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, tag: u32, pages: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(tag, pages)).expect("Failed to write fixture");
    path
}

/// Page tags of a merged document, in page order.
pub fn page_tags(bytes: &[u8]) -> Vec<u32> {
    let doc = Document::load_mem(bytes).expect("Merged output does not parse");
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_dictionary(id).expect("Missing page dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("Page has no MediaBox");
            match &media_box[2] {
                Object::Integer(w) => *w as u32,
                Object::Real(w) => *w as u32,
                other => panic!("Unexpected MediaBox width: {other:?}"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_roundtrip() {
        assert_eq!(page_tags(&build_pdf(4, 3)), vec![401, 402, 403]);
    }
}
