//! Integration tests for the file collection.

use pdfmerge::{FileCollection, MergeError};

use crate::common::{pdf_source, text_source};

fn names(collection: &FileCollection) -> Vec<&str> {
    collection.iter().map(|f| f.name()).collect()
}

#[test]
fn test_add_keeps_only_pdfs() {
    let mut collection = FileCollection::new();
    let added = collection
        .add(vec![pdf_source("A.pdf", 1, 1), text_source("B.txt")])
        .expect("Add failed");

    assert_eq!(added, 1);
    assert_eq!(names(&collection), vec!["A.pdf"]);
}

#[test]
fn test_add_without_pdfs_is_rejected() {
    let mut collection = FileCollection::new();
    collection.add(vec![pdf_source("A.pdf", 1, 1)]).unwrap();

    let err = collection.add(vec![text_source("C.txt")]).unwrap_err();

    assert!(matches!(err, MergeError::NoValidFiles));
    assert_eq!(names(&collection), vec!["A.pdf"]);
}

#[test]
fn test_reorder_then_remove() {
    let mut collection = FileCollection::new();
    collection
        .add(vec![
            pdf_source("A.pdf", 1, 1),
            pdf_source("B.pdf", 2, 1),
            pdf_source("C.pdf", 3, 1),
        ])
        .unwrap();

    assert!(collection.move_to(2, 0));
    assert_eq!(names(&collection), vec!["C.pdf", "A.pdf", "B.pdf"]);

    assert!(!collection.move_to(0, 3));
    assert_eq!(names(&collection), vec!["C.pdf", "A.pdf", "B.pdf"]);

    let removed = collection.remove_at(1).unwrap();
    assert_eq!(removed.name(), "A.pdf");
    assert_eq!(names(&collection), vec!["C.pdf", "B.pdf"]);

    collection.clear();
    assert!(collection.is_empty());
}

#[test]
fn test_same_file_can_be_added_twice() {
    let mut collection = FileCollection::new();
    collection.add(vec![pdf_source("A.pdf", 1, 1)]).unwrap();
    collection.add(vec![pdf_source("A.pdf", 1, 1)]).unwrap();

    assert_eq!(collection.len(), 2);
}
