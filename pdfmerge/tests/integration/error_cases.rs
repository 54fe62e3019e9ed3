//! Integration tests for error handling.

use pdfmerge::{MergeError, MergeOptions, Merger, SourceFile};
use tempfile::TempDir;

use crate::common::pdf_source;

#[tokio::test]
async fn test_merge_with_single_source_is_rejected() {
    let sources = vec![pdf_source("a.pdf", 1, 1)];
    let mut events = 0;

    let err = Merger::new(MergeOptions::default())
        .merge(&sources, None, |_| events += 1)
        .await
        .unwrap_err();

    assert!(matches!(err, MergeError::InsufficientFiles { count: 1 }));
    assert_eq!(events, 0, "no progress should be reported");
}

#[tokio::test]
async fn test_merge_with_no_sources_is_rejected() {
    let err = Merger::new(MergeOptions::default())
        .merge(&[], None, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, MergeError::InsufficientFiles { count: 0 }));
}

#[tokio::test]
async fn test_corrupt_middle_source_aborts_job() {
    let sources = vec![
        pdf_source("one.pdf", 1, 1),
        SourceFile::pdf("two.pdf", b"%PDF-1.4 garbage".to_vec()),
        pdf_source("three.pdf", 3, 1),
    ];
    let mut percents = Vec::new();

    let err = Merger::new(MergeOptions::default())
        .merge(&sources, None, |p| percents.push(p.percent))
        .await
        .unwrap_err();

    match err {
        MergeError::ParseFailure { name, .. } => assert_eq!(name, "two.pdf"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(percents, vec![0, 33], "progress must stop at the failing source");
}

#[tokio::test]
async fn test_missing_file_is_read_failure() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let sources = vec![
        pdf_source("a.pdf", 1, 1),
        SourceFile::from_path(dir.path().join("missing.pdf")),
    ];

    let err = Merger::new(MergeOptions::default())
        .merge(&sources, None, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, MergeError::ReadFailure { ref name, .. } if name == "missing.pdf"));
    assert!(err.is_job_failure());
}

#[tokio::test]
async fn test_sources_without_pages_fail_at_serialization() {
    let sources = vec![pdf_source("blank1.pdf", 1, 0), pdf_source("blank2.pdf", 2, 0)];
    let mut percents = Vec::new();

    let err = Merger::new(MergeOptions::default())
        .merge(&sources, None, |p| percents.push(p.percent))
        .await
        .unwrap_err();

    assert!(matches!(err, MergeError::MergeFailed { ref reason } if reason.contains("no pages")));
    assert_eq!(&percents[..3], &[0, 50, 100], "both sources are parsed before failing");
}

#[test]
fn test_exit_codes_are_distinct_for_user_errors() {
    let no_files = MergeError::NoValidFiles.exit_code();
    let parse = MergeError::parse_failure("x.pdf", "bad header").exit_code();
    let merge = MergeError::merge_failed("boom").exit_code();

    assert_ne!(no_files, 0);
    assert_ne!(parse, merge);
}
