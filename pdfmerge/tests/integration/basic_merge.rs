//! Integration tests for basic merging.

use pdfmerge::{CompressionLevel, MergeOptions, Merger, Metadata, Phase, SourceFile};
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{page_tags, pdf_source, write_pdf};

#[tokio::test]
async fn test_merge_two_documents_in_order() {
    let sources = vec![pdf_source("A.pdf", 1, 3), pdf_source("B.pdf", 2, 2)];

    let merged = Merger::new(MergeOptions::default())
        .merge(&sources, None, |_| {})
        .await
        .expect("Merge failed");

    assert_eq!(page_tags(&merged.bytes), vec![101, 102, 103, 201, 202]);
    assert_eq!(merged.file_name, "merged_document.pdf");
    assert_eq!(merged.statistics.files_merged, 2);
    assert_eq!(merged.statistics.total_pages, 5);
}

#[tokio::test]
async fn test_source_without_pages_adds_nothing() {
    let sources = vec![pdf_source("A.pdf", 1, 1), pdf_source("blank.pdf", 2, 0)];

    let merged = Merger::new(MergeOptions::default())
        .merge(&sources, None, |_| {})
        .await
        .expect("Merge failed");

    assert_eq!(page_tags(&merged.bytes), vec![101]);
    assert_eq!(merged.statistics.files_merged, 2);
    assert_eq!(merged.statistics.total_pages, 1);
}

#[tokio::test]
async fn test_merge_reports_progress_per_source() {
    let sources = vec![
        pdf_source("a.pdf", 1, 1),
        pdf_source("b.pdf", 2, 1),
        pdf_source("c.pdf", 3, 1),
    ];

    let mut processed = Vec::new();
    Merger::new(MergeOptions::default())
        .merge(&sources, Some("out"), |p| {
            if let Phase::Processing { name, .. } = &p.phase {
                processed.push((name.clone(), p.percent));
            }
        })
        .await
        .expect("Merge failed");

    assert_eq!(
        processed,
        vec![
            ("a.pdf".to_string(), 33),
            ("b.pdf".to_string(), 67),
            ("c.pdf".to_string(), 100),
        ]
    );
}

#[tokio::test]
async fn test_merge_files_from_disk() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let first = write_pdf(dir.path(), "first.pdf", 1, 2);
    let second = write_pdf(dir.path(), "second.pdf", 2, 1);

    let sources = vec![SourceFile::from_path(second), SourceFile::from_path(first)];
    let merged = Merger::new(MergeOptions::default())
        .merge(&sources, Some("disk"), |_| {})
        .await
        .expect("Merge failed");

    assert_eq!(page_tags(&merged.bytes), vec![201, 101, 102]);
    assert_eq!(merged.file_name, "disk.pdf");
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
#[tokio::test]
async fn test_merge_with_each_compression_level(#[case] compression: CompressionLevel) {
    let options = MergeOptions {
        compression,
        metadata: Metadata::new(Some("Bundle".to_string()), Some("QA".to_string()), None, None),
        ..Default::default()
    };
    let sources = vec![pdf_source("a.pdf", 1, 2), pdf_source("b.pdf", 2, 2)];

    let merged = Merger::new(options)
        .merge(&sources, None, |_| {})
        .await
        .expect("Merge failed");

    assert_eq!(page_tags(&merged.bytes), vec![101, 102, 201, 202]);
}

#[rstest]
#[case(None, "merged_document.pdf")]
#[case(Some(""), "merged_document.pdf")]
#[case(Some("   "), "merged_document.pdf")]
#[case(Some("Q3 report"), "Q3 report.pdf")]
#[case(Some("report.pdf"), "report.pdf.pdf")]
#[tokio::test]
async fn test_output_name(#[case] input: Option<&str>, #[case] expected: &str) {
    let sources = vec![pdf_source("a.pdf", 1, 1), pdf_source("b.pdf", 2, 1)];

    let merged = Merger::new(MergeOptions::default())
        .merge(&sources, input, |_| {})
        .await
        .expect("Merge failed");

    assert_eq!(merged.file_name, expected);
}
