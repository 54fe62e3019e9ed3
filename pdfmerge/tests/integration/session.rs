//! Integration tests for the session command interface.

use pdfmerge::{Command, MergeError, MergeOptions, MergeSession, StatusLevel};

use crate::common::{page_tags, pdf_source, text_source};

#[tokio::test]
async fn test_full_session_flow() {
    let mut session = MergeSession::new(MergeOptions::default()).unwrap();
    assert!(!session.can_merge());

    session
        .apply(Command::AddFiles(vec![
            pdf_source("A.pdf", 1, 2),
            text_source("notes.txt"),
        ]))
        .unwrap();
    assert!(!session.can_merge());

    session
        .apply(Command::AddFiles(vec![pdf_source("B.pdf", 2, 1), pdf_source("C.pdf", 3, 1)]))
        .unwrap();
    assert!(session.can_merge());

    session.apply(Command::MoveUp(2)).unwrap();
    session.apply(Command::RemoveAt(0)).unwrap();

    let view = session.view();
    let names: Vec<_> = view.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["C.pdf", "B.pdf"]);

    let merged = session.start_merge(Some("final"), |_| {}).await.unwrap();

    assert_eq!(merged.file_name, "final.pdf");
    assert_eq!(page_tags(&merged.bytes), vec![301, 201]);
    assert_eq!(session.status().level, StatusLevel::Success);
    assert_eq!(session.view().count, 2, "collection survives the merge");
}

#[tokio::test]
async fn test_session_recovers_after_failed_merge() {
    let mut session = MergeSession::new(MergeOptions::default()).unwrap();
    session
        .apply(Command::AddFiles(vec![pdf_source("A.pdf", 1, 1)]))
        .unwrap();

    let err = session.start_merge(None, |_| {}).await.unwrap_err();
    assert!(matches!(err, MergeError::InsufficientFiles { .. }));
    assert_eq!(session.status().level, StatusLevel::Error);

    session
        .apply(Command::AddFiles(vec![pdf_source("B.pdf", 2, 1)]))
        .unwrap();
    let merged = session.start_merge(None, |_| {}).await.unwrap();
    assert_eq!(page_tags(&merged.bytes), vec![101, 201]);
}
