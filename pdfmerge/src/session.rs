//! Application session and command interface.
//!
//! A [`MergeSession`] is the state a presentation shell owns for the lifetime
//! of the application: the file collection, the merger and the status line.
//! The shell translates user input into [`Command`]s, re-renders from
//! [`MergeSession::view`] after each one, and starts merges with
//! [`MergeSession::start_merge`] (or [`begin_merge`]/[`finish_merge`] when it
//! drives the job itself).
//!
//! [`begin_merge`]: MergeSession::begin_merge
//! [`finish_merge`]: MergeSession::finish_merge

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

use crate::collection::FileCollection;
use crate::config::MergeOptions;
use crate::engine::{DocumentEngine, LopdfEngine};
use crate::error::{MergeError, Result};
use crate::merge::{MIN_SOURCES, MergedDocument, Merger, ProgressState};
use crate::source::SourceFile;

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    /// Idle, nothing noteworthy.
    Ready,
    /// The last merge succeeded.
    Success,
    /// The last action failed.
    Error,
    /// A merge is running.
    Progress,
}

/// Status line shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    /// Severity.
    pub level: StatusLevel,
    /// Text to display.
    pub text: String,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// A user action on the collection.
#[derive(Debug, Clone)]
pub enum Command {
    /// Add files; only PDFs are kept.
    AddFiles(Vec<SourceFile>),
    /// Remove the file at a position.
    RemoveAt(usize),
    /// Move a file to a new position.
    MoveTo {
        /// Current position.
        index: usize,
        /// Target position.
        new_index: usize,
    },
    /// Move a file one position towards the front.
    MoveUp(usize),
    /// Move a file one position towards the back.
    MoveDown(usize),
    /// Remove every file.
    Clear,
}

/// One row of the rendered file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    /// One-based position shown to the user.
    pub position: usize,
    /// Display name.
    pub name: String,
    /// Whether a move-up control should be enabled.
    pub can_move_up: bool,
    /// Whether a move-down control should be enabled.
    pub can_move_down: bool,
}

/// Everything a shell needs to render the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// Files in merge order.
    pub entries: Vec<EntryView>,
    /// Number of files.
    pub count: usize,
    /// Whether the merge trigger should be enabled.
    pub can_merge: bool,
    /// Current status line.
    pub status: StatusMessage,
}

/// A merge job detached from its session.
///
/// The session stays busy until the job is dropped, whether it ran to
/// completion or not.
pub struct MergeJob<E = LopdfEngine> {
    merger: Arc<Merger<E>>,
    sources: Vec<SourceFile>,
    output_name: Option<String>,
    busy: Arc<AtomicBool>,
}

impl<E: DocumentEngine> MergeJob<E> {
    /// Sources in the order they will be merged.
    pub fn sources(&self) -> &[SourceFile] {
        &self.sources
    }

    /// Run the job to completion or failure.
    pub async fn run<F>(self, on_progress: F) -> Result<MergedDocument>
    where
        F: FnMut(&ProgressState),
    {
        self.merger
            .merge(&self.sources, self.output_name.as_deref(), on_progress)
            .await
    }
}

impl<E> Drop for MergeJob<E> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Application state for one user session.
pub struct MergeSession<E = LopdfEngine> {
    collection: FileCollection,
    merger: Arc<Merger<E>>,
    status: StatusMessage,
    busy: Arc<AtomicBool>,
}

impl MergeSession<LopdfEngine> {
    /// Create a session backed by the lopdf engine.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` are invalid.
    pub fn new(options: MergeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::with_merger(Merger::new(options)))
    }
}

impl<E: DocumentEngine> MergeSession<E> {
    /// Create a session around an existing merger.
    pub fn with_merger(merger: Merger<E>) -> Self {
        let mut session = Self {
            collection: FileCollection::new(),
            merger: Arc::new(merger),
            status: StatusMessage::new(StatusLevel::Ready, ""),
            busy: Arc::new(AtomicBool::new(false)),
        };
        session.status = session.ready_message();
        session
    }

    /// Apply a user command to the collection.
    ///
    /// The status line is updated to describe the outcome.
    ///
    /// # Errors
    ///
    /// - [`MergeError::NoValidFiles`] if an add contained no PDF.
    /// - [`MergeError::IndexOutOfRange`] if a removal referred to a missing entry.
    ///
    /// Commands are accepted while a job runs; the job works on the snapshot
    /// taken when it began.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        debug!(?command, "applying command");
        let outcome = match command {
            Command::AddFiles(files) => self
                .collection
                .add(files)
                .map(|added| Some(format!("Added {added} PDF file(s) to the list."))),
            Command::RemoveAt(index) => self
                .collection
                .remove_at(index)
                .map(|_| Some("File removed from the list.".to_string())),
            Command::MoveTo { index, new_index } => Ok(self.reorder(index, new_index)),
            Command::MoveUp(index) => Ok(index
                .checked_sub(1)
                .and_then(|new_index| self.reorder(index, new_index))),
            Command::MoveDown(index) => Ok(self.reorder(index, index + 1)),
            Command::Clear => {
                self.collection.clear();
                Ok(Some("List cleared.".to_string()))
            }
        };

        match outcome {
            Ok(Some(text)) => {
                self.status = StatusMessage::new(StatusLevel::Ready, text);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                if err.is_defect() {
                    warn!(error = %err, "command referred to a stale index");
                }
                self.status = StatusMessage::new(StatusLevel::Error, err.to_string());
                Err(err)
            }
        }
    }

    fn reorder(&mut self, index: usize, new_index: usize) -> Option<String> {
        self.collection
            .move_to(index, new_index)
            .then(|| "Order changed.".to_string())
    }

    /// The file collection.
    pub fn collection(&self) -> &FileCollection {
        &self.collection
    }

    /// Current status line.
    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// Options used for merges.
    pub fn options(&self) -> &MergeOptions {
        self.merger.options()
    }

    /// Whether a merge job is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Whether the merge trigger should be enabled.
    pub fn can_merge(&self) -> bool {
        !self.is_busy() && self.collection.len() >= MIN_SOURCES
    }

    /// Idle status text for the current collection.
    pub fn ready_message(&self) -> StatusMessage {
        let count = self.collection.len();
        let text = if count >= MIN_SOURCES {
            format!("Ready to merge {count} files.")
        } else {
            format!("Add at least {MIN_SOURCES} PDF files to merge.")
        };
        StatusMessage::new(StatusLevel::Ready, text)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        let count = self.collection.len();
        let entries = self
            .collection
            .iter()
            .enumerate()
            .map(|(index, file)| EntryView {
                position: index + 1,
                name: file.name().to_string(),
                can_move_up: index > 0,
                can_move_down: index + 1 < count,
            })
            .collect();

        SessionView {
            entries,
            count,
            can_merge: self.can_merge(),
            status: self.status.clone(),
        }
    }

    /// Snapshot the collection into a job and mark the session busy.
    ///
    /// # Errors
    ///
    /// - [`MergeError::Busy`] if a job is already running.
    /// - [`MergeError::InsufficientFiles`] if fewer than two files are listed.
    pub fn begin_merge(&mut self, output_name: Option<&str>) -> Result<MergeJob<E>> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(MergeError::Busy);
        }

        let job = MergeJob {
            merger: Arc::clone(&self.merger),
            sources: self.collection.snapshot(),
            output_name: output_name.map(str::to_string),
            busy: Arc::clone(&self.busy),
        };

        if job.sources.len() < MIN_SOURCES {
            let err = MergeError::InsufficientFiles {
                count: job.sources.len(),
            };
            self.status = StatusMessage::new(StatusLevel::Error, err.to_string());
            return Err(err);
        }

        self.status = StatusMessage::new(StatusLevel::Progress, "Starting merge...");
        Ok(job)
    }

    /// Record the outcome of a job in the status line.
    pub fn finish_merge(&mut self, result: &Result<MergedDocument>) {
        self.status = match result {
            Ok(merged) => StatusMessage::new(
                StatusLevel::Success,
                format!(
                    "Merged {} files into {}.",
                    merged.statistics.files_merged, merged.file_name
                ),
            ),
            Err(err) => StatusMessage::new(StatusLevel::Error, format!("Merge failed: {err}")),
        };
    }

    /// Merge the current collection.
    ///
    /// The status line follows the job's progress and reports the outcome.
    /// The session is never left busy, whatever the outcome.
    pub async fn start_merge<F>(
        &mut self,
        output_name: Option<&str>,
        mut on_progress: F,
    ) -> Result<MergedDocument>
    where
        F: FnMut(&ProgressState),
    {
        let job = self.begin_merge(output_name)?;

        let status = &mut self.status;
        let result = job
            .run(|progress| {
                *status = StatusMessage::new(StatusLevel::Progress, progress.label());
                on_progress(progress);
            })
            .await;

        self.finish_merge(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_pdf, page_tags};

    fn pdf(name: &str, tag: u32, pages: u32) -> SourceFile {
        SourceFile::pdf(name, build_pdf(tag, pages))
    }

    fn text(name: &str) -> SourceFile {
        SourceFile::from_bytes(name, "text/plain", b"hello".to_vec())
    }

    fn session() -> MergeSession {
        MergeSession::new(MergeOptions::default()).unwrap()
    }

    fn names(session: &MergeSession) -> Vec<String> {
        session.view().entries.into_iter().map(|e| e.name).collect()
    }

    #[test]
    fn test_new_session_is_empty_and_not_mergeable() {
        let session = session();
        assert_eq!(session.view().count, 0);
        assert!(!session.can_merge());
        assert_eq!(session.status().level, StatusLevel::Ready);
        assert!(session.status().text.contains("at least 2"));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = MergeOptions {
            extension: "pdf".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            MergeSession::new(options),
            Err(MergeError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_add_files_updates_status() {
        let mut session = session();
        session
            .apply(Command::AddFiles(vec![pdf("a.pdf", 1, 1), text("b.txt")]))
            .unwrap();

        assert_eq!(names(&session), vec!["a.pdf"]);
        assert_eq!(session.status().text, "Added 1 PDF file(s) to the list.");
    }

    #[test]
    fn test_add_only_invalid_files_sets_error_status() {
        let mut session = session();
        let err = session
            .apply(Command::AddFiles(vec![text("c.txt")]))
            .unwrap_err();

        assert!(matches!(err, MergeError::NoValidFiles));
        assert_eq!(session.status().level, StatusLevel::Error);
        assert_eq!(session.view().count, 0);
    }

    #[test]
    fn test_move_up_and_down_at_edges_are_noops() {
        let mut session = session();
        session
            .apply(Command::AddFiles(vec![pdf("a.pdf", 1, 1), pdf("b.pdf", 2, 1)]))
            .unwrap();
        let before = session.status().clone();

        session.apply(Command::MoveUp(0)).unwrap();
        session.apply(Command::MoveDown(1)).unwrap();
        assert_eq!(names(&session), vec!["a.pdf", "b.pdf"]);
        assert_eq!(session.status(), &before);

        session.apply(Command::MoveDown(0)).unwrap();
        assert_eq!(names(&session), vec!["b.pdf", "a.pdf"]);
        assert_eq!(session.status().text, "Order changed.");
    }

    #[test]
    fn test_remove_out_of_range_is_reported() {
        let mut session = session();
        let err = session.apply(Command::RemoveAt(0)).unwrap_err();
        assert!(err.is_defect());
        assert_eq!(session.status().level, StatusLevel::Error);
    }

    #[test]
    fn test_view_flags() {
        let mut session = session();
        session
            .apply(Command::AddFiles(vec![
                pdf("a.pdf", 1, 1),
                pdf("b.pdf", 2, 1),
                pdf("c.pdf", 3, 1),
            ]))
            .unwrap();

        let view = session.view();
        assert!(view.can_merge);
        assert_eq!(view.entries[0].position, 1);
        assert!(!view.entries[0].can_move_up);
        assert!(view.entries[0].can_move_down);
        assert!(view.entries[2].can_move_up);
        assert!(!view.entries[2].can_move_down);
    }

    #[tokio::test]
    async fn test_start_merge_success() {
        let mut session = session();
        session
            .apply(Command::AddFiles(vec![pdf("a.pdf", 1, 2), pdf("b.pdf", 2, 1)]))
            .unwrap();
        session.apply(Command::MoveTo { index: 1, new_index: 0 }).unwrap();

        let mut percents = Vec::new();
        let merged = session
            .start_merge(Some("out"), |p| percents.push(p.percent))
            .await
            .unwrap();

        assert_eq!(merged.file_name, "out.pdf");
        assert_eq!(page_tags(&merged.bytes), vec![201, 101, 102]);
        assert!(percents.contains(&50));
        assert_eq!(session.status().level, StatusLevel::Success);
        assert!(!session.is_busy());
        assert!(session.can_merge());
    }

    #[tokio::test]
    async fn test_start_merge_failure_restores_session() {
        let mut session = session();
        session
            .apply(Command::AddFiles(vec![
                pdf("a.pdf", 1, 1),
                SourceFile::pdf("bad.pdf", b"not a pdf".to_vec()),
            ]))
            .unwrap();

        let err = session.start_merge(None, |_| {}).await.unwrap_err();

        assert!(matches!(err, MergeError::ParseFailure { ref name, .. } if name == "bad.pdf"));
        assert_eq!(session.status().level, StatusLevel::Error);
        assert!(session.status().text.contains("bad.pdf"));
        assert!(!session.is_busy());
        assert_eq!(session.view().count, 2);
    }

    #[tokio::test]
    async fn test_start_merge_with_one_file() {
        let mut session = session();
        session
            .apply(Command::AddFiles(vec![pdf("a.pdf", 1, 1)]))
            .unwrap();

        let err = session.start_merge(None, |_| {}).await.unwrap_err();
        assert!(matches!(err, MergeError::InsufficientFiles { count: 1 }));
        assert!(!session.is_busy());
    }

    #[test]
    fn test_session_busy_while_job_alive() {
        let mut session = session();
        session
            .apply(Command::AddFiles(vec![pdf("a.pdf", 1, 1), pdf("b.pdf", 2, 1)]))
            .unwrap();

        let job = session.begin_merge(None).unwrap();
        assert!(session.is_busy());
        assert!(!session.can_merge());
        assert!(matches!(session.begin_merge(None), Err(MergeError::Busy)));

        drop(job);
        assert!(!session.is_busy());
        assert!(session.can_merge());
    }

    #[tokio::test]
    async fn test_job_uses_snapshot_taken_at_begin() {
        let mut session = session();
        session
            .apply(Command::AddFiles(vec![pdf("a.pdf", 1, 1), pdf("b.pdf", 2, 1)]))
            .unwrap();

        let job = session.begin_merge(None).unwrap();
        session.apply(Command::Clear).unwrap();
        assert_eq!(job.sources().len(), 2);

        let result = job.run(|_| {}).await;
        session.finish_merge(&result);

        assert_eq!(page_tags(&result.unwrap().bytes), vec![101, 201]);
        assert_eq!(session.status().level, StatusLevel::Success);
    }
}
