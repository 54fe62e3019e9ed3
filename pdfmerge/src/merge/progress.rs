//! Progress reporting for merge jobs.

use serde::Serialize;

/// Stage of a merge job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// The job has started; no source has been processed yet.
    Starting {
        /// Number of sources in the job.
        total: usize,
    },
    /// A source has been copied into the output.
    Processing {
        /// Zero-based position of the source.
        index: usize,
        /// Number of sources in the job.
        total: usize,
        /// Display name of the source.
        name: String,
    },
    /// Every source has been copied; the output is being serialized.
    Serializing,
    /// The output has been serialized.
    Complete {
        /// Number of sources merged.
        files: usize,
    },
}

/// A progress event: percentage plus the phase it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    /// Completion percentage, 0 to 100.
    pub percent: u8,
    /// What the job is doing.
    #[serde(flatten)]
    pub phase: Phase,
}

impl ProgressState {
    /// Event emitted before the first source is loaded.
    pub fn starting(total: usize) -> Self {
        Self {
            percent: 0,
            phase: Phase::Starting { total },
        }
    }

    /// Event emitted after the source at `index` has been copied.
    pub fn processed(index: usize, total: usize, name: impl Into<String>) -> Self {
        Self {
            percent: percent_done(index + 1, total),
            phase: Phase::Processing {
                index,
                total,
                name: name.into(),
            },
        }
    }

    /// Event emitted before serialization.
    pub fn serializing() -> Self {
        Self {
            percent: 100,
            phase: Phase::Serializing,
        }
    }

    /// Event emitted once the output bytes exist.
    pub fn complete(files: usize) -> Self {
        Self {
            percent: 100,
            phase: Phase::Complete { files },
        }
    }

    /// Human-readable label for the phase.
    pub fn label(&self) -> String {
        match &self.phase {
            Phase::Starting { total } => format!("Starting merge of {total} files"),
            Phase::Processing { index, total, name } => {
                format!("[{}/{}] {}", index + 1, total, name)
            }
            Phase::Serializing => "Building final document".to_string(),
            Phase::Complete { files } => format!("Merged {files} files"),
        }
    }
}

/// `round(done / total * 100)` in integer arithmetic, halves rounding up.
pub fn percent_done(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total);
    ((done * 200 + total) / (2 * total)) as u8
}
