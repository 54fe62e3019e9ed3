//! Terminal progress bar driven by merge progress events.

use pdfmerge::ProgressState;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Classic progress bar: [=====>    ]
    Bar,
    /// Percentage only: 42%
    Counter,
}

/// Progress bar for visual feedback while a merge runs.
pub struct ProgressBar {
    /// Last reported percentage.
    percent: u8,
    /// Progress bar style.
    style: ProgressStyle,
    /// Label of the last event.
    message: Option<String>,
    /// Start time of the operation.
    start_time: Instant,
    /// Whether the progress bar is enabled.
    enabled: bool,
}

impl ProgressBar {
    /// Create a new progress bar.
    pub fn new(style: ProgressStyle) -> Self {
        Self {
            percent: 0,
            style,
            message: None,
            start_time: Instant::now(),
            enabled: Self::is_terminal(),
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut pb = Self::new(ProgressStyle::Counter);
        pb.enabled = false;
        pb
    }

    /// Check if stdout is a terminal.
    fn is_terminal() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal()
    }

    /// Record a progress event and redraw.
    pub fn update(&mut self, state: &ProgressState) {
        self.percent = state.percent.min(100);
        self.message = Some(state.label());
        self.render();
    }

    /// Mark the progress bar as finished.
    pub fn finish(&mut self) {
        if self.enabled {
            self.percent = 100;
            self.render();
            println!();
        }
    }

    /// Clear the progress bar from the terminal.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn render(&self) {
        if !self.enabled {
            return;
        }

        let output = match self.style {
            ProgressStyle::Bar => self.render_bar(),
            ProgressStyle::Counter => self.render_counter(),
        };

        print!("\r\x1b[K{output}");
        io::stdout().flush().ok();
    }

    fn render_bar(&self) -> String {
        let width = 40;
        let filled = width * usize::from(self.percent) / 100;
        let empty = width - filled;

        let bar = format!(
            "[{}{}]",
            "=".repeat(filled.saturating_sub(1)) + if filled > 0 { ">" } else { "" },
            " ".repeat(empty)
        );

        let mut parts = vec![
            bar,
            format!("{:>3}%", self.percent),
            format_duration(self.start_time.elapsed()),
        ];
        if let Some(ref msg) = self.message {
            parts.push(msg.clone());
        }

        parts.join(" ")
    }

    fn render_counter(&self) -> String {
        match self.message {
            Some(ref msg) => format!("{:>3}% {msg}", self.percent),
            None => format!("{:>3}%", self.percent),
        }
    }

    /// Last reported percentage.
    pub fn percent(&self) -> u8 {
        self.percent
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
