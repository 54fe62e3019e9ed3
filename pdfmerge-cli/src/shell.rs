//! Interactive shell.
//!
//! Reads one command per line, applies it to the session and redraws the
//! list. Positions typed and shown are 1-based. Commands are handled one at
//! a time, so nothing else can be started while a merge runs.

use anyhow::{Context, Result, bail};
use pdfmerge::{Command, MergeSession};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::cli::expand_patterns;
use crate::ops::{add_paths, is_yes, merge_and_save};
use crate::output::{OutputFormatter, display_view};
use crate::writer::{Destination, OutputTarget};

const HELP: &str = "\
Commands:
  add <file>...     Add PDF files (glob patterns allowed)
  rm <n>            Remove the file at position n
  mv <from> <to>    Move a file to a new position
  up <n>            Move a file one position up
  down <n>          Move a file one position down
  clear             Remove all files
  list              Show the list
  merge [name]      Merge the list into <name>.pdf
  help              Show this help
  quit              Leave the shell";

/// A parsed shell command. Positions are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Add files or patterns.
    Add(Vec<String>),
    /// Remove a file.
    Remove(usize),
    /// Move a file.
    Move {
        /// Current position.
        from: usize,
        /// Target position.
        to: usize,
    },
    /// Move a file up one position.
    Up(usize),
    /// Move a file down one position.
    Down(usize),
    /// Remove all files.
    Clear,
    /// Show the list.
    List,
    /// Merge, with an optional output base name.
    Merge(Option<String>),
    /// Show help.
    Help,
    /// Leave the shell.
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb {
        "add" => {
            let paths: Vec<String> = words.map(String::from).collect();
            if paths.is_empty() {
                bail!("usage: add <file>...");
            }
            ShellCommand::Add(paths)
        }
        "rm" | "remove" => ShellCommand::Remove(position(words.next(), "rm <n>")?),
        "mv" | "move" => ShellCommand::Move {
            from: position(words.next(), "mv <from> <to>")?,
            to: position(words.next(), "mv <from> <to>")?,
        },
        "up" => ShellCommand::Up(position(words.next(), "up <n>")?),
        "down" => ShellCommand::Down(position(words.next(), "down <n>")?),
        "clear" => ShellCommand::Clear,
        "list" | "ls" => ShellCommand::List,
        "merge" => {
            let name = words.collect::<Vec<_>>().join(" ");
            ShellCommand::Merge((!name.is_empty()).then_some(name))
        }
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => bail!("unknown command '{other}' (type 'help')"),
    };

    Ok(Some(command))
}

fn position(arg: Option<&str>, usage: &str) -> Result<usize> {
    let arg = arg.with_context(|| format!("usage: {usage}"))?;
    let n: usize = arg
        .parse()
        .with_context(|| format!("'{arg}' is not a position"))?;
    if n == 0 {
        bail!("positions start at 1");
    }
    Ok(n - 1)
}

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented shell over a session.
pub struct Shell<'a, R> {
    session: MergeSession,
    lines: Lines<R>,
    formatter: &'a OutputFormatter,
    target: OutputTarget,
}

impl<'a, R: AsyncBufRead + Unpin> Shell<'a, R> {
    /// Create a shell reading commands from `input`.
    pub fn new(
        session: MergeSession,
        input: R,
        formatter: &'a OutputFormatter,
        target: OutputTarget,
    ) -> Self {
        Self {
            session,
            lines: input.lines(),
            formatter,
            target,
        }
    }

    /// Run until `quit` or end of input, returning the session.
    ///
    /// Command errors are reported and the shell keeps going; only a
    /// failure to read input ends it early.
    pub async fn run(mut self) -> Result<MergeSession> {
        self.formatter.info("Type 'help' for a list of commands.");
        self.show_list();

        while let Some(line) = self.prompt("pdfmerge> ").await? {
            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    self.formatter.error(&format!("{err:#}"));
                    continue;
                }
            };

            debug!(?command, "shell command");
            match self.execute(command).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) => self.formatter.error(&format!("{err:#}")),
            }
        }

        Ok(self.session)
    }

    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        if self.formatter.should_print() {
            print!("{text}");
            std::io::stdout().flush().ok();
        }
        self.lines.next_line().await.context("Failed to read input")
    }

    async fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Add(patterns) => {
                let paths = expand_patterns(&patterns)?;
                if add_paths(&mut self.session, paths, self.formatter).is_err() {
                    self.formatter.status(self.session.status());
                }
                self.show_list();
            }
            ShellCommand::Remove(index) => {
                self.check_position(index)?;
                self.edit(Command::RemoveAt(index))?;
            }
            ShellCommand::Move { from, to } => {
                self.check_position(from)?;
                self.check_position(to)?;
                self.edit(Command::MoveTo {
                    index: from,
                    new_index: to,
                })?;
            }
            ShellCommand::Up(index) => {
                self.check_position(index)?;
                self.edit(Command::MoveUp(index))?;
            }
            ShellCommand::Down(index) => {
                self.check_position(index)?;
                self.edit(Command::MoveDown(index))?;
            }
            ShellCommand::Clear => self.edit(Command::Clear)?,
            ShellCommand::List => self.show_list(),
            ShellCommand::Merge(name) => self.merge(name.as_deref()).await?,
            ShellCommand::Help => self.formatter.info(HELP),
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn check_position(&self, index: usize) -> Result<()> {
        let len = self.session.collection().len();
        if index >= len {
            bail!("no file at position {} (list has {len})", index + 1);
        }
        Ok(())
    }

    fn edit(&mut self, command: Command) -> Result<()> {
        self.session.apply(command)?;
        self.formatter.status(self.session.status());
        self.show_list();
        Ok(())
    }

    fn show_list(&self) {
        display_view(self.formatter, &self.session.view());
        self.formatter.status(&self.session.ready_message());
    }

    async fn merge(&mut self, name: Option<&str>) -> Result<()> {
        if !self.session.can_merge() {
            self.formatter.error(&self.session.ready_message().text);
            return Ok(());
        }

        let file_name = self.session.options().output_name(name);
        let path = match self.target.check(file_name.as_str()).await? {
            Destination::Ready(path) => path,
            Destination::NeedsConfirmation(path) => {
                self.formatter
                    .warning(&format!("Output file already exists: {}", path.display()));
                let answer = self.prompt("Overwrite? [y/N]: ").await?;
                if !answer.as_deref().is_some_and(is_yes) {
                    self.formatter.info("Merge cancelled.");
                    return Ok(());
                }
                path
            }
        };

        merge_and_save(&mut self.session, name, &path, self.formatter, false).await
    }
}
