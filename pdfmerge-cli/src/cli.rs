//! CLI argument parsing for pdfmerge.
//!
//! This module defines the command-line interface using `clap`. It is also
//! compiled by `build.rs` to render the man page, so it only depends on the
//! library crate.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pdfmerge::{CompressionLevel, MergeError, MergeOptions, Metadata, Result};

/// Combine PDF files into a single document, in the order given.
///
/// Files are merged page by page in list order. The list can be edited
/// with --remove and --move before merging, or interactively with -i.
#[derive(Parser, Debug)]
#[command(name = "pdfmerge")]
#[command(version)]
#[command(about = "Combine PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files (in order)
    ///
    /// Glob patterns are expanded; matches are added in name order.
    /// Files without a .pdf extension are skipped with a warning.
    ///
    /// Examples:
    ///   pdfmerge cover.pdf body.pdf -o report
    ///   pdfmerge 'chapter*.pdf' -o book
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Base name of the merged file (".pdf" is always appended)
    ///
    /// Defaults to "merged_document" when omitted or blank.
    #[arg(short = 'o', long, value_name = "NAME")]
    pub output_name: Option<String>,

    /// Directory the merged file is written to
    #[arg(
        short = 'd',
        long,
        value_name = "DIR",
        env = "PDFMERGE_OUTPUT_DIR",
        default_value = "."
    )]
    pub output_dir: PathBuf,

    /// Compression level for the output PDF
    ///
    /// - none: No stream compression
    /// - standard: Compress streams (default)
    /// - maximum: Compress streams and drop unreachable objects
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        env = "PDFMERGE_COMPRESSION",
        default_value = "standard"
    )]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Set title metadata for the output PDF
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for the output PDF
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Set subject metadata for the output PDF
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Set keywords metadata for the output PDF (comma-separated)
    #[arg(long, value_name = "TEXT")]
    pub keywords: Option<String>,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Start an interactive shell to edit the list and merge
    #[arg(short, long)]
    pub interactive: bool,

    /// Print the merge result as JSON on stdout
    #[arg(long, conflicts_with = "interactive")]
    pub json: bool,

    /// Verbose output - show statistics and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Move the file at position FROM to position TO (1-based, repeatable)
    ///
    /// Moves are applied in order, after removals.
    #[arg(long = "move", value_name = "FROM:TO", value_parser = parse_move)]
    pub moves: Vec<Reorder>,

    /// Remove the file at position N (1-based, repeatable)
    ///
    /// Removals are applied in order, so later positions refer to the
    /// list after earlier removals.
    #[arg(long = "remove", value_name = "N")]
    pub removals: Vec<usize>,
}

/// A `--move FROM:TO` request, converted to zero-based positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reorder {
    /// Current position.
    pub from: usize,
    /// Target position.
    pub to: usize,
}

/// What to do when the output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteMode {
    /// Ask before overwriting.
    Prompt,
    /// Overwrite silently.
    Force,
    /// Refuse to overwrite.
    NoClobber,
}

fn parse_move(value: &str) -> std::result::Result<Reorder, String> {
    let (from, to) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{value}'"))?;

    let position = |s: &str| -> std::result::Result<usize, String> {
        match s.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(format!("invalid position '{s}': positions start at 1")),
        }
    };

    Ok(Reorder {
        from: position(from)?,
        to: position(to)?,
    })
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

impl Cli {
    /// Validate CLI arguments before processing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Both --verbose and --quiet are given
    /// - No inputs are given outside interactive mode
    /// - A --remove position is zero
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(MergeError::invalid_config(
                "--verbose and --quiet cannot be used together",
            ));
        }

        if !self.interactive && self.inputs.is_empty() {
            return Err(MergeError::invalid_config("No input files specified"));
        }

        if self.removals.contains(&0) {
            return Err(MergeError::invalid_config(
                "Invalid --remove position: positions start at 1",
            ));
        }

        Ok(())
    }

    /// Convert CLI arguments into validated merge options.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is unknown or the
    /// resulting options fail validation.
    pub fn to_options(&self) -> Result<MergeOptions> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let metadata = Metadata::new(
            self.title.clone(),
            self.author.clone(),
            self.subject.clone(),
            self.keywords.clone(),
        );

        let options = MergeOptions {
            compression,
            metadata,
            ..Default::default()
        };
        options.validate()?;

        Ok(options)
    }

    /// Resolve the overwrite policy from --force and --no-clobber.
    pub fn overwrite_mode(&self) -> OverwriteMode {
        if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        }
    }

    /// Default `tracing` filter for the chosen verbosity.
    ///
    /// `RUST_LOG` takes precedence when set.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet || self.json {
            "pdfmerge=error"
        } else if self.verbose {
            "pdfmerge=debug"
        } else {
            "pdfmerge=warn"
        }
    }

    /// Expand glob patterns in the positional inputs.
    ///
    /// Plain paths are passed through untouched, whether or not they
    /// exist; missing files surface when the merge reads them.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is malformed or matches nothing.
    pub fn expand_inputs(&self) -> Result<Vec<PathBuf>> {
        expand_patterns(&self.inputs)
    }
}

/// Expand each input that looks like a glob pattern, keeping order.
pub fn expand_patterns(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(inputs.len());

    for input in inputs {
        if !is_glob_pattern(input) {
            paths.push(PathBuf::from(input));
            continue;
        }

        let matches = glob::glob(input)
            .map_err(|e| MergeError::invalid_config(format!("Invalid pattern '{input}': {e}")))?
            .filter_map(std::result::Result::ok)
            .filter(|path| path.is_file())
            .collect::<Vec<_>>();

        if matches.is_empty() {
            return Err(MergeError::invalid_config(format!(
                "No files match pattern '{input}'"
            )));
        }
        paths.extend(matches);
    }

    Ok(paths)
}
