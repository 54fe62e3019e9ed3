//! pdfmerge - Combine PDF files into a single document.
//!
//! Batch mode merges the files given on the command line. Interactive mode
//! (`-i`) opens a shell for editing the list before merging.

mod cli;
mod ops;
mod output;
mod shell;
mod writer;

use anyhow::Result;
use clap::Parser;
use pdfmerge::{Command, MergeError, MergeSession};
use std::process;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::ops::{add_paths, confirm_destination, merge_and_save};
use crate::output::{OutputFormatter, display_view};
use crate::shell::Shell;
use crate::writer::{OutputTarget, WriteError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        process::exit(exit_code(&err));
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Map an error to the process exit code.
fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<MergeError>() {
        err.exit_code()
    } else if let Some(err) = err.downcast_ref::<WriteError>() {
        err.exit_code()
    } else {
        1
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    let options = cli.to_options()?;

    let formatter = OutputFormatter::new(cli.quiet || cli.json, cli.verbose);
    let target = OutputTarget::new(&cli.output_dir, cli.overwrite_mode());
    formatter.debug(&format!("Output directory: {}", cli.output_dir.display()));
    formatter.debug(&format!("Compression: {:?}", options.compression));
    let mut session = MergeSession::new(options)?;

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfmerge::NAME, pdfmerge::VERSION));
        formatter.blank_line();
    }

    let inputs = cli.expand_inputs()?;
    if cli.interactive {
        if !inputs.is_empty() && add_paths(&mut session, inputs, &formatter).is_err() {
            formatter.status(session.status());
        }
        let stdin = BufReader::new(tokio::io::stdin());
        Shell::new(session, stdin, &formatter, target).run().await?;
        return Ok(());
    }

    add_paths(&mut session, inputs, &formatter)?;
    apply_edits(&mut session, &cli)?;

    if formatter.should_print() {
        formatter.section("Merge order");
        display_view(&formatter, &session.view());
        formatter.blank_line();
    }

    let output_name = cli.output_name.as_deref();
    let file_name = session.options().output_name(output_name);
    let path = confirm_destination(&target, file_name.as_str(), &formatter).await?;

    merge_and_save(&mut session, output_name, &path, &formatter, cli.json).await
}

/// Apply `--remove` then `--move` requests, in the order given.
fn apply_edits(session: &mut MergeSession, cli: &Cli) -> pdfmerge::Result<()> {
    for &position in &cli.removals {
        let index = position - 1;
        check_position(session, index, "--remove")?;
        session.apply(Command::RemoveAt(index))?;
    }

    for reorder in &cli.moves {
        check_position(session, reorder.from, "--move")?;
        check_position(session, reorder.to, "--move")?;
        session.apply(Command::MoveTo {
            index: reorder.from,
            new_index: reorder.to,
        })?;
    }

    Ok(())
}

fn check_position(session: &MergeSession, index: usize, flag: &str) -> pdfmerge::Result<()> {
    let len = session.collection().len();
    if index >= len {
        return Err(MergeError::invalid_config(format!(
            "{flag}: no file at position {} (list has {len})",
            index + 1
        )));
    }
    Ok(())
}
