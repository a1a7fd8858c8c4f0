//! `familiar`: a terminal pet that lives beside your code.
//!
//! The binary is a thin shell over `familiar-core`. Each invocation finds
//! the pet's files, advances the pet to the current time, applies one
//! command and saves the result. Nothing runs between invocations; decay
//! is computed from the elapsed wall-clock time.
//!
//! # Files
//!
//! ```text
//! <project>/.familiar/pet.yaml         config and animation table
//! <project>/.familiar/pet.state.yaml   mutable state
//! ~/.familiar/                         global pet, used when no project pet is found
//! ```
//!
//! Logs go to stderr and are quiet by default; set `RUST_LOG=debug` to see
//! decay steps and command dispatch.

mod cli;
mod commands;
mod discovery;
mod error;
mod render;
mod storage;
mod templates;

use std::io::{self, IsTerminal};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::Shell;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the pet cannot be found, loaded or saved, or if the
/// engine refuses the command.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    let stdout = io::stdout();
    let animate = stdout.is_terminal();

    let mut shell = Shell::new(cwd, cli.config, Utc::now(), animate, stdout.lock());
    shell
        .run(cli.command)
        .context("familiar could not complete the command")?;
    Ok(())
}
