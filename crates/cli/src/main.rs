// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sp - SkillPilot CLI
//!
//! Thin front end over the engine: starts jobs, resumes paused ones, and
//! reads back the evidence a run directory holds. All state lives in the
//! working directory's `.skillpilot/`.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{list, resume, run, status};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sp",
    version,
    about = "SkillPilot - evidence-first skill runs against EDA tool sessions"
)]
struct Cli {
    /// Operate on <dir> instead of the current directory
    #[arg(short = 'C', global = true, value_name = "DIR")]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a skill against a design database
    Run(run::RunArgs),
    /// Resume a job paused on candidate selection
    Resume(resume::ResumeArgs),
    /// Show the terminal result of a job
    Status(status::StatusArgs),
    /// List jobs under this directory
    List(list::ListArgs),
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let cwd = match cli.directory {
        Some(dir) => dir.canonicalize()?,
        None => std::env::current_dir()?,
    };

    let code = match cli.command {
        Commands::Run(args) => run::exec(&cwd, args).await?,
        Commands::Resume(args) => resume::exec(&cwd, args).await?,
        Commands::Status(args) => status::exec(&cwd, args)?,
        Commands::List(args) => list::exec(&cwd, args)?,
    };
    std::process::exit(code);
}
