// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tl - taillight CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{follow, run};

#[derive(Parser)]
#[command(
    name = "tl",
    version,
    about = "taillight - scheduled tailing of local and remote log files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow one or more sources given on the command line
    Follow(follow::FollowArgs),
    /// Follow every target defined in a TOML config
    Run(run::RunArgs),
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Commands::Follow(args) => follow::handle(args),
        Commands::Run(args) => run::handle(args),
    }
}

/// Diagnostics go to stderr so stdout stays clean tailed content.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
