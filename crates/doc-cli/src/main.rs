//! blockdoc
//!
//! Command-line host for block-structured documents: lists blocks, normalizes
//! markup, and restructures data records against schema templates.

mod cli;
mod commands;
mod config;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands, VersionAction};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} block document tool", "blockdoc".green().bold());
            println!();
            println!("Run {} for available commands.", "blockdoc --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Parse { file, json } => commands::run_parse(&file, json),
        Commands::Fmt { file, check, write } => commands::run_fmt(&file, check, write),
        Commands::Sync {
            file,
            template,
            dry_run,
            yes,
            json,
        } => commands::run_sync(&file, &template, dry_run, yes, json),
        Commands::Add {
            file,
            template,
            after,
        } => commands::run_add(&file, &template, after.as_deref()),
        Commands::Set {
            file,
            block,
            key,
            value,
        } => commands::run_set(&file, &block, &key, &value),
        Commands::Version { action } => match action {
            VersionAction::Check { raw } => commands::run_version_check(&raw),
            VersionAction::Bump { part, raw } => commands::run_version_bump(part, raw.as_deref()),
        },
        Commands::Id {
            sequence,
            prefix,
            separator,
            digits,
        } => commands::run_id(sequence, &prefix, &separator, digits),
    }
}
