//! Markup normalization

use std::fs;
use std::path::Path;

use colored::Colorize;
use doc_blocks::{parse, serialize};

use super::file_text;
use crate::error::{CliError, Result};

/// Run the fmt command
pub fn run_fmt(path: &Path, check: bool, write: bool) -> Result<()> {
    let original = fs::read_to_string(path)?;
    let formatted = file_text(&serialize(&parse(&original)));
    let unchanged = formatted == original;

    if check {
        if unchanged {
            println!("{} {} is formatted", "OK".green().bold(), path.display());
            return Ok(());
        }
        return Err(CliError::user(format!(
            "{} is not formatted. Run 'blockdoc fmt --write' to fix it.",
            path.display()
        )));
    }

    if write {
        if unchanged {
            println!("{} {} already formatted", "OK".green().bold(), path.display());
        } else {
            fs::write(path, &formatted)?;
            println!("{} Formatted {}", "OK".green().bold(), path.display());
        }
        return Ok(());
    }

    print!("{formatted}");
    Ok(())
}
