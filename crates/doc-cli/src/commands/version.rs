//! Version string commands

use colored::Colorize;
use doc_blocks::{parse_version, validate_version};

use crate::cli::BumpPart;
use crate::error::Result;

/// Run `version check`
pub fn run_version_check(raw: &str) -> Result<()> {
    validate_version(raw)?;
    println!("{} {} is a valid version", "OK".green().bold(), raw.trim());
    Ok(())
}

/// Run `version bump`; prints only the new version so it can be captured
pub fn run_version_bump(part: BumpPart, raw: Option<&str>) -> Result<()> {
    let current = parse_version(raw)?;
    let next = match part {
        BumpPart::Major => current.increment_major(),
        BumpPart::Minor => current.increment_minor(),
    };
    tracing::debug!(from = %current, to = %next, "Bumped version");
    println!("{next}");
    Ok(())
}
