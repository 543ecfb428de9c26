use doc_blocks::{IdConfig, generate_id};

use crate::error::Result;

/// Run the id command
pub fn run_id(sequence: u64, prefix: &str, separator: &str, digits: usize) -> Result<()> {
    let config = IdConfig {
        prefix: prefix.to_string(),
        separator: separator.to_string(),
        digits,
        ..Default::default()
    };
    println!("{}", generate_id(&config, sequence));
    Ok(())
}
