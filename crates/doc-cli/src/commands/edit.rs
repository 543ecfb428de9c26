//! Record editing commands: `add` and `set`

use std::path::Path;

use colored::Colorize;
use doc_blocks::{BlockId, BlockLocation};

use super::{load_document, save_document};
use crate::config::SchemaTemplate;
use crate::error::Result;

/// Run the add command
pub fn run_add(path: &Path, template_path: &Path, after: Option<&str>) -> Result<()> {
    let template = SchemaTemplate::load(template_path)?;
    let mut doc = load_document(path)?;

    let location = match after {
        Some(id) => BlockLocation::After(BlockId::new(id)),
        None => BlockLocation::End,
    };
    let id = doc.insert_record(
        location,
        &template.target_type,
        &template.fields,
        template.id.as_ref(),
    )?;
    let record_id = doc
        .fields(&id)?
        .get("id")
        .map(ToString::to_string)
        .unwrap_or_default();

    save_document(path, &doc)?;
    if record_id.is_empty() {
        println!("{} Added {} record", "OK".green().bold(), template.target_type.cyan());
    } else {
        println!(
            "{} Added {} record {}",
            "OK".green().bold(),
            template.target_type.cyan(),
            record_id.bold()
        );
    }
    Ok(())
}

/// Run the set command
pub fn run_set(path: &Path, block: &str, key: &str, value: &str) -> Result<()> {
    let mut doc = load_document(path)?;
    let id = BlockId::new(block);

    doc.set_field(&id, key, value)?;
    if !doc.is_modified() {
        println!("{} {}.{} unchanged", "OK".green().bold(), block, key);
        return Ok(());
    }

    save_document(path, &doc)?;
    println!("{} Set {}.{}", "OK".green().bold(), block, key);
    Ok(())
}
