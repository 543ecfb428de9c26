//! Structural sync command
//!
//! Previews which records change and which fields they lose, asks before
//! writing, then rewrites the document.

use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use dialoguer::Confirm;
use serde::Serialize;

use doc_blocks::{Block, BlockId, decode, sync_structure};

use super::{load_document, save_document};
use crate::config::SchemaTemplate;
use crate::error::{CliError, Result};

/// What a sync run did, for `--json`
#[derive(Debug, Serialize)]
struct SyncReport {
    target_type: String,
    template_version: String,
    matched: usize,
    modified: usize,
    changed: Vec<BlockId>,
    /// Fields each changed block loses
    dropped: BTreeMap<String, Vec<String>>,
    written: bool,
}

/// Run the sync command
pub fn run_sync(path: &Path, template_path: &Path, dry_run: bool, yes: bool, json: bool) -> Result<()> {
    let template = SchemaTemplate::load(template_path)?;
    let version = template.version()?;
    let options = template.sync_options();
    let mut doc = load_document(path)?;

    // Preview on a snapshot; the document is only touched once confirmed
    let preview = sync_structure(doc.blocks(), &template.target_type, &template.fields, &options);
    let dropped = dropped_fields(doc.blocks(), &preview.changed, &template.fields);

    if !json {
        println!(
            "{} Syncing '{}' blocks to template v{} ({} fields)",
            "=>".blue().bold(),
            template.target_type.cyan(),
            version,
            template.fields.len()
        );
        print_preview(&preview.changed, &dropped, preview.matched);
    }

    let mut written = false;
    if !preview.is_unchanged() && !dry_run {
        if !yes && !confirm(preview.modified, &dropped)? {
            return Err(CliError::user("Sync cancelled by user."));
        }
        let outcome = doc.apply_sync(&template.target_type, &template.fields, &options);
        save_document(path, &doc)?;
        written = true;
        if !json {
            println!(
                "{} Updated {} block(s) in {}",
                "OK".green().bold(),
                outcome.modified,
                path.display()
            );
        }
    } else if !json && dry_run && !preview.is_unchanged() {
        println!("{} Dry run, nothing written.", "=>".blue().bold());
    }

    if json {
        let report = SyncReport {
            target_type: template.target_type.clone(),
            template_version: version.to_string(),
            matched: preview.matched,
            modified: preview.modified,
            changed: preview.changed,
            dropped,
            written,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Fields outside `schema` held by each changed block
fn dropped_fields(
    blocks: &[Block],
    changed: &[BlockId],
    schema: &[String],
) -> BTreeMap<String, Vec<String>> {
    blocks
        .iter()
        .filter(|b| changed.contains(&b.id))
        .filter_map(|b| {
            let lost: Vec<String> = decode(&b.content)
                .keys()
                .filter(|k| !schema.iter().any(|s| s == k))
                .map(str::to_string)
                .collect();
            (!lost.is_empty()).then(|| (b.id.to_string(), lost))
        })
        .collect()
}

fn print_preview(changed: &[BlockId], dropped: &BTreeMap<String, Vec<String>>, matched: usize) {
    if matched == 0 {
        println!("{} No matching data blocks.", "OK".green().bold());
        return;
    }
    if changed.is_empty() {
        println!(
            "{} All {} matching block(s) already conform.",
            "OK".green().bold(),
            matched
        );
        return;
    }

    println!("{} block(s) will change:", changed.len());
    for id in changed {
        match dropped.get(id.as_str()) {
            Some(lost) => println!(
                "   {} {} drops {}",
                "!".yellow(),
                id.as_str().cyan(),
                lost.join(", ").red()
            ),
            None => println!("   {} {}", "+".green(), id.as_str().cyan()),
        }
    }
}

fn confirm(modified: usize, dropped: &BTreeMap<String, Vec<String>>) -> Result<bool> {
    let prompt = if dropped.is_empty() {
        format!("Rewrite {modified} block(s)?")
    } else {
        format!("Rewrite {modified} block(s)? Dropped fields cannot be recovered")
    };
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
