//! Block listing

use std::path::Path;

use colored::Colorize;
use doc_blocks::{Block, BlockType, decode};

use super::load_document;
use crate::error::Result;

/// Longest summary shown per block
const SUMMARY_WIDTH: usize = 60;

/// Run the parse command
pub fn run_parse(path: &Path, json: bool) -> Result<()> {
    let doc = load_document(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(doc.blocks())?);
        return Ok(());
    }

    if doc.is_empty() {
        println!("{} No blocks in {}", "=>".blue().bold(), path.display());
        return Ok(());
    }

    for block in doc.blocks() {
        println!(
            "{} {} {}",
            format!("{:<5}", block.id).dimmed(),
            format!("{:<9}", block.block_type).cyan(),
            summary(block)
        );
    }
    Ok(())
}

/// One-line description of a block
fn summary(block: &Block) -> String {
    match block.block_type {
        BlockType::Data => {
            let fields = decode(&block.content);
            let data_type = fields.data_type().unwrap_or_else(|| "?".to_string());
            format!("{data_type} ({} fields)", fields.len())
        }
        BlockType::Code => format!(
            "[{}] {}",
            block.language.as_deref().unwrap_or(""),
            first_line(&block.content)
        ),
        BlockType::List => format!("{} items", block.list_items().len()),
        BlockType::Divider => String::new(),
        _ => first_line(&block.content),
    }
}

fn first_line(content: &str) -> String {
    let line = content.lines().next().unwrap_or("");
    if line.chars().count() > SUMMARY_WIDTH {
        let cut: String = line.chars().take(SUMMARY_WIDTH - 3).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_blocks::BlockId;

    #[test]
    fn test_summary_for_data_block() {
        let block = Block::data(BlockId::new("b1"), "type: contact\nname: Ada");
        assert_eq!(summary(&block), "contact (2 fields)");
    }

    #[test]
    fn test_summary_truncates_long_lines() {
        let block = Block::paragraph(BlockId::new("b1"), "x".repeat(100));
        let text = summary(&block);
        assert_eq!(text.chars().count(), SUMMARY_WIDTH);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_summary_for_code() {
        let block = Block::code(BlockId::new("b1"), "rust", "fn main() {}\n// more");
        assert_eq!(summary(&block), "[rust] fn main() {}");
    }
}
