//! Block sequence to document text.
//!
//! Each block renders on its own and blocks are separated by one blank line.
//! List markers are always written as `-`, whatever the source used.

use crate::block::{Block, BlockType};

/// Fence language written for `data` blocks with no tag
pub const DEFAULT_DATA_LANGUAGE: &str = "yaml";

const DIVIDER: &str = "---";

/// Render blocks to text, joined by a blank line, without a trailing newline.
///
/// ```
/// use doc_blocks::{Block, BlockId, serialize};
///
/// let blocks = vec![
///     Block::paragraph(BlockId::new("a"), "Intro"),
///     Block::list(BlockId::new("b"), vec!["one".into(), "two".into()]),
///     Block::divider(BlockId::new("c")),
/// ];
/// assert_eq!(serialize(&blocks), "Intro\n\n- one\n- two\n\n---");
/// ```
pub fn serialize(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(serialize_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render a single block
pub fn serialize_block(block: &Block) -> String {
    match block.block_type {
        BlockType::Heading1 | BlockType::Heading2 | BlockType::Heading3 => {
            let level = block.block_type.heading_level().unwrap_or(1);
            format!("{} {}", "#".repeat(level), block.content)
        }
        BlockType::Paragraph | BlockType::File => block.content.clone(),
        BlockType::Code => fenced(block.language.as_deref().unwrap_or(""), &block.content),
        BlockType::Data => fenced(
            block.language.as_deref().unwrap_or(DEFAULT_DATA_LANGUAGE),
            &block.content,
        ),
        BlockType::Quote => block
            .content
            .split('\n')
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n"),
        BlockType::List => block
            .list_items()
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n"),
        BlockType::Divider => DIVIDER.to_string(),
    }
}

/// Wrap `content` in a backtick fence long enough that no content line can
/// close it early.
fn fenced(language: &str, content: &str) -> String {
    let longest_run = content
        .split('\n')
        .map(|line| line.chars().take_while(|&c| c == '`').count())
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);

    // A tag that itself starts with a backtick would merge into the fence
    let open = if language.starts_with('`') {
        format!("{fence} {language}")
    } else {
        format!("{fence}{language}")
    };

    if content.is_empty() {
        format!("{open}\n{fence}")
    } else {
        format!("{open}\n{content}\n{fence}")
    }
}
