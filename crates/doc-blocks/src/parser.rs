//! Document text to block sequence.
//!
//! A single forward scan over lines. Each line is classified on its own, then
//! runs of compatible lines are grouped into one block:
//!
//! ```text
//! # Title                 -> heading1
//!
//! Some text               -> paragraph (contiguous plain lines)
//! spanning lines
//!
//! > quoted                -> quote (contiguous `>` lines)
//! - one                   -> list (contiguous bullet / `N.` lines)
//! 2. two
//! ---                     -> divider
//! ```yaml                 -> data (tag `yaml` or `yaml:...`), else code
//! type: contact
//! ```
//! ```
//!
//! Fences are raw zones: nothing inside them is classified.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{Block, BlockId, BlockIdSource, BlockType, UuidIds};

/// Opening fence: three or more backticks or tildes, then an optional tag
static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(`{3,}|~{3,})\s*(.*)$").expect("Invalid fence regex"));

/// ATX heading with 1-6 hashes
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("Invalid heading regex"));

/// Thematic break
static DIVIDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]{3,}\s*$").expect("Invalid divider regex"));

/// Bullet (`-`, `*`) or ordered (`N.`) list marker
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*]|\d+\.)\s+(.*)$").expect("Invalid list regex"));

/// Language tag given to fenced code without one
pub const DEFAULT_CODE_LANGUAGE: &str = "text";

/// Whether a fence tag marks a `data` block: exactly `yaml` or `yaml:` prefixed.
pub fn is_data_language(tag: &str) -> bool {
    tag == "yaml" || tag.starts_with("yaml:")
}

/// Parse document text, giving each block a random UUID id.
///
/// ```
/// use doc_blocks::{BlockType, parse};
///
/// let blocks = parse("# Title\n\nSome text\n\n```yaml\ntype: x\nid: 1\n```");
/// let shape: Vec<_> = blocks.iter().map(|b| (b.block_type, b.content.as_str())).collect();
/// assert_eq!(
///     shape,
///     vec![
///         (BlockType::Heading1, "Title"),
///         (BlockType::Paragraph, "Some text"),
///         (BlockType::Data, "type: x\nid: 1"),
///     ]
/// );
/// ```
pub fn parse(text: &str) -> Vec<Block> {
    parse_with(text, &mut UuidIds)
}

/// Parse document text, drawing block ids from `ids`.
///
/// An empty or all-blank input yields an empty list.
pub fn parse_with<S: BlockIdSource>(text: &str, ids: &mut S) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        match classify(lines[i]) {
            LineKind::Blank => i += 1,
            LineKind::FenceOpen { fence, tag } => {
                let start = i + 1;
                let mut end = start;
                while end < lines.len() && !fence.is_closed_by(lines[end]) {
                    end += 1;
                }
                if end == lines.len() {
                    tracing::trace!(line = i + 1, "Unterminated fence runs to end of input");
                }
                let content = lines[start..end].join("\n");
                blocks.push(fenced_block(ids.next_id(), tag, content));
                // Skip the closing marker when there is one
                i = (end + 1).min(lines.len());
            }
            LineKind::Heading { level, text } => {
                blocks.push(Block::new(ids.next_id(), BlockType::heading(level), text));
                i += 1;
            }
            LineKind::Divider => {
                blocks.push(Block::divider(ids.next_id()));
                i += 1;
            }
            LineKind::Quote(_) => {
                let mut quoted = Vec::new();
                while let Some(LineKind::Quote(text)) = lines.get(i).map(|l| classify(l)) {
                    quoted.push(text);
                    i += 1;
                }
                blocks.push(Block::new(ids.next_id(), BlockType::Quote, quoted.join("\n")));
            }
            LineKind::ListItem(_) => {
                let mut items = Vec::new();
                while let Some(LineKind::ListItem(text)) = lines.get(i).map(|l| classify(l)) {
                    items.push(text.to_string());
                    i += 1;
                }
                blocks.push(Block::list(ids.next_id(), items));
            }
            LineKind::Text => {
                let start = i;
                while lines.get(i).is_some_and(|l| matches!(classify(l), LineKind::Text)) {
                    i += 1;
                }
                blocks.push(Block::paragraph(ids.next_id(), lines[start..i].join("\n")));
            }
        }
    }

    tracing::debug!(blocks = blocks.len(), lines = lines.len(), "Parsed document");
    blocks
}

fn fenced_block(id: BlockId, tag: &str, content: String) -> Block {
    if is_data_language(tag) {
        Block {
            language: Some(tag.to_string()),
            ..Block::new(id, BlockType::Data, content)
        }
    } else if tag.is_empty() {
        Block::code(id, DEFAULT_CODE_LANGUAGE, content)
    } else {
        Block::code(id, tag, content)
    }
}

/// An opening fence marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// A closing line is only the marker character, at least as long as the opener
    fn is_closed_by(&self, line: &str) -> bool {
        let line = line.trim_end();
        let count = line.chars().take_while(|&c| c == self.marker).count();
        count >= self.len && count == line.chars().count()
    }
}

/// Local facts about one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    FenceOpen { fence: Fence, tag: &'a str },
    Heading { level: usize, text: &'a str },
    Divider,
    /// Text after the `>` and one optional space
    Quote(&'a str),
    /// Text after the marker and its whitespace
    ListItem(&'a str),
    Text,
}

fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    if let Some(caps) = FENCE_OPEN.captures(line) {
        let marker_str = caps.get(1).map_or("", |m| m.as_str());
        let marker = marker_str.chars().next().unwrap_or('`');
        let tag = caps.get(2).map_or("", |m| m.as_str().trim());
        return LineKind::FenceOpen {
            fence: Fence {
                marker,
                len: marker_str.len(),
            },
            tag,
        };
    }

    if let Some(caps) = HEADING.captures(line) {
        let level = caps.get(1).map_or(1, |m| m.as_str().len());
        let text = caps.get(2).map_or("", |m| m.as_str().trim_end());
        return LineKind::Heading { level, text };
    }

    if DIVIDER.is_match(line) {
        return LineKind::Divider;
    }

    if let Some(rest) = line.strip_prefix('>') {
        return LineKind::Quote(rest.strip_prefix(' ').unwrap_or(rest));
    }

    if let Some(caps) = LIST_ITEM.captures(line) {
        return LineKind::ListItem(caps.get(1).map_or("", |m| m.as_str()));
    }

    LineKind::Text
}
