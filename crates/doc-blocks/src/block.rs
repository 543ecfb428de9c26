//! Block types and identity

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::IdConfig;

/// Opaque block identifier, unique within one document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque reference to an attached file, resolved by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The kind of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Code,
    Quote,
    List,
    Divider,
    Data,
    File,
}

impl BlockType {
    /// Heading level for heading types
    pub fn heading_level(&self) -> Option<usize> {
        match self {
            Self::Heading1 => Some(1),
            Self::Heading2 => Some(2),
            Self::Heading3 => Some(3),
            _ => None,
        }
    }

    /// Map a markdown heading depth (1-6) to a heading type.
    ///
    /// Depths past 3 collapse into `Heading3`.
    pub fn heading(level: usize) -> Self {
        match level {
            0 | 1 => Self::Heading1,
            2 => Self::Heading2,
            _ => Self::Heading3,
        }
    }

    /// Whether blocks of this type carry a fenced payload
    pub fn is_fenced(&self) -> bool {
        matches!(self, Self::Code | Self::Data)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Heading3 => "heading3",
            Self::Paragraph => "paragraph",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::List => "list",
            Self::Divider => "divider",
            Self::Data => "data",
            Self::File => "file",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-block metadata attached by the structural synchronizer.
///
/// Lives beside the content rather than inside the field list so it can never
/// collide with a user field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockExtensions {
    /// Field key to external binding id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bindings: Option<BTreeMap<String, String>>,
    /// Opaque status option set, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_options: Option<serde_json::Value>,
    /// Id configuration that differs from the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_config: Option<IdConfig>,
}

impl BlockExtensions {
    pub fn is_empty(&self) -> bool {
        self.bindings.is_none() && self.status_options.is_none() && self.id_config.is_none()
    }

    /// `None` when nothing is set
    pub fn into_option(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

/// A typed unit of document content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Raw text payload (fence markers and line prefixes excluded)
    pub content: String,
    /// Fence language tag for `code` and `data` blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// One entry per list line, for `list` blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_ref: Option<FileRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<BlockExtensions>,
}

impl Block {
    /// Create a block with only id, type and content set
    pub fn new(id: BlockId, block_type: BlockType, content: impl Into<String>) -> Self {
        Self {
            id,
            block_type,
            content: content.into(),
            language: None,
            items: None,
            file_ref: None,
            extensions: None,
        }
    }

    pub fn paragraph(id: BlockId, content: impl Into<String>) -> Self {
        Self::new(id, BlockType::Paragraph, content)
    }

    pub fn code(id: BlockId, language: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::new(id, BlockType::Code, content)
        }
    }

    /// A `data` block tagged `yaml`
    pub fn data(id: BlockId, content: impl Into<String>) -> Self {
        Self {
            language: Some("yaml".to_string()),
            ..Self::new(id, BlockType::Data, content)
        }
    }

    /// A `list` block; `content` mirrors the items joined by newlines
    pub fn list(id: BlockId, items: Vec<String>) -> Self {
        Self {
            items: Some(items.clone()),
            ..Self::new(id, BlockType::List, items.join("\n"))
        }
    }

    pub fn divider(id: BlockId) -> Self {
        Self::new(id, BlockType::Divider, "")
    }

    pub fn file(id: BlockId, file_ref: FileRef, content: impl Into<String>) -> Self {
        Self {
            file_ref: Some(file_ref),
            ..Self::new(id, BlockType::File, content)
        }
    }

    /// List items, falling back to the content lines when `items` is unset
    pub fn list_items(&self) -> Vec<String> {
        match &self.items {
            Some(items) => items.clone(),
            None => self.content.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn is_data(&self) -> bool {
        self.block_type == BlockType::Data
    }
}

/// Supplies fresh block ids.
///
/// Id allocation is threaded through callers explicitly; there is no process
/// wide counter.
pub trait BlockIdSource {
    fn next_id(&mut self) -> BlockId;
}

/// Random v4 UUID ids
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl BlockIdSource for UuidIds {
    fn next_id(&mut self) -> BlockId {
        BlockId(Uuid::new_v4().to_string())
    }
}

/// Counter-based ids: `{prefix}{n}` starting at `next`
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, next: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next,
        }
    }

    /// The value the next id will carry
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl BlockIdSource for SequentialIds {
    fn next_id(&mut self) -> BlockId {
        let id = BlockId(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}
