//! Error types for doc-blocks

use crate::block::BlockId;

/// Result type for doc-blocks operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by host-side editing operations.
///
/// Parsing, serialization, decoding, and structural sync are total and never
/// produce these.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Block not found: {id}")]
    BlockNotFound { id: BlockId },

    #[error("Block {id} is not a data block")]
    NotDataBlock { id: BlockId },

    /// Field edits refuse payloads the flat codec cannot represent
    #[error("Block {id} does not hold flat key/value data: {reason}")]
    UndecodableData { id: BlockId, reason: String },

    #[error("Block position {position} is out of range for {len} blocks")]
    PositionOutOfRange { position: usize, len: usize },
}

impl Error {
    pub fn not_found(id: &BlockId) -> Self {
        Self::BlockNotFound { id: id.clone() }
    }
}
