//! Block-structured document model.
//!
//! Converts line-oriented document text into an ordered sequence of typed
//! blocks and back, and keeps `data` blocks that share a declared type on a
//! single field schema.
//!
//! # Layers
//!
//! - [`block`]: the block value types (`Block`, `BlockType`, extension metadata)
//! - [`parser`] / [`writer`]: text to blocks and blocks to text
//! - [`data`]: `key: value` payload codec for `data` blocks
//! - [`id`]: sequence-based identifier formatting
//! - [`version`]: `major.minor[.patch]` version strings
//! - [`sync`]: the structural synchronizer
//! - [`document`]: host-side editing facade over a block list
//!
//! Everything here is a pure function over in-memory values. Nothing reads or
//! writes files; the host owns persistence.
//!
//! ```
//! use doc_blocks::{BlockType, parse, serialize};
//!
//! let blocks = parse("# Title\n\nSome text");
//! assert_eq!(blocks[0].block_type, BlockType::Heading1);
//! assert_eq!(serialize(&blocks), "# Title\n\nSome text");
//! ```

pub mod block;
pub mod data;
pub mod document;
pub mod error;
pub mod id;
pub mod parser;
pub mod sync;
pub mod version;
pub mod writer;

pub use block::{
    Block, BlockExtensions, BlockId, BlockIdSource, BlockType, FileRef, SequentialIds, UuidIds,
};
pub use data::{DataFields, Field, FieldValue, decode, encode};
pub use document::{BlockLocation, Document};
pub use error::{Error, Result};
pub use id::{IdConfig, generate_id, next_sequence, parse_sequence};
pub use parser::{parse, parse_with};
pub use sync::{SyncOptions, SyncOutcome, sync_structure};
pub use version::{Version, VersionError, parse_version, validate_version};
pub use writer::{serialize, serialize_block};
