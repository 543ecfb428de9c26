//! Command implementations for doc-cli

pub mod edit;
pub mod fmt;
pub mod id;
pub mod parse;
pub mod sync;
pub mod version;

pub use edit::{run_add, run_set};
pub use fmt::run_fmt;
pub use id::run_id;
pub use parse::run_parse;
pub use sync::run_sync;
pub use version::{run_version_bump, run_version_check};

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use doc_blocks::{BlockExtensions, Document, SequentialIds, parse_with};

use crate::error::{CliError, Result};

/// Prefix of the positional block ids shown to users
pub const BLOCK_ID_PREFIX: &str = "b";

/// Suffix of the file holding sync metadata next to a document
pub const METADATA_SUFFIX: &str = ".blocks.json";

/// Sync metadata of a document, keyed by block position
type StoredMetadata = BTreeMap<usize, BlockExtensions>;

/// `notes.md` -> `notes.md.blocks.json`
pub fn metadata_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(METADATA_SUFFIX);
    path.with_file_name(name)
}

/// Load a document with positional ids (`b1`, `b2`, ...) and reattach the
/// sync metadata stored beside it
pub fn load_document(path: &Path) -> Result<Document<SequentialIds>> {
    let text = fs::read_to_string(path)?;
    let mut ids = SequentialIds::new(BLOCK_ID_PREFIX);
    let mut blocks = parse_with(&text, &mut ids);

    for (position, extensions) in load_metadata(path)? {
        match blocks.get_mut(position) {
            Some(block) if block.is_data() => block.extensions = Some(extensions),
            _ => tracing::warn!(
                position,
                path = %path.display(),
                "Stored metadata does not match a data block, ignoring it"
            ),
        }
    }
    Ok(Document::from_blocks(blocks, ids))
}

fn load_metadata(path: &Path) -> Result<StoredMetadata> {
    let meta_path = metadata_path(path);
    if !meta_path.exists() {
        return Ok(StoredMetadata::new());
    }
    let content = fs::read_to_string(&meta_path)?;
    serde_json::from_str(&content).map_err(|e| CliError::Metadata {
        path: meta_path.clone(),
        message: e.to_string(),
    })
}

/// Rendered file contents: the serialized text plus a final newline
pub fn file_text(rendered: &str) -> String {
    if rendered.is_empty() {
        String::new()
    } else {
        format!("{rendered}\n")
    }
}

/// Write the document text, and its sync metadata when any block has some
pub fn save_document(path: &Path, doc: &Document<SequentialIds>) -> Result<()> {
    let rendered = doc.render();
    fs::write(path, file_text(&rendered))?;
    tracing::debug!(path = %path.display(), bytes = rendered.len(), "Wrote document");

    let stored: StoredMetadata = doc
        .blocks()
        .iter()
        .enumerate()
        .filter_map(|(position, block)| block.extensions.clone().map(|ext| (position, ext)))
        .collect();
    let meta_path = metadata_path(path);
    if !stored.is_empty() {
        fs::write(&meta_path, serde_json::to_string_pretty(&stored)?)?;
        tracing::debug!(path = %meta_path.display(), blocks = stored.len(), "Wrote block metadata");
    } else if meta_path.exists() {
        fs::remove_file(&meta_path)?;
    }
    Ok(())
}
