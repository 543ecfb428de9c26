//! Structural synchronizer
//!
//! Puts every `data` block of one declared type onto the same field schema.
//! This is schema enforcement, not a merge: fields outside the schema are
//! dropped, so hosts must get explicit confirmation before calling it.
//!
//! The function is total. Blocks that are not data blocks, or whose payload
//! does not decode, or whose `type` differs from the target, pass through
//! untouched.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockExtensions, BlockId};
use crate::data::{self, DataFields, FieldValue, ID_KEY};
use crate::id::{IdConfig, generate_id};

/// Field whose presence makes status options relevant
pub const STATUS_KEY: &str = "status";

/// Optional inputs to [`sync_structure`], supplied by the template store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Field key to external binding id
    #[serde(default)]
    pub bindings: Option<BTreeMap<String, String>>,
    /// Opaque status option set attached to blocks that carry a `status` field
    #[serde(default)]
    pub status_options: Option<serde_json::Value>,
    /// How `id` fields are filled in
    #[serde(default)]
    pub id_config: Option<IdConfig>,
}

/// Result of a sync pass
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// Every input block, in input order
    pub blocks: Vec<Block>,
    /// Number of blocks whose content or metadata changed
    pub modified: usize,
    /// Ids of the changed blocks, in order
    pub changed: Vec<BlockId>,
    /// Number of blocks that matched the target type
    pub matched: usize,
}

impl SyncOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.modified == 0
    }
}

/// Rewrite every `data` block whose `type` equals `target_type` so its fields
/// are exactly `field_keys`, in that order.
///
/// - Repeated keys count once, at their first position.
/// - Existing values are carried forward for keys that stay in the schema.
/// - New keys default to an empty string.
/// - `id` is regenerated from `options.id_config` unless that configuration is
///   frozen. One counter starting at `start_from` is shared by every block
///   rewritten in this call.
/// - Blocks whose encoding and metadata come out identical are returned as-is
///   and not counted.
///
/// ```
/// use doc_blocks::{Block, BlockId, SyncOptions, decode, sync_structure};
///
/// let blocks = vec![
///     Block::data(BlockId::new("a"), "type: contact\nname: Ada\nemail: ada@example.com"),
///     Block::data(BlockId::new("b"), "type: contact\nname: Bob\nphone: 555"),
/// ];
/// let keys = ["name", "email", "phone"].map(String::from);
/// let outcome = sync_structure(&blocks, "contact", &keys, &SyncOptions::default());
///
/// assert_eq!(outcome.modified, 2);
/// let fields = decode(&outcome.blocks[1].content);
/// assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["name", "email", "phone"]);
/// assert_eq!(fields.get("phone").map(|v| v.to_string()).as_deref(), Some("555"));
/// ```
pub fn sync_structure(
    blocks: &[Block],
    target_type: &str,
    field_keys: &[String],
    options: &SyncOptions,
) -> SyncOutcome {
    let mut seen = HashSet::new();
    let schema: Vec<&str> = field_keys
        .iter()
        .map(String::as_str)
        .filter(|key| seen.insert(*key))
        .collect();
    let id_policy = IdPolicy::from_config(options.id_config.as_ref());
    let mut next_sequence = options.id_config.as_ref().map_or(0, |c| c.start_from);
    let mut out = Vec::with_capacity(blocks.len());
    let mut changed = Vec::new();
    let mut matched = 0;

    for block in blocks {
        let Some(fields) = matching_fields(block, target_type) else {
            out.push(block.clone());
            continue;
        };
        matched += 1;

        let mut rebuilt = DataFields::new();
        for &key in &schema {
            if key == ID_KEY {
                match id_policy {
                    IdPolicy::Generate(config) => {
                        rebuilt.set(key, generate_id(config, next_sequence));
                        next_sequence = next_sequence.saturating_add(1);
                    }
                    IdPolicy::Keep => {
                        let value = fields.get(key).cloned().unwrap_or_else(FieldValue::empty);
                        rebuilt.set(key, value);
                    }
                    IdPolicy::Frozen => {
                        if let Some(value) = fields.get(key) {
                            rebuilt.set(key, value.clone());
                        }
                    }
                }
                continue;
            }

            let value = fields.get(key).cloned().unwrap_or_else(FieldValue::empty);
            rebuilt.set(key, value);
        }

        let extensions = build_extensions(&rebuilt, field_keys, options);
        let content = data::encode(&rebuilt);

        if content == block.content && extensions == block.extensions {
            out.push(block.clone());
            continue;
        }

        tracing::debug!(block = %block.id, fields = rebuilt.len(), "Rewrote data block");
        changed.push(block.id.clone());
        out.push(Block {
            content,
            extensions,
            ..block.clone()
        });
    }

    tracing::info!(
        target_type,
        matched,
        modified = changed.len(),
        "Structural sync complete"
    );

    SyncOutcome {
        blocks: out,
        modified: changed.len(),
        changed,
        matched,
    }
}

/// How the `id` field is produced for one sync pass
#[derive(Debug, Clone, Copy)]
enum IdPolicy<'a> {
    /// No id configuration: keep what is there, default the rest
    Keep,
    /// Frozen configuration: keep what is there, never invent one
    Frozen,
    Generate(&'a IdConfig),
}

impl<'a> IdPolicy<'a> {
    fn from_config(config: Option<&'a IdConfig>) -> Self {
        match config {
            None => Self::Keep,
            Some(c) if c.frozen => Self::Frozen,
            Some(c) => Self::Generate(c),
        }
    }
}

/// Decoded fields of `block` when it is a data block of `target_type`
fn matching_fields(block: &Block, target_type: &str) -> Option<DataFields> {
    if !block.is_data() {
        return None;
    }
    let fields = data::decode(&block.content);
    (fields.data_type().as_deref() == Some(target_type)).then_some(fields)
}

/// Metadata for a rewritten block, built fresh from this pass's inputs
fn build_extensions(
    fields: &DataFields,
    field_keys: &[String],
    options: &SyncOptions,
) -> Option<BlockExtensions> {
    let bindings = options.bindings.as_ref().and_then(|bindings| {
        let kept: BTreeMap<_, _> = bindings
            .iter()
            .filter(|(key, _)| field_keys.contains(key))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        (!kept.is_empty()).then_some(kept)
    });

    let status_options = options
        .status_options
        .clone()
        .filter(|_| fields.contains_key(STATUS_KEY));

    let id_config = options.id_config.clone().filter(|c| !c.is_default());

    BlockExtensions {
        bindings,
        status_options,
        id_config,
    }
    .into_option()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn data(id: &str, content: &str) -> Block {
        Block::data(BlockId::new(id), content)
    }

    #[test]
    fn test_non_matching_blocks_untouched() {
        let blocks = vec![
            Block::paragraph(BlockId::new("p"), "type: contact"),
            data("d", "type: invoice\nname: x"),
            Block::code(BlockId::new("c"), "yaml", "type: contact"),
        ];
        let outcome = sync_structure(&blocks, "contact", &keys(&["name"]), &SyncOptions::default());
        assert_eq!(outcome.blocks, blocks);
        assert_eq!(outcome.matched, 0);
        assert!(outcome.is_unchanged());
    }

    #[test]
    fn test_already_conforming_block_not_counted() {
        let blocks = vec![data("d", "type: contact\nname: Ada")];
        let outcome = sync_structure(
            &blocks,
            "contact",
            &keys(&["type", "name"]),
            &SyncOptions::default(),
        );
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.modified, 0);
        assert_eq!(outcome.blocks, blocks);
    }

    #[test]
    fn test_id_counter_shared_across_blocks() {
        let blocks = vec![
            data("a", "type: t\nid: old-1"),
            Block::paragraph(BlockId::new("p"), "between"),
            data("b", "type: t"),
        ];
        let options = SyncOptions {
            id_config: Some(IdConfig {
                prefix: "T".into(),
                digits: 2,
                start_from: 5,
                ..Default::default()
            }),
            ..Default::default()
        };
        let outcome = sync_structure(&blocks, "t", &keys(&["type", "id"]), &options);
        assert_eq!(outcome.blocks[0].content, "type: t\nid: T-05");
        assert_eq!(outcome.blocks[2].content, "type: t\nid: T-06");
    }

    #[test]
    fn test_repeated_schema_keys_count_once() {
        let blocks = vec![data("a", "type: t"), data("b", "type: t")];
        let options = SyncOptions {
            id_config: Some(IdConfig::default()),
            ..Default::default()
        };
        let outcome = sync_structure(&blocks, "t", &keys(&["type", "id", "name", "id"]), &options);
        assert_eq!(outcome.blocks[0].content, "type: t\nid: ID-0001\nname: ''");
        assert_eq!(outcome.blocks[1].content, "type: t\nid: ID-0002\nname: ''");
    }

    #[test]
    fn test_frozen_id_kept_and_never_invented() {
        let blocks = vec![data("a", "type: t\nid: keep-me"), data("b", "type: t")];
        let options = SyncOptions {
            id_config: Some(IdConfig {
                frozen: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let outcome = sync_structure(&blocks, "t", &keys(&["type", "id", "name"]), &options);
        assert_eq!(outcome.blocks[0].content, "type: t\nid: keep-me\nname: ''");
        assert_eq!(outcome.blocks[1].content, "type: t\nname: ''");
    }

    #[test]
    fn test_missing_id_without_config_defaults_empty() {
        let blocks = vec![data("a", "type: t")];
        let outcome =
            sync_structure(&blocks, "t", &keys(&["type", "id"]), &SyncOptions::default());
        assert_eq!(outcome.blocks[0].content, "type: t\nid: ''");
    }

    #[test]
    fn test_default_id_config_not_persisted() {
        let blocks = vec![data("a", "type: t")];
        let options = SyncOptions {
            id_config: Some(IdConfig::default()),
            ..Default::default()
        };
        let outcome = sync_structure(&blocks, "t", &keys(&["type", "id"]), &options);
        assert_eq!(outcome.blocks[0].extensions, None);
        assert_eq!(outcome.blocks[0].content, "type: t\nid: ID-0001");
    }

    #[test]
    fn test_extensions_filtered_and_attached() {
        let blocks = vec![data("a", "type: t\nstatus: open")];
        let options = SyncOptions {
            bindings: Some(BTreeMap::from([
                ("status".to_string(), "b-1".to_string()),
                ("gone".to_string(), "b-2".to_string()),
            ])),
            status_options: Some(serde_json::json!(["open", "closed"])),
            id_config: Some(IdConfig {
                prefix: "X".into(),
                frozen: true,
                ..Default::default()
            }),
        };
        let outcome = sync_structure(&blocks, "t", &keys(&["type", "status"]), &options);
        let ext = outcome.blocks[0].extensions.clone().unwrap();
        assert_eq!(
            ext.bindings,
            Some(BTreeMap::from([("status".to_string(), "b-1".to_string())]))
        );
        assert_eq!(ext.status_options, Some(serde_json::json!(["open", "closed"])));
        assert_eq!(ext.id_config.map(|c| c.prefix), Some("X".to_string()));
        assert_eq!(outcome.modified, 1);
    }

    #[test]
    fn test_status_options_need_status_field() {
        let blocks = vec![data("a", "type: t")];
        let options = SyncOptions {
            status_options: Some(serde_json::json!({"open": "Open"})),
            ..Default::default()
        };
        let outcome = sync_structure(&blocks, "t", &keys(&["type"]), &options);
        assert_eq!(outcome.blocks[0].extensions, None);
        assert_eq!(outcome.modified, 0);
    }

    #[test]
    fn test_bindings_filtered_to_nothing_are_dropped() {
        let blocks = vec![data("a", "type: t")];
        let options = SyncOptions {
            bindings: Some(BTreeMap::from([("other".to_string(), "b".to_string())])),
            ..Default::default()
        };
        let outcome = sync_structure(&blocks, "t", &keys(&["type"]), &options);
        assert_eq!(outcome.blocks[0].extensions, None);
    }

    #[test]
    fn test_empty_schema_strips_everything() {
        let blocks = vec![data("a", "type: t\nname: x")];
        let outcome = sync_structure(&blocks, "t", &[], &SyncOptions::default());
        assert_eq!(outcome.blocks[0].content, "");
        assert_eq!(outcome.modified, 1);
    }
}
