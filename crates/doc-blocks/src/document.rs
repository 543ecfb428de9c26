//! Editable document
//!
//! [`Document`] owns a block list plus the id source used for new blocks and
//! offers the edits a host performs: insert, retype, update, move, remove,
//! field edits on data blocks, and structural sync. Rendering goes through
//! [`crate::writer::serialize`], so the text never leaves canonical form.

use crate::block::{Block, BlockId, BlockIdSource, BlockType, UuidIds};
use crate::data::{self, DataFields, Field, FieldValue, ID_KEY, TYPE_KEY};
use crate::error::{Error, Result};
use crate::id::{IdConfig, generate_id, next_sequence};
use crate::parser::{DEFAULT_CODE_LANGUAGE, is_data_language, parse_with};
use crate::sync::{SyncOptions, SyncOutcome, sync_structure};
use crate::writer::{DEFAULT_DATA_LANGUAGE, serialize};

/// Where to put a block in a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BlockLocation {
    /// Append to end of document
    #[default]
    End,
    /// Directly after the given block
    After(BlockId),
    /// Directly before the given block
    Before(BlockId),
    /// At a position in the block list
    Offset(usize),
}

/// A block list being edited
#[derive(Debug, Clone)]
pub struct Document<S: BlockIdSource = UuidIds> {
    blocks: Vec<Block>,
    /// Rendered text at load time (for is_modified tracking)
    baseline: String,
    ids: S,
}

impl Document<UuidIds> {
    /// Parse text, giving blocks random ids
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, UuidIds)
    }
}

impl<S: BlockIdSource> Document<S> {
    /// Parse text, drawing ids for parsed and inserted blocks from `ids`
    pub fn parse_with(text: &str, mut ids: S) -> Self {
        let blocks = parse_with(text, &mut ids);
        Self::from_blocks(blocks, ids)
    }

    pub fn from_blocks(blocks: Vec<Block>, ids: S) -> Self {
        let baseline = serialize(&blocks);
        Self {
            blocks,
            baseline,
            ids,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    /// Render the current blocks
    pub fn render(&self) -> String {
        serialize(&self.blocks)
    }

    /// Whether rendering now differs from rendering at load time
    pub fn is_modified(&self) -> bool {
        self.render() != self.baseline
    }

    /// Give an empty document a single empty paragraph to type into.
    ///
    /// Returns the new block's id, or `None` when blocks already exist.
    pub fn ensure_non_empty(&mut self) -> Option<BlockId> {
        if !self.blocks.is_empty() {
            return None;
        }
        let id = self.ids.next_id();
        self.blocks.push(Block::paragraph(id.clone(), ""));
        Some(id)
    }

    /// Insert an empty block of `block_type` and return its id
    pub fn insert_block(&mut self, location: BlockLocation, block_type: BlockType) -> Result<BlockId> {
        let index = self.resolve(&location)?;
        let id = self.ids.next_id();
        let mut block = Block::new(id.clone(), block_type, "");
        normalize_for_type(&mut block);
        self.blocks.insert(index, block);
        tracing::debug!(block = %id, block_type = %block_type, index, "Inserted block");
        Ok(id)
    }

    /// Insert a fully formed block, replacing its id with a fresh one
    pub fn insert(&mut self, location: BlockLocation, mut block: Block) -> Result<BlockId> {
        let index = self.resolve(&location)?;
        block.id = self.ids.next_id();
        let id = block.id.clone();
        self.blocks.insert(index, block);
        Ok(id)
    }

    /// Insert a data record of `target_type` with every key in `field_keys`.
    ///
    /// `type` is set to `target_type`. When `id` is a schema key and the id
    /// configuration is not frozen, it gets the next free sequence among
    /// existing records of the same type.
    pub fn insert_record(
        &mut self,
        location: BlockLocation,
        target_type: &str,
        field_keys: &[String],
        id_config: Option<&IdConfig>,
    ) -> Result<BlockId> {
        let mut fields = DataFields::new();
        for key in field_keys {
            if key == TYPE_KEY {
                fields.set(key.clone(), target_type);
            } else if key == ID_KEY {
                match id_config {
                    Some(config) if config.frozen => {}
                    Some(config) => fields.set(key.clone(), self.next_record_id(target_type, config)),
                    None => fields.set(key.clone(), FieldValue::empty()),
                }
            } else {
                fields.set(key.clone(), FieldValue::empty());
            }
        }
        if !fields.contains_key(TYPE_KEY) {
            fields = std::iter::once(Field::new(TYPE_KEY, target_type))
                .chain(fields)
                .collect();
        }

        let index = self.resolve(&location)?;
        let id = self.ids.next_id();
        self.blocks
            .insert(index, Block::data(id.clone(), data::encode(&fields)));
        Ok(id)
    }

    /// Change a block's type, keeping its content
    pub fn retype_block(&mut self, id: &BlockId, block_type: BlockType) -> Result<()> {
        let block = self.block_mut(id)?;
        block.block_type = block_type;
        normalize_for_type(block);
        Ok(())
    }

    /// Replace a block's content; list items follow the new lines
    pub fn update_content(&mut self, id: &BlockId, content: impl Into<String>) -> Result<()> {
        let block = self.block_mut(id)?;
        block.content = content.into();
        if block.block_type == BlockType::List {
            block.items = Some(block.content.split('\n').map(str::to_string).collect());
        }
        Ok(())
    }

    pub fn remove_block(&mut self, id: &BlockId) -> Result<Block> {
        let index = self.index_of(id)?;
        Ok(self.blocks.remove(index))
    }

    /// Move a block.
    ///
    /// `Offset` positions count in the list with the block detached. A
    /// location relative to the block itself leaves it in place.
    pub fn move_block(&mut self, id: &BlockId, location: BlockLocation) -> Result<()> {
        if matches!(&location, BlockLocation::After(target) | BlockLocation::Before(target) if target == id)
        {
            return self.index_of(id).map(|_| ());
        }

        let index = self.index_of(id)?;
        let block = self.blocks.remove(index);
        match self.resolve(&location) {
            Ok(to) => {
                self.blocks.insert(to, block);
                Ok(())
            }
            Err(err) => {
                self.blocks.insert(index, block);
                Err(err)
            }
        }
    }

    /// Decoded fields of a data block
    pub fn fields(&self, id: &BlockId) -> Result<DataFields> {
        Ok(data::decode(&self.data_block(id)?.content))
    }

    /// Set one field from user-typed text, coercing booleans and numbers.
    ///
    /// Fails with [`Error::UndecodableData`] and leaves the block as it was
    /// when the payload is not a flat mapping of scalars.
    pub fn set_field(&mut self, id: &BlockId, key: &str, raw: &str) -> Result<()> {
        let mut fields = self.editable_fields(id)?;
        fields.set(key, FieldValue::coerce(raw));
        self.block_mut(id)?.content = data::encode(&fields);
        Ok(())
    }

    /// Remove one field; returns the old value if it was present
    pub fn remove_field(&mut self, id: &BlockId, key: &str) -> Result<Option<FieldValue>> {
        let mut fields = self.editable_fields(id)?;
        let removed = fields.remove(key);
        if removed.is_some() {
            self.block_mut(id)?.content = data::encode(&fields);
        }
        Ok(removed)
    }

    /// Run the structural synchronizer over this document in place.
    ///
    /// Returns the outcome with `blocks` emptied; the rewritten blocks are
    /// now the document's.
    pub fn apply_sync(
        &mut self,
        target_type: &str,
        field_keys: &[String],
        options: &SyncOptions,
    ) -> SyncOutcome {
        let mut outcome = sync_structure(&self.blocks, target_type, field_keys, options);
        self.blocks = std::mem::take(&mut outcome.blocks);
        outcome
    }

    /// The id a new record of `target_type` should get
    pub fn next_record_id(&self, target_type: &str, config: &IdConfig) -> String {
        let existing: Vec<String> = self
            .blocks
            .iter()
            .filter(|b| b.is_data())
            .map(|b| data::decode(&b.content))
            .filter(|f| f.data_type().as_deref() == Some(target_type))
            .filter_map(|f| f.get(ID_KEY).map(ToString::to_string))
            .collect();
        let sequence = next_sequence(config, existing.iter().map(String::as_str));
        generate_id(config, sequence)
    }

    fn data_block(&self, id: &BlockId) -> Result<&Block> {
        let block = self.get(id).ok_or_else(|| Error::not_found(id))?;
        if !block.is_data() {
            return Err(Error::NotDataBlock { id: id.clone() });
        }
        Ok(block)
    }

    /// Fields that can be re-encoded without losing anything
    fn editable_fields(&self, id: &BlockId) -> Result<DataFields> {
        let block = self.data_block(id)?;
        data::try_decode(&block.content).map_err(|reason| Error::UndecodableData {
            id: id.clone(),
            reason,
        })
    }

    fn index_of(&self, id: &BlockId) -> Result<usize> {
        self.blocks
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| Error::not_found(id))
    }

    fn block_mut(&mut self, id: &BlockId) -> Result<&mut Block> {
        self.blocks
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| Error::not_found(id))
    }

    /// Insertion index for `location`
    fn resolve(&self, location: &BlockLocation) -> Result<usize> {
        match location {
            BlockLocation::End => Ok(self.blocks.len()),
            BlockLocation::After(id) => self.index_of(id).map(|i| i + 1),
            BlockLocation::Before(id) => self.index_of(id),
            BlockLocation::Offset(position) if *position <= self.blocks.len() => Ok(*position),
            BlockLocation::Offset(position) => Err(Error::PositionOutOfRange {
                position: *position,
                len: self.blocks.len(),
            }),
        }
    }
}

/// Make the optional fields agree with the block's type
fn normalize_for_type(block: &mut Block) {
    match block.block_type {
        BlockType::Code if block.language.is_none() => {
            block.language = Some(DEFAULT_CODE_LANGUAGE.to_string());
        }
        BlockType::Data if !block.language.as_deref().is_some_and(is_data_language) => {
            block.language = Some(DEFAULT_DATA_LANGUAGE.to_string());
        }
        other if !other.is_fenced() => block.language = None,
        _ => {}
    }

    if block.block_type == BlockType::List {
        if block.items.is_none() {
            block.items = Some(block.content.split('\n').map(str::to_string).collect());
        }
    } else {
        block.items = None;
    }

    if block.block_type != BlockType::File {
        block.file_ref = None;
    }
    if block.block_type == BlockType::Divider {
        block.content.clear();
    }
}
