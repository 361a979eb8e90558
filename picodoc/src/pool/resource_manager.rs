// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;
use core::mem;

use log::debug;

use super::slot::{SlotId, VariantSlot};
use super::slot_pool::SlotPool;
use super::string_pool::{StringId, StringPool};
use crate::error::NoMemory;
use crate::strings::{AdaptedString, StringRef};

/// Sizing of a document's pool.
///
/// Slots are allocated in blocks of `block_slots`; `max_blocks` caps the
/// number of blocks and `max_string_bytes` caps the total size of owned
/// strings. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub block_slots: usize,
    pub max_blocks: Option<usize>,
    pub max_string_bytes: Option<usize>,
}

impl PoolConfig {
    pub const DEFAULT_BLOCK_SLOTS: usize = 128;

    /// A pool that grows block by block until the allocator refuses.
    pub const fn growable() -> Self {
        Self {
            block_slots: Self::DEFAULT_BLOCK_SLOTS,
            max_blocks: None,
            max_string_bytes: None,
        }
    }

    /// A pool with room for exactly `slots` nodes and `string_bytes` bytes
    /// of owned strings.
    pub const fn fixed(slots: usize, string_bytes: usize) -> Self {
        if slots == 0 {
            Self {
                block_slots: 1,
                max_blocks: Some(0),
                max_string_bytes: Some(string_bytes),
            }
        } else {
            Self {
                block_slots: slots,
                max_blocks: Some(1),
                max_string_bytes: Some(string_bytes),
            }
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::growable()
    }
}

/// Owner of every slot and string of a document.
#[derive(Debug)]
pub(crate) struct ResourceManager {
    config: PoolConfig,
    slots: SlotPool,
    strings: StringPool,
    /// Scratch space for a string being decoded, charged to the string budget.
    builder: Vec<u8>,
    overflowed: bool,
}

impl ResourceManager {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            slots: SlotPool::new(config.block_slots, config.max_blocks),
            strings: StringPool::new(config.max_string_bytes),
            builder: Vec::new(),
            overflowed: false,
        }
    }

    pub fn config(&self) -> PoolConfig {
        self.config
    }

    fn note_failure<T>(&mut self, result: Result<T, NoMemory>) -> Result<T, NoMemory> {
        if result.is_err() {
            self.overflowed = true;
        }
        result
    }

    pub fn alloc_slot(&mut self) -> Result<SlotId, NoMemory> {
        let result = self.slots.alloc();
        self.note_failure(result)
    }

    /// Releases a slot's key and value (recursively) and recycles it.
    pub fn free_slot(&mut self, id: SlotId) {
        let slot = mem::take(self.slots.get_mut(id));
        if let Some(key) = slot.key {
            self.release_string(key);
        }
        slot.data.release(self);
        self.slots.free(id);
    }

    pub fn slot(&self, id: SlotId) -> &VariantSlot {
        self.slots.get(id)
    }

    pub fn slot_mut(&mut self, id: SlotId) -> &mut VariantSlot {
        self.slots.get_mut(id)
    }

    /// Stores an adapted string: linked strings by address, others by copy.
    /// A null string yields `None`.
    pub fn intern(&mut self, string: AdaptedString<'_>) -> Result<Option<StringRef>, NoMemory> {
        match string {
            AdaptedString::Null => Ok(None),
            AdaptedString::Linked(bytes) => Ok(Some(StringRef::Linked(bytes))),
            AdaptedString::Borrowed(bytes) => self.save_string(bytes).map(|id| Some(StringRef::Owned(id))),
        }
    }

    pub fn save_string(&mut self, bytes: &[u8]) -> Result<StringId, NoMemory> {
        let result = self.strings.save(bytes);
        self.note_failure(result)
    }

    pub fn string_bytes(&self, string: StringRef) -> &[u8] {
        match string {
            StringRef::Linked(bytes) => bytes,
            StringRef::Owned(id) => self.strings.get(id),
        }
    }

    pub fn release_string(&mut self, string: StringRef) {
        if let StringRef::Owned(id) = string {
            self.strings.release(id);
        }
    }

    /// Reference count of the owned copy of `bytes`, 0 when none exists.
    pub fn string_refs(&self, bytes: &[u8]) -> usize {
        self.strings
            .find(bytes)
            .map_or(0, |id| self.strings.refs(id))
    }

    /// Starts a new string in the scratch builder.
    pub fn begin_string(&mut self) {
        self.builder.clear();
    }

    pub fn append_byte(&mut self, byte: u8) -> Result<(), NoMemory> {
        self.append_bytes(&[byte])
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<(), NoMemory> {
        let fits = self
            .builder
            .len()
            .checked_add(bytes.len())
            .is_some_and(|len| self.strings.has_room(len));
        let result = if fits {
            self.builder
                .try_reserve(bytes.len())
                .map(|_| self.builder.extend_from_slice(bytes))
                .map_err(|_| NoMemory)
        } else {
            Err(NoMemory)
        };
        self.note_failure(result)
    }

    /// The string built so far.
    pub fn pending_string(&self) -> &[u8] {
        &self.builder
    }

    /// Moves the built string into the pool, deduplicating it.
    pub fn commit_string(&mut self) -> Result<StringId, NoMemory> {
        let result = self.strings.save(&self.builder);
        self.builder.clear();
        self.note_failure(result)
    }

    pub fn discard_string(&mut self) {
        self.builder.clear();
    }

    pub fn clear(&mut self) {
        if self.slots.live() > 0 || self.strings.live() > 0 {
            debug!(
                "clearing pool: {} slots, {} strings",
                self.slots.live(),
                self.strings.live()
            );
        }
        self.slots.clear();
        self.strings.clear();
        self.builder.clear();
        self.overflowed = false;
    }

    pub fn shrink_to_fit(&mut self) {
        self.slots.shrink_to_fit();
        self.strings.shrink_to_fit();
        self.builder = Vec::new();
    }

    pub fn memory_usage(&self) -> usize {
        self.slots.live() * mem::size_of::<VariantSlot>() + self.strings.bytes_used()
    }

    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn slot_count(&self) -> usize {
        self.slots.live()
    }

    pub fn string_count(&self) -> usize {
        self.strings.live()
    }
}
