// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use log::debug;

use super::slot::{slot_id_from_index, SlotId, VariantSlot, NULL_SLOT};
use crate::error::NoMemory;

/// Block-allocated storage for variant slots.
///
/// Slot `id` lives at `blocks[id / block_slots][id % block_slots]`, so ids
/// stay valid when more blocks are added. Released slots are threaded into
/// a free list through their `next` field.
#[derive(Debug)]
pub(crate) struct SlotPool {
    blocks: Vec<Vec<VariantSlot>>,
    block_slots: usize,
    max_blocks: Option<usize>,
    free_head: SlotId,
    live: usize,
}

impl SlotPool {
    pub fn new(block_slots: usize, max_blocks: Option<usize>) -> Self {
        Self {
            blocks: Vec::new(),
            block_slots: block_slots.max(1),
            max_blocks,
            free_head: NULL_SLOT,
            live: 0,
        }
    }

    /// Hands out a reset slot, preferring recycled ones.
    pub fn alloc(&mut self) -> Result<SlotId, NoMemory> {
        if self.free_head != NULL_SLOT {
            let id = self.free_head;
            self.free_head = self.get(id).next;
            *self.get_mut(id) = VariantSlot::default();
            self.live += 1;
            return Ok(id);
        }

        let needs_block = self
            .blocks
            .last()
            .map_or(true, |block| block.len() >= self.block_slots);
        if needs_block {
            self.add_block()?;
        }

        let block_index = self.blocks.len() - 1;
        let block = self.blocks.last_mut().ok_or(NoMemory)?;
        let id = slot_id_from_index(block_index * self.block_slots + block.len()).ok_or(NoMemory)?;
        block.try_reserve(1).map_err(|_| NoMemory)?;
        block.push(VariantSlot::default());
        self.live += 1;
        Ok(id)
    }

    fn add_block(&mut self) -> Result<(), NoMemory> {
        if let Some(max) = self.max_blocks {
            if self.blocks.len() >= max {
                return Err(NoMemory);
            }
        }
        // the first slot of the new block must be addressable
        slot_id_from_index(self.blocks.len() * self.block_slots).ok_or(NoMemory)?;

        let mut block = Vec::new();
        block
            .try_reserve_exact(self.block_slots)
            .map_err(|_| NoMemory)?;
        self.blocks.try_reserve(1).map_err(|_| NoMemory)?;
        self.blocks.push(block);
        if self.blocks.len() > 1 {
            debug!(
                "slot pool grew to {} blocks of {} slots",
                self.blocks.len(),
                self.block_slots
            );
        }
        Ok(())
    }

    /// Returns a slot to the free list. Its content must already be released.
    pub fn free(&mut self, id: SlotId) {
        debug_assert!(self.live > 0);
        let head = self.free_head;
        let slot = self.get_mut(id);
        *slot = VariantSlot::default();
        slot.next = head;
        self.free_head = id;
        self.live -= 1;
    }

    pub fn get(&self, id: SlotId) -> &VariantSlot {
        debug_assert!(id != NULL_SLOT);
        let index = id as usize;
        &self.blocks[index / self.block_slots][index % self.block_slots]
    }

    pub fn get_mut(&mut self, id: SlotId) -> &mut VariantSlot {
        debug_assert!(id != NULL_SLOT);
        let index = id as usize;
        &mut self.blocks[index / self.block_slots][index % self.block_slots]
    }

    /// Forgets every slot but keeps the first block's storage.
    pub fn clear(&mut self) {
        self.blocks.truncate(1);
        if let Some(first) = self.blocks.first_mut() {
            first.clear();
        }
        self.free_head = NULL_SLOT;
        self.live = 0;
    }

    pub fn shrink_to_fit(&mut self) {
        for block in self.blocks.iter_mut() {
            block.shrink_to_fit();
        }
        self.blocks.shrink_to_fit();
    }

    /// Number of slots currently in use.
    pub fn live(&self) -> usize {
        self.live
    }

    #[cfg(test)]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}
