// SPDX-License-Identifier: Apache-2.0

use core::mem;

use crate::error::NoMemory;
use crate::pool::{ResourceManager, SlotId, NULL_SLOT};
use crate::strings::StringRef;

/// Head and tail of an intrusive, singly-linked list of slots.
///
/// Shared by arrays (anonymous slots) and objects (keyed slots). An empty
/// collection has both ends at [`NULL_SLOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CollectionData {
    pub head: SlotId,
    pub tail: SlotId,
}

impl Default for CollectionData {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl CollectionData {
    pub const EMPTY: Self = Self {
        head: NULL_SLOT,
        tail: NULL_SLOT,
    };

    pub fn is_empty(&self) -> bool {
        self.head == NULL_SLOT
    }

    pub fn slots<'a>(&self, resources: &'a ResourceManager) -> SlotIter<'a> {
        SlotIter {
            resources,
            next: self.head,
        }
    }

    pub fn len(&self, resources: &ResourceManager) -> usize {
        self.slots(resources).count()
    }

    pub fn get(&self, index: usize, resources: &ResourceManager) -> Option<SlotId> {
        self.slots(resources).nth(index)
    }

    pub fn find_key(&self, key: &[u8], resources: &ResourceManager) -> Option<SlotId> {
        self.slots(resources).find(|&id| {
            resources
                .slot(id)
                .key
                .is_some_and(|k| resources.string_bytes(k) == key)
        })
    }

    /// Links an unlinked slot at the end, in O(1).
    pub fn append(&mut self, id: SlotId, resources: &mut ResourceManager) {
        debug_assert_eq!(resources.slot(id).next, NULL_SLOT);
        if self.tail == NULL_SLOT {
            self.head = id;
        } else {
            resources.slot_mut(self.tail).next = id;
        }
        self.tail = id;
    }

    /// Links an unlinked slot before the element at `index`; `index == len`
    /// appends. Returns false when `index` is past the end.
    pub fn insert_at(&mut self, index: usize, id: SlotId, resources: &mut ResourceManager) -> bool {
        if index == 0 {
            resources.slot_mut(id).next = self.head;
            self.head = id;
            if self.tail == NULL_SLOT {
                self.tail = id;
            }
            return true;
        }
        let Some(prev) = self.get(index - 1, resources) else {
            return false;
        };
        let next = resources.slot(prev).next;
        resources.slot_mut(id).next = next;
        resources.slot_mut(prev).next = id;
        if prev == self.tail {
            self.tail = id;
        }
        true
    }

    /// Unlinks `id` without freeing it. Walks from the head.
    pub fn unlink(&mut self, id: SlotId, resources: &mut ResourceManager) -> bool {
        let mut prev = NULL_SLOT;
        let mut current = self.head;
        while current != NULL_SLOT {
            let next = resources.slot(current).next;
            if current == id {
                if prev == NULL_SLOT {
                    self.head = next;
                } else {
                    resources.slot_mut(prev).next = next;
                }
                if self.tail == id {
                    self.tail = prev;
                }
                resources.slot_mut(id).next = NULL_SLOT;
                return true;
            }
            prev = current;
            current = next;
        }
        false
    }

    /// Slot of the member keyed by the pending string of the builder.
    ///
    /// An existing member is emptied and reused, so a repeated key
    /// overwrites in place; otherwise the key is committed to the pool and a
    /// new slot appended.
    pub fn claim_member(&mut self, resources: &mut ResourceManager) -> Result<SlotId, NoMemory> {
        if let Some(id) = self.find_key(resources.pending_string(), resources) {
            resources.discard_string();
            let old = mem::take(&mut resources.slot_mut(id).data);
            old.release(resources);
            return Ok(id);
        }
        let key = StringRef::Owned(resources.commit_string()?);
        let id = match resources.alloc_slot() {
            Ok(id) => id,
            Err(e) => {
                resources.release_string(key);
                return Err(e);
            }
        };
        resources.slot_mut(id).key = Some(key);
        self.append(id, resources);
        Ok(id)
    }

    pub fn remove_slot(&mut self, id: SlotId, resources: &mut ResourceManager) {
        if self.unlink(id, resources) {
            resources.free_slot(id);
        }
    }

    /// Frees every slot of the collection, recursively.
    pub fn release(self, resources: &mut ResourceManager) {
        let mut id = self.head;
        while id != NULL_SLOT {
            let next = resources.slot(id).next;
            resources.free_slot(id);
            id = next;
        }
    }
}

/// Slot ids of a collection, in list order.
pub(crate) struct SlotIter<'a> {
    resources: &'a ResourceManager,
    next: SlotId,
}

impl Iterator for SlotIter<'_> {
    type Item = SlotId;

    fn next(&mut self) -> Option<SlotId> {
        if self.next == NULL_SLOT {
            return None;
        }
        let id = self.next;
        self.next = self.resources.slot(id).next;
        Some(id)
    }
}
