// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use super::slot::{slot_id_from_index, SlotId};
use crate::error::NoMemory;

/// Index of an owned string record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StringId(SlotId);

impl StringId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct StringRecord {
    bytes: Vec<u8>,
    refs: usize,
}

#[derive(Debug)]
enum StringEntry {
    Live(StringRecord),
    Vacant { next: Option<usize> },
}

/// Reference-counted, deduplicated owned strings.
///
/// Saving bytes that are already present returns the existing record with
/// its count bumped. Lookups compare the full bytes.
#[derive(Debug)]
pub(crate) struct StringPool {
    entries: Vec<StringEntry>,
    free_head: Option<usize>,
    live: usize,
    bytes_used: usize,
    max_bytes: Option<usize>,
}

impl StringPool {
    pub fn new(max_bytes: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
            live: 0,
            bytes_used: 0,
            max_bytes,
        }
    }

    /// Whether `extra` more bytes fit in the string budget.
    pub fn has_room(&self, extra: usize) -> bool {
        match self.max_bytes {
            Some(max) => self
                .bytes_used
                .checked_add(extra)
                .is_some_and(|total| total <= max),
            None => true,
        }
    }

    pub fn find(&self, bytes: &[u8]) -> Option<StringId> {
        self.entries.iter().enumerate().find_map(|(index, entry)| match entry {
            StringEntry::Live(record) if record.bytes == bytes => {
                slot_id_from_index(index).map(StringId)
            }
            _ => None,
        })
    }

    /// Returns the record holding `bytes`, copying them in on a miss.
    pub fn save(&mut self, bytes: &[u8]) -> Result<StringId, NoMemory> {
        if let Some(id) = self.find(bytes) {
            self.add_ref(id);
            return Ok(id);
        }
        if !self.has_room(bytes.len()) {
            return Err(NoMemory);
        }
        let mut copy = Vec::new();
        copy.try_reserve_exact(bytes.len()).map_err(|_| NoMemory)?;
        copy.extend_from_slice(bytes);
        self.insert(copy)
    }

    fn insert(&mut self, bytes: Vec<u8>) -> Result<StringId, NoMemory> {
        let len = bytes.len();
        let record = StringEntry::Live(StringRecord { bytes, refs: 1 });
        let index = match self.free_head {
            Some(index) => {
                let id = slot_id_from_index(index).ok_or(NoMemory)?;
                if let StringEntry::Vacant { next } = self.entries[index] {
                    self.free_head = next;
                }
                self.entries[index] = record;
                id
            }
            None => {
                let id = slot_id_from_index(self.entries.len()).ok_or(NoMemory)?;
                self.entries.try_reserve(1).map_err(|_| NoMemory)?;
                self.entries.push(record);
                id
            }
        };
        self.live += 1;
        self.bytes_used += len;
        Ok(StringId(index))
    }

    pub fn add_ref(&mut self, id: StringId) {
        if let Some(StringEntry::Live(record)) = self.entries.get_mut(id.index()) {
            record.refs += 1;
        } else {
            debug_assert!(false, "add_ref on a vacant string record");
        }
    }

    /// Drops one reference, freeing the record when it was the last.
    pub fn release(&mut self, id: StringId) {
        let index = id.index();
        let Some(StringEntry::Live(record)) = self.entries.get_mut(index) else {
            debug_assert!(false, "release of a vacant string record");
            return;
        };
        record.refs -= 1;
        if record.refs == 0 {
            self.bytes_used -= record.bytes.len();
            self.live -= 1;
            self.entries[index] = StringEntry::Vacant {
                next: self.free_head,
            };
            self.free_head = Some(index);
        }
    }

    pub fn get(&self, id: StringId) -> &[u8] {
        match self.entries.get(id.index()) {
            Some(StringEntry::Live(record)) => record.bytes.as_slice(),
            _ => {
                debug_assert!(false, "read of a vacant string record");
                &[]
            }
        }
    }

    pub fn refs(&self, id: StringId) -> usize {
        match self.entries.get(id.index()) {
            Some(StringEntry::Live(record)) => record.refs,
            _ => 0,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.free_head = None;
        self.live = 0;
        self.bytes_used = 0;
    }

    pub fn shrink_to_fit(&mut self) {
        // vacant entries at the tail can go; the rest keep their index
        while let Some(StringEntry::Vacant { .. }) = self.entries.last() {
            self.entries.pop();
        }
        self.rebuild_free_list();
        self.entries.shrink_to_fit();
    }

    fn rebuild_free_list(&mut self) {
        let mut head = None;
        for (index, entry) in self.entries.iter_mut().enumerate().rev() {
            if let StringEntry::Vacant { next } = entry {
                *next = head;
                head = Some(index);
            }
        }
        self.free_head = head;
    }

    /// Number of live string records.
    pub fn live(&self) -> usize {
        self.live
    }

    pub fn bytes_used(&self) -> usize {
        self.bytes_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_returns_same_record() {
        let mut pool = StringPool::new(None);
        let a = pool.save(b"hello").unwrap();
        let b = pool.save(b"hello").unwrap();
        assert_eq!(a, b);
        assert_eq!(pool.live(), 1);
        assert_eq!(pool.refs(a), 2);
        assert_eq!(pool.bytes_used(), 5);
    }

    #[test]
    fn test_release_frees_at_zero() {
        let mut pool = StringPool::new(None);
        let a = pool.save(b"hello").unwrap();
        pool.add_ref(a);
        pool.release(a);
        assert_eq!(pool.live(), 1);
        pool.release(a);
        assert_eq!(pool.live(), 0);
        assert_eq!(pool.bytes_used(), 0);
        assert_eq!(pool.find(b"hello"), None);
    }

    #[test]
    fn test_vacant_entries_are_reused() {
        let mut pool = StringPool::new(None);
        let a = pool.save(b"one").unwrap();
        let _b = pool.save(b"two").unwrap();
        pool.release(a);
        let c = pool.save(b"three").unwrap();
        assert_eq!(a, c);
        assert_eq!(pool.get(c), b"three");
    }

    #[test]
    fn test_budget_is_enforced() {
        let mut pool = StringPool::new(Some(8));
        pool.save(b"12345").unwrap();
        assert_eq!(pool.save(b"6789"), Err(NoMemory));
        // a dedup hit needs no new bytes
        assert!(pool.save(b"12345").is_ok());
        assert!(pool.save(b"678").is_ok());
    }

    #[test]
    fn test_shrink_drops_trailing_vacancies() {
        let mut pool = StringPool::new(None);
        let a = pool.save(b"a").unwrap();
        let b = pool.save(b"b").unwrap();
        let c = pool.save(b"c").unwrap();
        pool.release(b);
        pool.release(c);
        pool.shrink_to_fit();
        assert_eq!(pool.get(a), b"a");
        let d = pool.save(b"d").unwrap();
        assert_eq!(d, b);
    }
}
