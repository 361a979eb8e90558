// SPDX-License-Identifier: Apache-2.0

use log::debug;

use crate::error::DecodeError;
use crate::pool::{PoolConfig, ResourceManager, SlotId};
use crate::variant::{copy_data, VariantData, VariantMut, VariantRef};

/// Where a variant lives: the document root or a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Place {
    Root,
    Slot(SlotId),
}

/// A value tree together with the pool that stores it.
///
/// Every node and owned string of the tree lives in the document's pool,
/// and lives exactly as long as the document (or until [`Document::clear`]).
///
/// ```
/// use picodoc::Document;
///
/// let mut doc = Document::new();
/// let mut root = doc.root_mut();
/// let mut object = root.to_object();
/// object.insert("answer", 42);
/// assert_eq!(doc.root().member("answer").to::<i32>(), 42);
/// ```
#[derive(Debug)]
pub struct Document {
    pub(crate) root: VariantData,
    pub(crate) resources: ResourceManager,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with a growable pool.
    pub fn new() -> Self {
        Self::with_config(PoolConfig::growable())
    }

    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            root: VariantData::Null,
            resources: ResourceManager::new(config),
        }
    }

    pub fn config(&self) -> PoolConfig {
        self.resources.config()
    }

    pub fn root(&self) -> VariantRef<'_> {
        VariantRef::new(&self.resources, &self.root)
    }

    pub fn root_mut(&mut self) -> VariantMut<'_> {
        VariantMut::new(self, Place::Root)
    }

    /// Resets the root to null and empties the pool.
    pub fn clear(&mut self) {
        self.root = VariantData::Null;
        self.resources.clear();
    }

    /// Gives unused pool capacity back to the allocator.
    pub fn shrink_to_fit(&mut self) {
        self.resources.shrink_to_fit();
    }

    /// Bytes held by live slots and owned strings.
    pub fn memory_usage(&self) -> usize {
        self.resources.memory_usage()
    }

    /// True when an allocation has failed since the last clear.
    pub fn overflowed(&self) -> bool {
        self.resources.overflowed()
    }

    /// Number of live variant slots.
    pub fn slot_count(&self) -> usize {
        self.resources.slot_count()
    }

    /// Number of live owned strings.
    pub fn string_count(&self) -> usize {
        self.resources.string_count()
    }

    /// References held on the owned copy of `s`; 0 when it is not stored.
    pub fn string_refs(&self, s: &str) -> usize {
        self.resources.string_refs(s.as_bytes())
    }

    /// Rebuilds the tree in a fresh pool, dropping fragmentation left by
    /// removals and overwrites.
    ///
    /// Returns false, leaving the document untouched, when the copy does
    /// not fit.
    pub fn garbage_collect(&mut self) -> bool {
        let mut fresh = ResourceManager::new(self.resources.config());
        match copy_data(self.root, &self.resources, &mut fresh) {
            Ok(root) => {
                let before = self.resources.memory_usage();
                self.root = root;
                self.resources = fresh;
                debug!(
                    "garbage collected: {} -> {} bytes",
                    before,
                    self.resources.memory_usage()
                );
                true
            }
            Err(_) => {
                debug!("garbage collection failed: pool exhausted");
                false
            }
        }
    }

    pub(crate) fn data(&self, place: Place) -> &VariantData {
        match place {
            Place::Root => &self.root,
            Place::Slot(id) => &self.resources.slot(id).data,
        }
    }

    pub(crate) fn data_mut(&mut self, place: Place) -> &mut VariantData {
        match place {
            Place::Root => &mut self.root,
            Place::Slot(id) => &mut self.resources.slot_mut(id).data,
        }
    }

    /// Installs the outcome of a decoder run, clearing the document on failure.
    pub(crate) fn finish_decode(
        &mut self,
        codec: &str,
        result: Result<VariantData, DecodeError>,
    ) -> Result<(), DecodeError> {
        match result {
            Ok(root) => {
                self.root = root;
                Ok(())
            }
            Err(e) => {
                debug!("{} decode failed: {}", codec, e);
                self.clear();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        let mut object = root.to_object();
        object.insert("name", "picodoc");
        object.insert("scratch", "temporary value");
        let mut list = object.get_or_add_member("list").unwrap();
        let mut array = list.to_array();
        array.add(1);
        array.add("two");
        doc
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut doc = sample();
        assert!(doc.slot_count() > 0);
        doc.clear();
        assert!(doc.root().is_null());
        assert_eq!(doc.slot_count(), 0);
        assert_eq!(doc.string_count(), 0);
        assert_eq!(doc.memory_usage(), 0);
    }

    #[test]
    fn test_garbage_collect_preserves_tree() {
        let mut doc = sample();
        let before = sample();
        assert!(doc.root_mut().remove_member("scratch"));
        assert!(doc.garbage_collect());
        assert_eq!(doc.root().member("name").as_str(), Some("picodoc"));
        assert_eq!(doc.root().member("list").get(1).as_str(), Some("two"));
        assert!(doc.memory_usage() < before.memory_usage());
        assert_eq!(doc.string_refs("temporary value"), 0);
    }

    #[test]
    fn test_garbage_collect_fixed_pool() {
        let mut doc = Document::with_config(PoolConfig::fixed(4, 64));
        let mut root = doc.root_mut();
        let mut array = root.to_array();
        for i in 0..4 {
            assert!(array.add(i));
        }
        // the fresh pool has the same room, so the copy fits
        assert!(doc.garbage_collect());
        assert_eq!(doc.root().size(), 4);
    }

    #[test]
    fn test_memory_usage_counts_strings() {
        let mut doc = Document::new();
        doc.root_mut().set("12345");
        assert_eq!(doc.memory_usage(), 5);
        doc.root_mut().set(crate::Linked("12345"));
        assert_eq!(doc.memory_usage(), 0);
    }
}
