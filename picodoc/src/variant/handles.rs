// SPDX-License-Identifier: Apache-2.0

//! Read and write handles over the nodes of a [`Document`].
//!
//! Handles address nodes by place (root or slot id) and never keep
//! addresses into the pool across a mutation.

use core::fmt;
use core::mem;

use alloc::vec::Vec;

use super::collection::CollectionData;
use super::convert::{IntoVariant, VariantType};
use super::data::{copy_data, VariantData, VariantKind};
use crate::document::{Document, Place};
use crate::pool::{ResourceManager, SlotId, NULL_SLOT};
use crate::strings::{AdaptedString, StringAdapter, StringRef};

/// Read-only view of a node, or of nothing ("unbound").
///
/// An unbound handle reads as null, has no elements or members, and is
/// what lookups of missing indices or keys return.
#[derive(Clone, Copy)]
pub struct VariantRef<'d> {
    resources: &'d ResourceManager,
    data: Option<&'d VariantData>,
}

impl<'d> VariantRef<'d> {
    pub(crate) fn new(resources: &'d ResourceManager, data: &'d VariantData) -> Self {
        Self {
            resources,
            data: Some(data),
        }
    }

    pub(crate) fn unbound(resources: &'d ResourceManager) -> Self {
        Self {
            resources,
            data: None,
        }
    }

    fn from_slot(resources: &'d ResourceManager, id: Option<SlotId>) -> Self {
        match id {
            Some(id) => Self::new(resources, &resources.slot(id).data),
            None => Self::unbound(resources),
        }
    }

    pub(crate) fn data(&self) -> Option<&'d VariantData> {
        self.data
    }

    pub(crate) fn resources(&self) -> &'d ResourceManager {
        self.resources
    }

    pub fn is_unbound(&self) -> bool {
        self.data.is_none()
    }

    /// What the node holds; unbound handles report [`VariantKind::Null`].
    pub fn kind(&self) -> VariantKind {
        self.data.map_or(VariantKind::Null, VariantData::kind)
    }

    pub fn is_null(&self) -> bool {
        self.kind() == VariantKind::Null
    }

    pub fn is_array(&self) -> bool {
        matches!(self.data, Some(VariantData::Array(_)))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.data, Some(VariantData::Object(_)))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.data, Some(VariantData::String(_)))
    }

    /// Whether the value is exactly representable as `T`.
    pub fn is<T: VariantType<'d>>(&self) -> bool {
        T::is(self)
    }

    /// Reads the value as `T`, or `T`'s zero when it does not convert.
    pub fn to<T: VariantType<'d>>(&self) -> T {
        T::from_variant(self)
    }

    fn string_of(&self, pick: fn(&VariantData) -> Option<StringRef>) -> Option<&'d [u8]> {
        let string = pick(self.data?)?;
        Some(self.resources.string_bytes(string))
    }

    /// String bytes; `None` for anything but a string.
    pub fn as_bytes(&self) -> Option<&'d [u8]> {
        self.string_of(|data| match *data {
            VariantData::String(s) => Some(s),
            _ => None,
        })
    }

    /// The string as UTF-8; `None` for non-strings and invalid UTF-8.
    pub fn as_str(&self) -> Option<&'d str> {
        self.as_bytes()
            .and_then(|bytes| core::str::from_utf8(bytes).ok())
    }

    /// Bytes of a pre-serialized fragment.
    pub fn as_raw(&self) -> Option<&'d [u8]> {
        self.string_of(|data| match *data {
            VariantData::Raw(s) => Some(s),
            _ => None,
        })
    }

    pub fn as_binary(&self) -> Option<&'d [u8]> {
        self.string_of(|data| match *data {
            VariantData::Binary(s) => Some(s),
            _ => None,
        })
    }

    fn collection(&self) -> Option<CollectionData> {
        self.data.and_then(VariantData::collection)
    }

    fn array(&self) -> Option<CollectionData> {
        match self.data {
            Some(VariantData::Array(c)) => Some(*c),
            _ => None,
        }
    }

    fn object(&self) -> Option<CollectionData> {
        match self.data {
            Some(VariantData::Object(c)) => Some(*c),
            _ => None,
        }
    }

    /// Number of elements or members; 0 for anything else.
    pub fn size(&self) -> usize {
        self.collection().map_or(0, |c| c.len(self.resources))
    }

    /// Element at `index`, unbound when out of range or not an array.
    pub fn get(&self, index: usize) -> VariantRef<'d> {
        let id = self.array().and_then(|c| c.get(index, self.resources));
        Self::from_slot(self.resources, id)
    }

    /// Member named `key`, unbound when missing or not an object.
    pub fn member<K: StringAdapter>(&self, key: K) -> VariantRef<'d> {
        let key = key.adapt();
        if key.is_null() {
            return Self::unbound(self.resources);
        }
        let id = self
            .object()
            .and_then(|c| c.find_key(key.bytes(), self.resources));
        Self::from_slot(self.resources, id)
    }

    pub fn elements(&self) -> Elements<'d> {
        Elements {
            resources: self.resources,
            next: self.array().map_or(NULL_SLOT, |c| c.head),
        }
    }

    pub fn members(&self) -> Members<'d> {
        Members {
            resources: self.resources,
            next: self.object().map_or(NULL_SLOT, |c| c.head),
        }
    }
}

impl fmt::Debug for VariantRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = Vec::new();
        crate::json::encode_json(*self, &mut text);
        write!(f, "{:?}: {}", self.kind(), alloc::string::String::from_utf8_lossy(&text))
    }
}

/// Elements of an array, in order.
#[derive(Clone)]
pub struct Elements<'d> {
    resources: &'d ResourceManager,
    next: SlotId,
}

impl<'d> Iterator for Elements<'d> {
    type Item = VariantRef<'d>;

    fn next(&mut self) -> Option<VariantRef<'d>> {
        if self.next == NULL_SLOT {
            return None;
        }
        let resources = self.resources;
        let slot = resources.slot(self.next);
        self.next = slot.next;
        Some(VariantRef::new(resources, &slot.data))
    }
}

/// A key/value pair of an object.
#[derive(Debug, Clone, Copy)]
pub struct Member<'d> {
    key: &'d [u8],
    value: VariantRef<'d>,
}

impl<'d> Member<'d> {
    pub fn key(&self) -> &'d str {
        core::str::from_utf8(self.key).unwrap_or("")
    }

    pub fn key_bytes(&self) -> &'d [u8] {
        self.key
    }

    pub fn value(&self) -> VariantRef<'d> {
        self.value
    }
}

/// Members of an object, in insertion order.
#[derive(Clone)]
pub struct Members<'d> {
    resources: &'d ResourceManager,
    next: SlotId,
}

impl<'d> Iterator for Members<'d> {
    type Item = Member<'d>;

    fn next(&mut self) -> Option<Member<'d>> {
        if self.next == NULL_SLOT {
            return None;
        }
        let resources = self.resources;
        let slot = resources.slot(self.next);
        self.next = slot.next;
        let key = slot.key.map_or(&[][..], |k| resources.string_bytes(k));
        Some(Member {
            key,
            value: VariantRef::new(resources, &slot.data),
        })
    }
}

fn array_at(doc: &Document, place: Place) -> Option<CollectionData> {
    match doc.data(place) {
        VariantData::Array(c) => Some(*c),
        _ => None,
    }
}

fn object_at(doc: &Document, place: Place) -> Option<CollectionData> {
    match doc.data(place) {
        VariantData::Object(c) => Some(*c),
        _ => None,
    }
}

/// Writes back a collection header copied out with [`array_at`] or [`object_at`].
fn store_collection(doc: &mut Document, place: Place, collection: CollectionData) {
    match doc.data_mut(place) {
        VariantData::Array(c) | VariantData::Object(c) => *c = collection,
        _ => debug_assert!(false, "collection header written to a scalar"),
    }
}

fn add_element(doc: &mut Document, place: Place) -> Option<SlotId> {
    let mut array = array_at(doc, place)?;
    let id = doc.resources.alloc_slot().ok()?;
    array.append(id, &mut doc.resources);
    store_collection(doc, place, array);
    Some(id)
}

fn add_element_at(doc: &mut Document, place: Place, index: usize) -> Option<SlotId> {
    let mut array = array_at(doc, place)?;
    if index > array.len(&doc.resources) {
        return None;
    }
    let id = doc.resources.alloc_slot().ok()?;
    let inserted = array.insert_at(index, id, &mut doc.resources);
    debug_assert!(inserted);
    store_collection(doc, place, array);
    Some(id)
}

fn element(doc: &Document, place: Place, index: usize) -> Option<SlotId> {
    array_at(doc, place)?.get(index, &doc.resources)
}

fn remove_element(doc: &mut Document, place: Place, index: usize) -> bool {
    let Some(mut array) = array_at(doc, place) else {
        return false;
    };
    let Some(id) = array.get(index, &doc.resources) else {
        return false;
    };
    array.remove_slot(id, &mut doc.resources);
    store_collection(doc, place, array);
    true
}

fn member(doc: &Document, place: Place, key: AdaptedString<'_>) -> Option<SlotId> {
    if key.is_null() {
        return None;
    }
    object_at(doc, place)?.find_key(key.bytes(), &doc.resources)
}

fn get_or_add_member(doc: &mut Document, place: Place, key: AdaptedString<'_>) -> Option<SlotId> {
    let mut object = object_at(doc, place)?;
    if let Some(id) = member(doc, place, key) {
        return Some(id);
    }
    let key = doc.resources.intern(key).ok()??;
    let id = match doc.resources.alloc_slot() {
        Ok(id) => id,
        Err(_) => {
            doc.resources.release_string(key);
            return None;
        }
    };
    doc.resources.slot_mut(id).key = Some(key);
    object.append(id, &mut doc.resources);
    store_collection(doc, place, object);
    Some(id)
}

fn remove_member(doc: &mut Document, place: Place, key: AdaptedString<'_>) -> bool {
    let (Some(mut object), Some(id)) = (object_at(doc, place), member(doc, place, key)) else {
        return false;
    };
    object.remove_slot(id, &mut doc.resources);
    store_collection(doc, place, object);
    true
}

fn clear_collection(doc: &mut Document, place: Place) {
    if let Some(collection) = doc.data(place).collection().filter(|c| !c.is_empty()) {
        collection.release(&mut doc.resources);
        store_collection(doc, place, CollectionData::EMPTY);
    }
}

/// Stores `data` at `place`, releasing what was there.
fn replace(doc: &mut Document, place: Place, data: VariantData) {
    let old = mem::replace(doc.data_mut(place), data);
    old.release(&mut doc.resources);
}

/// Writable handle to one node of a document.
pub struct VariantMut<'d> {
    doc: &'d mut Document,
    place: Place,
}

impl<'d> VariantMut<'d> {
    pub(crate) fn new(doc: &'d mut Document, place: Place) -> Self {
        Self { doc, place }
    }

    fn child(&mut self, id: SlotId) -> VariantMut<'_> {
        VariantMut::new(self.doc, Place::Slot(id))
    }

    /// Read-only view of the same node.
    pub fn view(&self) -> VariantRef<'_> {
        VariantRef::new(&self.doc.resources, self.doc.data(self.place))
    }

    /// Stores a value, returning false (and leaving the node unchanged)
    /// when the pool cannot hold it.
    pub fn set<T: IntoVariant>(&mut self, value: T) -> bool {
        match VariantData::from_value(value.to_value(), &mut self.doc.resources) {
            Ok(data) => {
                replace(self.doc, self.place, data);
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_null(&mut self) {
        replace(self.doc, self.place, VariantData::Null);
    }

    /// Deep-copies `source`, typically from another document, into this node.
    pub fn set_variant(&mut self, source: VariantRef<'_>) -> bool {
        let data = source.data().copied().unwrap_or_default();
        match copy_data(data, source.resources(), &mut self.doc.resources) {
            Ok(copy) => {
                replace(self.doc, self.place, copy);
                true
            }
            Err(_) => false,
        }
    }

    /// Turns the node into an array, keeping it if it already is one.
    pub fn to_array(&mut self) -> ArrayMut<'_> {
        if !matches!(self.doc.data(self.place), VariantData::Array(_)) {
            replace(self.doc, self.place, VariantData::Array(CollectionData::EMPTY));
        }
        ArrayMut::new(self.doc, Some(self.place))
    }

    /// Turns the node into an object, keeping it if it already is one.
    pub fn to_object(&mut self) -> ObjectMut<'_> {
        if !matches!(self.doc.data(self.place), VariantData::Object(_)) {
            replace(self.doc, self.place, VariantData::Object(CollectionData::EMPTY));
        }
        ObjectMut::new(self.doc, Some(self.place))
    }

    /// The node as an array, unbound when it is not one.
    pub fn as_array_mut(&mut self) -> ArrayMut<'_> {
        let place = array_at(self.doc, self.place).map(|_| self.place);
        ArrayMut::new(self.doc, place)
    }

    /// The node as an object, unbound when it is not one.
    pub fn as_object_mut(&mut self) -> ObjectMut<'_> {
        let place = object_at(self.doc, self.place).map(|_| self.place);
        ObjectMut::new(self.doc, place)
    }

    fn null_becomes(&mut self, empty: VariantData) {
        if matches!(self.doc.data(self.place), VariantData::Null) {
            replace(self.doc, self.place, empty);
        }
    }

    /// Appends a null element; a null node becomes an array first.
    pub fn add_element(&mut self) -> Option<VariantMut<'_>> {
        self.null_becomes(VariantData::Array(CollectionData::EMPTY));
        let id = add_element(self.doc, self.place)?;
        Some(self.child(id))
    }

    /// Inserts a null element before `index`; `index == size()` appends.
    pub fn add_element_at(&mut self, index: usize) -> Option<VariantMut<'_>> {
        self.null_becomes(VariantData::Array(CollectionData::EMPTY));
        let id = add_element_at(self.doc, self.place, index)?;
        Some(self.child(id))
    }

    /// Member named `key`, added as null when missing; a null node
    /// becomes an object first.
    pub fn get_or_add_member<K: StringAdapter>(&mut self, key: K) -> Option<VariantMut<'_>> {
        self.null_becomes(VariantData::Object(CollectionData::EMPTY));
        let id = get_or_add_member(self.doc, self.place, key.adapt())?;
        Some(self.child(id))
    }

    pub fn element_mut(&mut self, index: usize) -> Option<VariantMut<'_>> {
        let id = element(self.doc, self.place, index)?;
        Some(self.child(id))
    }

    pub fn member_mut<K: StringAdapter>(&mut self, key: K) -> Option<VariantMut<'_>> {
        let id = member(self.doc, self.place, key.adapt())?;
        Some(self.child(id))
    }

    pub fn remove(&mut self, index: usize) -> bool {
        remove_element(self.doc, self.place, index)
    }

    pub fn remove_member<K: StringAdapter>(&mut self, key: K) -> bool {
        remove_member(self.doc, self.place, key.adapt())
    }

    pub fn size(&self) -> usize {
        self.view().size()
    }
}

impl fmt::Debug for VariantMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view(), f)
    }
}

/// Writable handle to an array, possibly unbound.
///
/// Every mutation of an unbound handle is a no-op that allocates nothing.
pub struct ArrayMut<'d> {
    doc: &'d mut Document,
    place: Option<Place>,
}

impl<'d> ArrayMut<'d> {
    fn new(doc: &'d mut Document, place: Option<Place>) -> Self {
        Self { doc, place }
    }

    pub fn is_unbound(&self) -> bool {
        self.place.is_none()
    }

    pub fn view(&self) -> VariantRef<'_> {
        match self.place {
            Some(place) => VariantRef::new(&self.doc.resources, self.doc.data(place)),
            None => VariantRef::unbound(&self.doc.resources),
        }
    }

    pub fn len(&self) -> usize {
        self.view().size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add_element(&mut self) -> Option<VariantMut<'_>> {
        let id = add_element(self.doc, self.place?)?;
        Some(VariantMut::new(self.doc, Place::Slot(id)))
    }

    pub fn add_element_at(&mut self, index: usize) -> Option<VariantMut<'_>> {
        let id = add_element_at(self.doc, self.place?, index)?;
        Some(VariantMut::new(self.doc, Place::Slot(id)))
    }

    /// Appends a value; on failure nothing is added.
    pub fn add<T: IntoVariant>(&mut self, value: T) -> bool {
        let Some(place) = self.place else {
            return false;
        };
        let Ok(data) = VariantData::from_value(value.to_value(), &mut self.doc.resources) else {
            return false;
        };
        match add_element(self.doc, place) {
            Some(id) => {
                self.doc.resources.slot_mut(id).data = data;
                true
            }
            None => {
                data.release(&mut self.doc.resources);
                false
            }
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<VariantMut<'_>> {
        let id = element(self.doc, self.place?, index)?;
        Some(VariantMut::new(self.doc, Place::Slot(id)))
    }

    pub fn remove(&mut self, index: usize) -> bool {
        match self.place {
            Some(place) => remove_element(self.doc, place, index),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        if let Some(place) = self.place {
            clear_collection(self.doc, place);
        }
    }
}

/// Writable handle to an object, possibly unbound.
///
/// Every mutation of an unbound handle is a no-op that allocates nothing.
pub struct ObjectMut<'d> {
    doc: &'d mut Document,
    place: Option<Place>,
}

impl<'d> ObjectMut<'d> {
    fn new(doc: &'d mut Document, place: Option<Place>) -> Self {
        Self { doc, place }
    }

    pub fn is_unbound(&self) -> bool {
        self.place.is_none()
    }

    pub fn view(&self) -> VariantRef<'_> {
        match self.place {
            Some(place) => VariantRef::new(&self.doc.resources, self.doc.data(place)),
            None => VariantRef::unbound(&self.doc.resources),
        }
    }

    pub fn len(&self) -> usize {
        self.view().size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_or_add_member<K: StringAdapter>(&mut self, key: K) -> Option<VariantMut<'_>> {
        let id = get_or_add_member(self.doc, self.place?, key.adapt())?;
        Some(VariantMut::new(self.doc, Place::Slot(id)))
    }

    /// Sets member `key` to `value`, overwriting an existing member in place.
    pub fn insert<K: StringAdapter, T: IntoVariant>(&mut self, key: K, value: T) -> bool {
        let Some(place) = self.place else {
            return false;
        };
        let Ok(data) = VariantData::from_value(value.to_value(), &mut self.doc.resources) else {
            return false;
        };
        match get_or_add_member(self.doc, place, key.adapt()) {
            Some(id) => {
                replace(self.doc, Place::Slot(id), data);
                true
            }
            None => {
                data.release(&mut self.doc.resources);
                false
            }
        }
    }

    pub fn get_mut<K: StringAdapter>(&mut self, key: K) -> Option<VariantMut<'_>> {
        let id = member(self.doc, self.place?, key.adapt())?;
        Some(VariantMut::new(self.doc, Place::Slot(id)))
    }

    pub fn remove<K: StringAdapter>(&mut self, key: K) -> bool {
        match self.place {
            Some(place) => remove_member(self.doc, place, key.adapt()),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        if let Some(place) = self.place {
            clear_collection(self.doc, place);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolConfig;

    #[test]
    fn test_array_operations() {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        let mut array = root.to_array();
        assert!(array.add(1));
        assert!(array.add(3));
        array.add_element_at(1).unwrap().set(2);
        assert!(array.add_element_at(4).is_none());
        assert_eq!(array.len(), 3);
        let values: Vec<i32> = doc.root().elements().map(|e| e.to::<i32>()).collect();
        assert_eq!(values, [1, 2, 3]);

        assert!(doc.root_mut().remove(0));
        assert!(!doc.root_mut().remove(5));
        assert_eq!(doc.root().get(0).to::<i32>(), 2);
        assert!(doc.root().get(2).is_unbound());
    }

    #[test]
    fn test_duplicate_key_overwrites() {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        let mut object = root.to_object();
        assert!(object.insert("world", 1));
        assert!(object.insert("world", 2));
        assert_eq!(object.len(), 1);
        assert_eq!(doc.root().member("world").to::<i32>(), 2);
        assert_eq!(doc.string_refs("world"), 1);
    }

    #[test]
    fn test_members_in_insertion_order() {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        root.get_or_add_member("b").unwrap().set(1);
        root.get_or_add_member("a").unwrap().set(2);
        let keys: Vec<&str> = doc.root().members().map(|m| m.key()).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_unbound_collection_is_inert() {
        let mut doc = Document::with_config(PoolConfig::fixed(4, 16));
        doc.root_mut().set(5);
        let mut root = doc.root_mut();
        let mut array = root.as_array_mut();
        assert!(array.is_unbound());
        assert!(array.is_empty());
        assert!(!array.add(1));
        assert!(array.add_element().is_none());
        assert!(!array.remove(0));
        array.clear();
        let mut object = root.as_object_mut();
        assert!(!object.insert("k", 1));
        assert!(object.get_or_add_member("k").is_none());
        assert_eq!(doc.slot_count(), 0);
        assert_eq!(doc.string_count(), 0);
        assert_eq!(doc.root().to::<i32>(), 5);
    }

    #[test]
    fn test_failed_set_keeps_previous_value() {
        let mut doc = Document::with_config(PoolConfig::fixed(1, 4));
        assert!(doc.root_mut().set("abc"));
        assert!(!doc.root_mut().set("too long"));
        assert_eq!(doc.root().as_str(), Some("abc"));
        assert!(doc.overflowed());
    }

    #[test]
    fn test_failed_add_leaves_array_unchanged() {
        let mut doc = Document::with_config(PoolConfig::fixed(1, 0));
        let mut root = doc.root_mut();
        let mut array = root.to_array();
        assert!(array.add(true));
        assert!(!array.add(false));
        assert_eq!(array.len(), 1);
    }

    #[test]
    fn test_set_variant_copies_between_documents() {
        let mut source = Document::new();
        let mut root = source.root_mut();
        let mut object = root.to_object();
        object.insert("name", "copy me");
        object.get_or_add_member("list").unwrap().add_element().unwrap().set(1.5);

        let mut target = Document::new();
        assert!(target.root_mut().set_variant(source.root()));
        drop(source);
        assert_eq!(target.root().member("name").as_str(), Some("copy me"));
        assert_eq!(target.root().member("list").get(0).to::<f64>(), 1.5);
        assert_eq!(target.string_count(), 3);
    }

    #[test]
    fn test_removing_subtree_releases_everything() {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        let mut nested = root.get_or_add_member("nested").unwrap();
        nested.get_or_add_member("x").unwrap().set("value");
        nested.get_or_add_member("y").unwrap().add_element().unwrap().set("other");
        assert_eq!(doc.slot_count(), 4);
        assert!(doc.root_mut().remove_member("nested"));
        assert_eq!(doc.slot_count(), 0);
        assert_eq!(doc.string_count(), 0);
    }

    #[test]
    fn test_edit_existing_nodes() {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        let mut array = root.to_array();
        array.add("first");
        array.add(2);
        array.clear();
        assert!(array.is_empty());
        array.add("again");
        array.add(2);

        let mut root = doc.root_mut();
        root.element_mut(0).unwrap().set_null();
        assert!(root.element_mut(2).is_none());
        assert!(root.member_mut("k").is_none());
        assert_eq!(doc.string_count(), 0);
        assert!(doc.root().get(0).is_null());
        assert!(!doc.root().get(0).is_unbound());

        doc.root_mut().element_mut(1).unwrap().set("text");
        assert!(doc.root().get(1).is_string());
        assert!(!doc.root().is_string());
    }

    #[test]
    fn test_kinds() {
        let mut doc = Document::new();
        doc.root_mut().set(crate::Linked("static"));
        assert_eq!(doc.root().kind(), VariantKind::LinkedString);
        doc.root_mut().set("copied");
        assert_eq!(doc.root().kind(), VariantKind::OwnedString);
        doc.root_mut().set(crate::Raw("[1,2]"));
        assert_eq!(doc.root().kind(), VariantKind::RawOwnedString);
        assert_eq!(doc.root().as_raw(), Some(&b"[1,2]"[..]));
        doc.root_mut().set(crate::Binary(&[1, 2, 3]));
        assert_eq!(doc.root().as_binary(), Some(&[1u8, 2, 3][..]));
        assert_eq!(doc.root().as_str(), None);
    }
}
