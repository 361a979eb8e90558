// SPDX-License-Identifier: Apache-2.0

use super::collection::CollectionData;
use super::convert::Value;
use crate::error::NoMemory;
use crate::number::{Float, Integer, Number, UInteger};
use crate::pool::{ResourceManager, VariantSlot};
use crate::strings::{AdaptedString, StringRef};

/// The tagged-union node value.
///
/// Strings, fragments and binaries refer to their bytes through a
/// [`StringRef`]; arrays and objects own the slots of their collection.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) enum VariantData {
    #[default]
    Null,
    Boolean(bool),
    Signed(Integer),
    Unsigned(UInteger),
    Float(Float),
    String(StringRef),
    Raw(StringRef),
    Binary(StringRef),
    Array(CollectionData),
    Object(CollectionData),
}

/// What a variant currently holds, including where its string bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Null,
    Boolean,
    SignedInteger,
    UnsignedInteger,
    Float,
    LinkedString,
    OwnedString,
    RawLinkedString,
    RawOwnedString,
    Binary,
    Array,
    Object,
}

impl From<Number> for VariantData {
    fn from(number: Number) -> Self {
        match number {
            Number::Signed(v) => VariantData::Signed(v),
            Number::Unsigned(v) => VariantData::Unsigned(v),
            Number::Float(v) => VariantData::Float(v),
        }
    }
}

impl VariantData {
    pub fn kind(&self) -> VariantKind {
        match self {
            VariantData::Null => VariantKind::Null,
            VariantData::Boolean(_) => VariantKind::Boolean,
            VariantData::Signed(_) => VariantKind::SignedInteger,
            VariantData::Unsigned(_) => VariantKind::UnsignedInteger,
            VariantData::Float(_) => VariantKind::Float,
            VariantData::String(StringRef::Linked(_)) => VariantKind::LinkedString,
            VariantData::String(StringRef::Owned(_)) => VariantKind::OwnedString,
            VariantData::Raw(StringRef::Linked(_)) => VariantKind::RawLinkedString,
            VariantData::Raw(StringRef::Owned(_)) => VariantKind::RawOwnedString,
            VariantData::Binary(_) => VariantKind::Binary,
            VariantData::Array(_) => VariantKind::Array,
            VariantData::Object(_) => VariantKind::Object,
        }
    }

    pub fn number(&self) -> Option<Number> {
        match *self {
            VariantData::Signed(v) => Some(Number::Signed(v)),
            VariantData::Unsigned(v) => Some(Number::Unsigned(v)),
            VariantData::Float(v) => Some(Number::Float(v)),
            _ => None,
        }
    }

    pub fn collection(&self) -> Option<CollectionData> {
        match *self {
            VariantData::Array(c) | VariantData::Object(c) => Some(c),
            _ => None,
        }
    }

    /// Builds the node for a caller value, interning its string if any.
    pub fn from_value(value: Value<'_>, resources: &mut ResourceManager) -> Result<Self, NoMemory> {
        Ok(match value {
            Value::Null => VariantData::Null,
            Value::Bool(b) => VariantData::Boolean(b),
            Value::Signed(v) => Number::from_signed(i128::from(v)).into(),
            Value::Unsigned(v) => Number::from_unsigned(u128::from(v)).into(),
            Value::Float(v) => VariantData::Float(v as Float),
            Value::String(s) => match resources.intern(s)? {
                Some(string) => VariantData::String(string),
                None => VariantData::Null,
            },
            Value::Raw(s) => match resources.intern(s)? {
                Some(string) => VariantData::Raw(string),
                None => VariantData::Null,
            },
            Value::Binary(bytes) => match resources.intern(AdaptedString::Borrowed(bytes))? {
                Some(string) => VariantData::Binary(string),
                None => VariantData::Null,
            },
        })
    }

    /// Drops what this node owns: its string reference or its whole subtree.
    pub fn release(self, resources: &mut ResourceManager) {
        match self {
            VariantData::String(s) | VariantData::Raw(s) | VariantData::Binary(s) => {
                resources.release_string(s)
            }
            VariantData::Array(c) | VariantData::Object(c) => c.release(resources),
            _ => {}
        }
    }
}

/// Deep-copies `data` from one pool into another, re-interning owned
/// strings. A failed copy leaves nothing allocated in `target`.
pub(crate) fn copy_data(
    data: VariantData,
    source: &ResourceManager,
    target: &mut ResourceManager,
) -> Result<VariantData, NoMemory> {
    Ok(match data {
        VariantData::String(s) => VariantData::String(copy_string(s, source, target)?),
        VariantData::Raw(s) => VariantData::Raw(copy_string(s, source, target)?),
        VariantData::Binary(s) => VariantData::Binary(copy_string(s, source, target)?),
        VariantData::Array(c) => VariantData::Array(copy_collection(c, source, target)?),
        VariantData::Object(c) => VariantData::Object(copy_collection(c, source, target)?),
        scalar => scalar,
    })
}

fn copy_string(
    string: StringRef,
    source: &ResourceManager,
    target: &mut ResourceManager,
) -> Result<StringRef, NoMemory> {
    match string {
        StringRef::Linked(bytes) => Ok(StringRef::Linked(bytes)),
        StringRef::Owned(_) => target
            .save_string(source.string_bytes(string))
            .map(StringRef::Owned),
    }
}

fn copy_collection(
    collection: CollectionData,
    source: &ResourceManager,
    target: &mut ResourceManager,
) -> Result<CollectionData, NoMemory> {
    let mut copy = CollectionData::EMPTY;
    for id in collection.slots(source) {
        if let Err(e) = copy_slot(source.slot(id), source, target, &mut copy) {
            copy.release(target);
            return Err(e);
        }
    }
    Ok(copy)
}

fn copy_slot(
    slot: &VariantSlot,
    source: &ResourceManager,
    target: &mut ResourceManager,
    into: &mut CollectionData,
) -> Result<(), NoMemory> {
    // linked first, so a failure below is released with the collection
    let id = target.alloc_slot()?;
    into.append(id, target);
    if let Some(key) = slot.key {
        let key = copy_string(key, source, target)?;
        target.slot_mut(id).key = Some(key);
    }
    let data = copy_data(slot.data, source, target)?;
    target.slot_mut(id).data = data;
    Ok(())
}
