// SPDX-License-Identifier: Apache-2.0

use crate::strings::StringRef;
use crate::variant::VariantData;

/// Index of a variant slot in the pool, sized by the `slot8`/`slot16`/`slot32` features.
#[cfg(feature = "slot8")]
pub type SlotId = u8;
#[cfg(feature = "slot16")]
pub type SlotId = u16;
#[cfg(feature = "slot32")]
pub type SlotId = u32;

/// Reserved "no slot" identifier, terminating every `next` chain.
pub const NULL_SLOT: SlotId = SlotId::MAX;

/// Converts a pool index into a slot id, refusing the reserved sentinel.
pub(crate) fn slot_id_from_index(index: usize) -> Option<SlotId> {
    SlotId::try_from(index).ok().filter(|id| *id != NULL_SLOT)
}

/// A tree node: its value, its key when it is an object member, and its
/// successor in the parent collection.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VariantSlot {
    pub data: VariantData,
    pub key: Option<StringRef>,
    pub next: SlotId,
}

impl Default for VariantSlot {
    fn default() -> Self {
        Self {
            data: VariantData::Null,
            key: None,
            next: NULL_SLOT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_not_a_valid_index() {
        assert_eq!(slot_id_from_index(0), Some(0));
        assert_eq!(slot_id_from_index(NULL_SLOT as usize), None);
        assert_eq!(slot_id_from_index(NULL_SLOT as usize - 1), Some(NULL_SLOT - 1));
    }
}
