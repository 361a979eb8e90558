// SPDX-License-Identifier: Apache-2.0

//! Arena storage behind a document: variant slots addressed by small ids
//! and reference-counted owned strings.

mod resource_manager;
mod slot;
mod slot_pool;
mod string_pool;

pub use resource_manager::PoolConfig;
pub(crate) use resource_manager::ResourceManager;
pub use slot::{SlotId, NULL_SLOT};
pub(crate) use slot::VariantSlot;
pub(crate) use string_pool::StringId;
