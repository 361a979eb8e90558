// SPDX-License-Identifier: Apache-2.0

//! The value tree: node representation, handles, conversions and traversal.

mod collection;
mod compare;
mod convert;
mod data;
mod handles;
mod visitor;

pub(crate) use collection::CollectionData;
pub use convert::{IntoVariant, Value, VariantType};
pub(crate) use data::{copy_data, VariantData};
pub use data::VariantKind;
pub use handles::{ArrayMut, Elements, Member, Members, ObjectMut, VariantMut, VariantRef};
pub use visitor::Visitor;
