// SPDX-License-Identifier: Apache-2.0

//! A pool-backed document model for JSON and MessagePack.
//!
//! A [`Document`] owns two pools: fixed-size variant slots and
//! deduplicated, reference-counted strings. Values are linked into trees
//! through slot ids instead of pointers, so a document can be filled,
//! mutated, cleared and refilled without fragmenting the heap.
//!
//! ```
//! use picodoc::{decode_json, encode_json, Document};
//!
//! let mut doc = Document::new();
//! decode_json(&mut doc, br#"{"sensor":"gps","time":1351824120}"#).unwrap();
//! assert_eq!(doc.root().member("time").to::<i64>(), 1351824120);
//!
//! doc.root_mut().get_or_add_member("fixed").unwrap().set(true);
//! let mut out = Vec::new();
//! encode_json(doc.root(), &mut out);
//! assert_eq!(out, br#"{"sensor":"gps","time":1351824120,"fixed":true}"#);
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[cfg(all(feature = "std", not(test)))]
extern crate std;

// Compile-time configuration validation
mod config_check;

mod endian;
mod error;
mod float_parts;
mod int_parser;
mod number;
mod strings;

mod pool;
mod variant;

mod document;
mod filter;

mod chunk_reader;
mod io;

mod json;
mod msgpack;

pub use error::{DecodeError, NoMemory};
pub use number::{Float, Integer, IntegerTarget, UInteger};
pub use strings::{AdaptedString, Binary, Linked, Raw, StoragePolicy, StringAdapter};

pub use pool::{PoolConfig, SlotId, NULL_SLOT};
pub use variant::{
    ArrayMut, Elements, IntoVariant, Member, Members, ObjectMut, Value, VariantKind, VariantMut,
    VariantRef, VariantType, Visitor,
};

pub use document::Document;
pub use filter::{DecodeOptions, Filter, NestingLimit};

pub use chunk_reader::ChunkReader;
pub use io::{CountingWriter, Reader, SliceWriter, Writer};
#[cfg(feature = "std")]
pub use io::{IoReader, IoWriter};

pub use json::{
    decode_json, decode_json_reader, decode_json_with, encode_json, encode_json_pretty,
    measure_json, measure_json_pretty,
};
pub use msgpack::{
    decode_msgpack, decode_msgpack_reader, decode_msgpack_with, encode_msgpack, measure_msgpack,
};
