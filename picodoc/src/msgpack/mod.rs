// SPDX-License-Identifier: Apache-2.0

//! MessagePack decoding into a [`Document`] and encoding from any
//! [`VariantRef`].

mod deserializer;
mod serializer;

use deserializer::MsgPackDeserializer;
use serializer::MsgPackSerializer;

use crate::document::Document;
use crate::error::DecodeError;
use crate::filter::DecodeOptions;
use crate::io::{CountingWriter, Reader, ReaderSource, SliceSource, Source, Writer};
use crate::variant::VariantRef;

fn decode<S: Source>(
    doc: &mut Document,
    source: S,
    options: DecodeOptions<'_>,
) -> Result<(), DecodeError> {
    doc.clear();
    let result = MsgPackDeserializer::new(source, &mut doc.resources).parse(options);
    doc.finish_decode("msgpack", result)
}

/// Replaces the content of `doc` with the MessagePack value in `input`.
///
/// ```
/// use picodoc::{decode_msgpack, Document};
///
/// let mut doc = Document::new();
/// decode_msgpack(&mut doc, &[0x81, 0xa5, b'h', b'e', b'l', b'l', b'o', 0x2a]).unwrap();
/// assert_eq!(doc.root().member("hello").to::<u8>(), 42);
/// ```
pub fn decode_msgpack(doc: &mut Document, input: &[u8]) -> Result<(), DecodeError> {
    decode_msgpack_with(doc, input, DecodeOptions::new())
}

pub fn decode_msgpack_with(
    doc: &mut Document,
    input: &[u8],
    options: DecodeOptions<'_>,
) -> Result<(), DecodeError> {
    decode(doc, SliceSource::new(input), options)
}

/// Decodes from a [`Reader`], pulling input as needed.
pub fn decode_msgpack_reader<R: Reader>(
    doc: &mut Document,
    reader: R,
    options: DecodeOptions<'_>,
) -> Result<(), DecodeError> {
    decode(doc, ReaderSource::new(reader), options)
}

/// Writes `variant` as MessagePack and returns the number of bytes the
/// writer accepted.
///
/// ```
/// use picodoc::{encode_msgpack, measure_msgpack, Document};
///
/// let mut doc = Document::new();
/// doc.root_mut().set(2);
///
/// let mut buffer = [0u8; 8];
/// let mut writer = picodoc::SliceWriter::new(&mut buffer);
/// assert_eq!(encode_msgpack(doc.root(), &mut writer), 1);
/// assert_eq!(writer.written(), [0x02]);
/// assert_eq!(measure_msgpack(doc.root()), 1);
/// ```
pub fn encode_msgpack<W: Writer>(variant: VariantRef<'_>, writer: W) -> usize {
    let mut serializer = MsgPackSerializer::new(writer);
    variant.accept(&mut serializer);
    serializer.written()
}

/// Length of [`encode_msgpack`]'s output, without writing it.
pub fn measure_msgpack(variant: VariantRef<'_>) -> usize {
    encode_msgpack(variant, CountingWriter::new())
}
