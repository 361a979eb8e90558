// SPDX-License-Identifier: Apache-2.0

//! JSON decoding into a [`Document`] and encoding from any [`VariantRef`].

mod deserializer;
mod escape;
mod serializer;

use deserializer::JsonDeserializer;
use serializer::JsonSerializer;

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
    let result = JsonDeserializer::new(source, &mut doc.resources).parse(options);
    doc.finish_decode("json", result)
}

/// Replaces the content of `doc` with the JSON document in `input`.
///
/// ```
/// use picodoc::{decode_json, DecodeError, Document};
///
/// let mut doc = Document::new();
/// decode_json(&mut doc, br#"{"sensor":"gps","time":1351824120}"#).unwrap();
/// assert_eq!(doc.root().member("time").to::<i64>(), 1351824120);
///
/// assert_eq!(decode_json(&mut doc, b"\"hello"), Err(DecodeError::IncompleteInput));
/// assert!(doc.root().is_null());
/// ```
pub fn decode_json(doc: &mut Document, input: &[u8]) -> Result<(), DecodeError> {
    decode_json_with(doc, input, DecodeOptions::new())
}

pub fn decode_json_with(
    doc: &mut Document,
    input: &[u8],
    options: DecodeOptions<'_>,
) -> Result<(), DecodeError> {
    decode(doc, SliceSource::new(input), options)
}

/// Decodes from a [`Reader`], pulling input as needed.
///
/// Bytes after a root array or object are not inspected. A reader error
/// before the document is complete is reported as
/// [`DecodeError::IncompleteInput`].
pub fn decode_json_reader<R: Reader>(
    doc: &mut Document,
    reader: R,
    options: DecodeOptions<'_>,
) -> Result<(), DecodeError> {
    decode(doc, ReaderSource::new(reader), options)
}

fn encode<W: Writer>(variant: VariantRef<'_>, writer: W, pretty: bool) -> usize {
    let mut serializer = JsonSerializer::new(writer, pretty);
    variant.accept(&mut serializer);
    serializer.written()
}

/// Writes `variant` as compact JSON and returns the number of bytes the
/// writer accepted.
///
/// ```
/// use picodoc::{encode_json, measure_json, Document};
///
/// let mut doc = Document::new();
/// let mut root = doc.root_mut();
/// let mut array = root.to_array();
/// array.add(48.75608);
/// array.add("gps");
///
/// let mut out = Vec::new();
/// assert_eq!(encode_json(doc.root(), &mut out), 16);
/// assert_eq!(out, br#"[48.75608,"gps"]"#);
/// assert_eq!(measure_json(doc.root()), out.len());
/// ```
pub fn encode_json<W: Writer>(variant: VariantRef<'_>, writer: W) -> usize {
    encode(variant, writer, false)
}

/// Writes `variant` as indented JSON (two spaces, CRLF line breaks).
pub fn encode_json_pretty<W: Writer>(variant: VariantRef<'_>, writer: W) -> usize {
    encode(variant, writer, true)
}

/// Length of [`encode_json`]'s output, without writing it.
pub fn measure_json(variant: VariantRef<'_>) -> usize {
    encode_json(variant, CountingWriter::new())
}

pub fn measure_json_pretty(variant: VariantRef<'_>) -> usize {
    encode_json_pretty(variant, CountingWriter::new())
}
