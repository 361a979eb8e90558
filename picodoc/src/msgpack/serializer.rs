// SPDX-License-Identifier: Apache-2.0

use crate::endian::fix_endianness;
use crate::io::Writer;
use crate::number::Float;
use crate::variant::{Elements, Members, Visitor};

/// Writes a tree as MessagePack, always picking the most compact tag.
pub(crate) struct MsgPackSerializer<W: Writer> {
    writer: W,
    written: usize,
}

impl<W: Writer> MsgPackSerializer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    fn write(&mut self, bytes: &[u8]) {
        self.written += self.writer.write(bytes);
    }

    fn write_byte(&mut self, byte: u8) {
        self.written += self.writer.write_byte(byte);
    }

    /// Writes a tag followed by a host-order field in big-endian order.
    fn write_tagged<const N: usize>(&mut self, tag: u8, mut field: [u8; N]) {
        fix_endianness(&mut field);
        self.write_byte(tag);
        self.write(&field);
    }

    /// Writes the length header of a str, bin, array or map.
    ///
    /// Uses the fix form (tag and largest length) when given and the length
    /// fits, then the 8-bit form when given, then `tag16`. The 32-bit tag
    /// always directly follows `tag16`.
    fn write_length(
        &mut self,
        length: usize,
        fix: Option<(u8, usize)>,
        tag8: Option<u8>,
        tag16: u8,
    ) {
        match fix {
            Some((tag, max)) if length <= max => return self.write_byte(tag | length as u8),
            _ => {}
        }
        match tag8 {
            Some(tag) if length <= usize::from(u8::MAX) => {
                return self.write(&[tag, length as u8]);
            }
            _ => {}
        }
        if length <= usize::from(u16::MAX) {
            self.write_tagged(tag16, (length as u16).to_ne_bytes());
        } else {
            self.write_tagged(tag16 + 1, (length as u32).to_ne_bytes());
        }
    }
}

impl<W: Writer> Visitor for MsgPackSerializer<W> {
    type Output = ();

    fn visit_null(&mut self) {
        self.write_byte(0xc0);
    }

    fn visit_bool(&mut self, value: bool) {
        self.write_byte(if value { 0xc3 } else { 0xc2 });
    }

    fn visit_signed(&mut self, value: i64) {
        if value >= 0 {
            self.visit_unsigned(value.unsigned_abs());
        } else if value >= -32 {
            self.write_byte(value as u8);
        } else if let Ok(v) = i8::try_from(value) {
            self.write_tagged(0xd0, v.to_ne_bytes());
        } else if let Ok(v) = i16::try_from(value) {
            self.write_tagged(0xd1, v.to_ne_bytes());
        } else if let Ok(v) = i32::try_from(value) {
            self.write_tagged(0xd2, v.to_ne_bytes());
        } else {
            self.write_tagged(0xd3, value.to_ne_bytes());
        }
    }

    fn visit_unsigned(&mut self, value: u64) {
        if value <= 0x7f {
            self.write_byte(value as u8);
        } else if let Ok(v) = u8::try_from(value) {
            self.write_tagged(0xcc, v.to_ne_bytes());
        } else if let Ok(v) = u16::try_from(value) {
            self.write_tagged(0xcd, v.to_ne_bytes());
        } else if let Ok(v) = u32::try_from(value) {
            self.write_tagged(0xce, v.to_ne_bytes());
        } else {
            self.write_tagged(0xcf, value.to_ne_bytes());
        }
    }

    fn visit_float(&mut self, value: Float) {
        let value = f64::from(value);
        let narrow = value as f32;
        if f64::from(narrow) == value || value.is_nan() {
            self.write_tagged(0xca, narrow.to_ne_bytes());
        } else {
            self.write_tagged(0xcb, value.to_ne_bytes());
        }
    }

    fn visit_string(&mut self, value: &[u8]) {
        self.write_length(value.len(), Some((0xa0, 31)), Some(0xd9), 0xda);
        self.write(value);
    }

    fn visit_raw(&mut self, value: &[u8]) {
        self.write(value);
    }

    fn visit_binary(&mut self, value: &[u8]) {
        self.write_length(value.len(), None, Some(0xc4), 0xc5);
        self.write(value);
    }

    fn visit_array(&mut self, elements: Elements<'_>) {
        self.write_length(elements.clone().count(), Some((0x90, 15)), None, 0xdc);
        for element in elements {
            element.accept(self);
        }
    }

    fn visit_object(&mut self, members: Members<'_>) {
        self.write_length(members.clone().count(), Some((0x80, 15)), None, 0xde);
        for member in members {
            self.visit_string(member.key_bytes());
            member.value().accept(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Binary, Document, IntoVariant, Raw};
    use alloc::vec::Vec;
    use paste::paste;

    fn encode_value<T: IntoVariant>(value: T) -> Vec<u8> {
        let mut doc = Document::new();
        assert!(doc.root_mut().set(value));
        let mut out = Vec::new();
        let mut serializer = MsgPackSerializer::new(&mut out);
        doc.root().accept(&mut serializer);
        assert_eq!(serializer.written(), out.len());
        out
    }

    macro_rules! encodes_as {
        ($($name:ident: $value:expr => $bytes:expr;)*) => {
            paste! {
                $(
                    #[test]
                    fn [<test_encodes_ $name>]() {
                        assert_eq!(encode_value($value), $bytes);
                    }
                )*
            }
        };
    }

    encodes_as! {
        positive_fixint: 2 => [0x02];
        uint8: 200u32 => [0xcc, 0xc8];
        uint16: 0x1234 => [0xcd, 0x12, 0x34];
        uint32: 0x1234_5678u32 => [0xce, 0x12, 0x34, 0x56, 0x78];
        negative_fixint: -1 => [0xff];
        int8: -100 => [0xd0, 0x9c];
        int16: -1000 => [0xd1, 0xfc, 0x18];
        int32: -100_000 => [0xd2, 0xff, 0xfe, 0x79, 0x60];
        null: Option::<&str>::None => [0xc0];
        boolean: true => [0xc3];
        float32_exact: 1.5 => [0xca, 0x3f, 0xc0, 0x00, 0x00];
        fixstr: "hi" => [0xa2, b'h', b'i'];
        binary: Binary(&[7, 8]) => [0xc4, 0x02, 0x07, 0x08];
        raw: Raw(&[0x93u8, 1, 2, 3][..]) => [0x93, 1, 2, 3];
    }

    #[test]
    #[cfg(not(feature = "float32"))]
    fn test_inexact_float_uses_float64() {
        assert_eq!(
            encode_value(0.1),
            [0xcb, 0x3f, 0xb9, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]
        );
    }

    #[test]
    fn test_str8_boundary() {
        let text = "x".repeat(32);
        let out = encode_value(text.as_str());
        assert_eq!(&out[..2], [0xd9, 32]);
        assert_eq!(out.len(), 34);
    }

    #[test]
    fn test_collection_headers() {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        let mut array = root.to_array();
        for i in 0..16 {
            array.add(i);
        }
        let mut out = Vec::new();
        doc.root().accept(&mut MsgPackSerializer::new(&mut out));
        assert_eq!(&out[..3], [0xdc, 0x00, 0x10]);
        assert_eq!(out.len(), 3 + 16);

        let mut doc = Document::new();
        doc.root_mut().get_or_add_member("a").unwrap().set(1);
        let mut out = Vec::new();
        doc.root().accept(&mut MsgPackSerializer::new(&mut out));
        assert_eq!(out, [0x81, 0xa1, b'a', 0x01]);
    }
}
