// SPDX-License-Identifier: Apache-2.0

use super::escape::{escape_char, hex_char};
use crate::float_parts::decompose_float;
use crate::int_parser::{format_signed, format_unsigned, INTEGER_BUFFER_LEN};
use crate::io::Writer;
use crate::number::Float;
use crate::variant::{Elements, Members, Visitor};

/// Writes a tree as JSON text, compact or indented.
///
/// Pretty output indents by two spaces per level, ends lines with CRLF and
/// puts a space after each colon; empty containers stay on one line.
pub(crate) struct JsonSerializer<W: Writer> {
    writer: W,
    written: usize,
    pretty: bool,
    nesting: usize,
}

impl<W: Writer> JsonSerializer<W> {
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            written: 0,
            pretty,
            nesting: 0,
        }
    }

    /// Bytes accepted by the writer so far.
    pub fn written(&self) -> usize {
        self.written
    }

    fn write(&mut self, bytes: &[u8]) {
        self.written += self.writer.write(bytes);
    }

    fn write_byte(&mut self, byte: u8) {
        self.written += self.writer.write_byte(byte);
    }

    fn break_line(&mut self) {
        if self.pretty {
            self.write(b"\r\n");
            for _ in 0..self.nesting {
                self.write(b"  ");
            }
        }
    }

    fn write_string(&mut self, value: &[u8]) {
        self.write_byte(b'"');
        let mut start = 0;
        for (i, &byte) in value.iter().enumerate() {
            if let Some(escaped) = escape_char(byte) {
                self.write(&value[start..i]);
                self.write(&[b'\\', escaped]);
                start = i + 1;
            } else if byte < 0x20 {
                self.write(&value[start..i]);
                self.write(&[b'\\', b'u', b'0', b'0', hex_char(byte >> 4), hex_char(byte)]);
                start = i + 1;
            }
        }
        self.write(&value[start..]);
        self.write_byte(b'"');
    }

    fn write_unsigned(&mut self, value: u64) {
        let mut buffer = [0u8; INTEGER_BUFFER_LEN];
        let digits = format_unsigned(value, &mut buffer);
        self.written += self.writer.write(digits);
    }

    fn write_non_finite(&mut self, value: Float) {
        if cfg!(feature = "nan-infinity") {
            if value.is_nan() {
                self.write(b"NaN");
            } else if value < 0.0 {
                self.write(b"-Infinity");
            } else {
                self.write(b"Infinity");
            }
        } else {
            self.write(b"null");
        }
    }

    fn write_float(&mut self, mut value: Float) {
        if !value.is_finite() {
            self.write_non_finite(value);
            return;
        }
        if value < 0.0 {
            self.write_byte(b'-');
            value = -value;
        }

        let parts = decompose_float(value);
        self.write_unsigned(u64::from(parts.integral));

        if parts.decimal_places > 0 {
            // decimal digits, left-padded with zeros
            let mut buffer = [b'0'; 10];
            let mut decimal = parts.decimal;
            let width = parts.decimal_places as usize;
            for digit in buffer[..width].iter_mut().rev() {
                *digit = b'0' + (decimal % 10) as u8;
                decimal /= 10;
            }
            self.write_byte(b'.');
            self.write(&buffer[..width]);
        }

        if parts.exponent < 0 {
            self.write(b"e-");
            self.write_unsigned(u64::from(parts.exponent.unsigned_abs()));
        } else if parts.exponent > 0 {
            self.write_byte(b'e');
            self.write_unsigned(u64::from(parts.exponent.unsigned_abs()));
        }
    }
}

impl<W: Writer> Visitor for JsonSerializer<W> {
    type Output = ();

    fn visit_null(&mut self) {
        self.write(b"null");
    }

    fn visit_bool(&mut self, value: bool) {
        self.write(if value { &b"true"[..] } else { &b"false"[..] });
    }

    fn visit_signed(&mut self, value: i64) {
        let mut buffer = [0u8; INTEGER_BUFFER_LEN];
        let text = format_signed(value, &mut buffer);
        self.written += self.writer.write(text);
    }

    fn visit_unsigned(&mut self, value: u64) {
        self.write_unsigned(value);
    }

    fn visit_float(&mut self, value: Float) {
        self.write_float(value);
    }

    fn visit_string(&mut self, value: &[u8]) {
        self.write_string(value);
    }

    fn visit_raw(&mut self, value: &[u8]) {
        self.write(value);
    }

    /// Binary has no text form.
    fn visit_binary(&mut self, _value: &[u8]) {
        self.write(b"null");
    }

    fn visit_array(&mut self, elements: Elements<'_>) {
        let mut elements = elements.peekable();
        if elements.peek().is_none() {
            self.write(b"[]");
            return;
        }
        self.write_byte(b'[');
        self.nesting += 1;
        let mut first = true;
        for element in elements {
            if !first {
                self.write_byte(b',');
            }
            first = false;
            self.break_line();
            element.accept(self);
        }
        self.nesting -= 1;
        self.break_line();
        self.write_byte(b']');
    }

    fn visit_object(&mut self, members: Members<'_>) {
        let mut members = members.peekable();
        if members.peek().is_none() {
            self.write(b"{}");
            return;
        }
        self.write_byte(b'{');
        self.nesting += 1;
        let mut first = true;
        for member in members {
            if !first {
                self.write_byte(b',');
            }
            first = false;
            self.break_line();
            self.write_string(member.key_bytes());
            self.write(if self.pretty { &b": "[..] } else { &b":"[..] });
            member.value().accept(self);
        }
        self.nesting -= 1;
        self.break_line();
        self.write_byte(b'}');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Binary, Document, Raw};
    use alloc::vec::Vec;

    fn to_json(doc: &Document, pretty: bool) -> Vec<u8> {
        let mut out = Vec::new();
        let mut serializer = JsonSerializer::new(&mut out, pretty);
        doc.root().accept(&mut serializer);
        let written = serializer.written();
        assert_eq!(written, out.len());
        out
    }

    fn float_text(value: Float) -> Vec<u8> {
        let mut doc = Document::new();
        doc.root_mut().set(value);
        to_json(&doc, false)
    }

    #[test]
    fn test_string_escaping() {
        let mut doc = Document::new();
        doc.root_mut().set("q\"b\\s/n\nt\tc\x01\x1f");
        assert_eq!(to_json(&doc, false), br#""q\"b\\s/n\nt\tc\u0001\u001f""#);
    }

    #[test]
    fn test_floats() {
        assert_eq!(float_text(0.0), b"0");
        assert_eq!(float_text(-1.5), b"-1.5");
        assert_eq!(float_text(0.0625), b"0.0625");
        assert_eq!(float_text(1e7), b"1e7");
        assert_eq!(float_text(2.5e-7), b"2.5e-7");
        assert_eq!(float_text(1.5e10), b"1.5e10");
    }

    #[test]
    #[cfg(not(feature = "nan-infinity"))]
    fn test_non_finite_floats_are_null() {
        assert_eq!(float_text(Float::NAN), b"null");
        assert_eq!(float_text(Float::NEG_INFINITY), b"null");
    }

    #[test]
    #[cfg(feature = "nan-infinity")]
    fn test_non_finite_floats() {
        assert_eq!(float_text(Float::NAN), b"NaN");
        assert_eq!(float_text(Float::NEG_INFINITY), b"-Infinity");
    }

    #[test]
    fn test_raw_and_binary() {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        let mut array = root.to_array();
        array.add(Raw("{\"pre\":1}"));
        array.add(Binary(&[1, 2]));
        assert_eq!(to_json(&doc, false), br#"[{"pre":1},null]"#);
    }

    #[test]
    fn test_pretty_layout() {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        let mut object = root.to_object();
        object.insert("a", 1);
        object.get_or_add_member("b").unwrap().to_array().add(true);
        object.get_or_add_member("c").unwrap().to_object();
        object.get_or_add_member("d").unwrap().to_array();
        assert_eq!(
            to_json(&doc, true),
            b"{\r\n  \"a\": 1,\r\n  \"b\": [\r\n    true\r\n  ],\r\n  \"c\": {},\r\n  \"d\": []\r\n}"
        );
    }

    #[test]
    fn test_truncating_sink_reports_written() {
        let mut doc = Document::new();
        doc.root_mut().set("abcdef");
        let mut buffer = [0u8; 4];
        let mut writer = crate::SliceWriter::new(&mut buffer);
        let mut serializer = JsonSerializer::new(&mut writer, false);
        doc.root().accept(&mut serializer);
        assert_eq!(serializer.written(), 4);
        assert_eq!(writer.written(), b"\"abc");
    }
}
