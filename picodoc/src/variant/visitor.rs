// SPDX-License-Identifier: Apache-2.0

use super::data::VariantData;
use super::handles::{Elements, Members, VariantRef};
use crate::number::Float;

/// Double-dispatch target over the kinds of a variant.
///
/// Both serializers are visitors; [`VariantRef::accept`] is the single place
/// that inspects the stored representation on their behalf.
pub trait Visitor {
    type Output;

    fn visit_null(&mut self) -> Self::Output;
    fn visit_bool(&mut self, value: bool) -> Self::Output;
    fn visit_signed(&mut self, value: i64) -> Self::Output;
    fn visit_unsigned(&mut self, value: u64) -> Self::Output;
    fn visit_float(&mut self, value: Float) -> Self::Output;
    fn visit_string(&mut self, value: &[u8]) -> Self::Output;
    /// A pre-serialized fragment.
    fn visit_raw(&mut self, value: &[u8]) -> Self::Output;
    fn visit_binary(&mut self, value: &[u8]) -> Self::Output;
    fn visit_array(&mut self, elements: Elements<'_>) -> Self::Output;
    fn visit_object(&mut self, members: Members<'_>) -> Self::Output;
}

impl VariantRef<'_> {
    /// Calls the visitor method matching the stored kind; unbound handles
    /// are visited as null.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        let Some(data) = self.data() else {
            return visitor.visit_null();
        };
        let resources = self.resources();
        match *data {
            VariantData::Null => visitor.visit_null(),
            VariantData::Boolean(b) => visitor.visit_bool(b),
            VariantData::Signed(v) => visitor.visit_signed(v.into()),
            VariantData::Unsigned(v) => visitor.visit_unsigned(v.into()),
            VariantData::Float(v) => visitor.visit_float(v),
            VariantData::String(s) => visitor.visit_string(resources.string_bytes(s)),
            VariantData::Raw(s) => visitor.visit_raw(resources.string_bytes(s)),
            VariantData::Binary(s) => visitor.visit_binary(resources.string_bytes(s)),
            VariantData::Array(_) => visitor.visit_array(self.elements()),
            VariantData::Object(_) => visitor.visit_object(self.members()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;
    use alloc::string::String;
    use core::fmt::Write;

    /// Renders a tree in a compact debugging notation.
    struct Outline(String);

    impl Visitor for Outline {
        type Output = ();

        fn visit_null(&mut self) {
            self.0.push('~');
        }
        fn visit_bool(&mut self, value: bool) {
            self.0.push(if value { 'T' } else { 'F' });
        }
        fn visit_signed(&mut self, value: i64) {
            let _ = write!(self.0, "i{}", value);
        }
        fn visit_unsigned(&mut self, value: u64) {
            let _ = write!(self.0, "u{}", value);
        }
        fn visit_float(&mut self, value: Float) {
            let _ = write!(self.0, "f{}", value);
        }
        fn visit_string(&mut self, value: &[u8]) {
            let _ = write!(self.0, "s{}", value.len());
        }
        fn visit_raw(&mut self, value: &[u8]) {
            let _ = write!(self.0, "r{}", value.len());
        }
        fn visit_binary(&mut self, value: &[u8]) {
            let _ = write!(self.0, "b{}", value.len());
        }
        fn visit_array(&mut self, elements: Elements<'_>) {
            self.0.push('[');
            for element in elements {
                element.accept(self);
            }
            self.0.push(']');
        }
        fn visit_object(&mut self, members: Members<'_>) {
            self.0.push('{');
            for member in members {
                self.0.push_str(member.key());
                member.value().accept(self);
            }
            self.0.push('}');
        }
    }

    #[test]
    fn test_dispatch_covers_every_kind() {
        let mut doc = Document::new();
        let mut root = doc.root_mut();
        let mut array = root.to_array();
        array.add_element();
        array.add(true);
        array.add(-2);
        array.add(3u8);
        array.add(0.5);
        array.add("abc");
        array.add(crate::Raw("1"));
        array.add(crate::Binary(&[0, 1]));
        array.add_element().unwrap().get_or_add_member("k").unwrap().set(false);

        let mut outline = Outline(String::new());
        doc.root().accept(&mut outline);
        assert_eq!(outline.0, "[~Ti-2u3f0.5s3r1b2{kF}]");
    }

    #[test]
    fn test_unbound_visits_null() {
        let doc = Document::new();
        let mut outline = Outline(String::new());
        doc.root().get(3).accept(&mut outline);
        assert_eq!(outline.0, "~");
    }
}
