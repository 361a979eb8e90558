// SPDX-License-Identifier: Apache-2.0

use super::data::VariantData;
use super::handles::VariantRef;
use crate::number::Number;

fn numbers_equal(a: Number, b: Number) -> bool {
    match (a.to_i128(), b.to_i128()) {
        (Some(x), Some(y)) => x == y,
        _ => a.to_f64() == b.to_f64(),
    }
}

fn arrays_equal(a: &VariantRef<'_>, b: &VariantRef<'_>) -> bool {
    let mut left = a.elements();
    let mut right = b.elements();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x == y => continue,
            _ => return false,
        }
    }
}

/// Same size, and every member of `a` has an equal counterpart in `b`.
/// A missing member never equals a null one.
fn objects_equal(a: &VariantRef<'_>, b: &VariantRef<'_>) -> bool {
    a.size() == b.size()
        && a.members().all(|member| {
            let other = b.member(member.key_bytes());
            !other.is_unbound() && member.value() == other
        })
}

/// Structural equality across documents.
///
/// Numbers compare by value whatever their stored representation; arrays
/// compare in order, objects regardless of member order. Unbound handles
/// equal null.
impl PartialEq for VariantRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        let null = VariantData::Null;
        let a = self.data().unwrap_or(&null);
        let b = other.data().unwrap_or(&null);
        if let (Some(x), Some(y)) = (a.number(), b.number()) {
            return numbers_equal(x, y);
        }
        match (a, b) {
            (VariantData::Null, VariantData::Null) => true,
            (VariantData::Boolean(x), VariantData::Boolean(y)) => x == y,
            (VariantData::String(_), VariantData::String(_)) => self.as_bytes() == other.as_bytes(),
            (VariantData::Raw(_), VariantData::Raw(_)) => self.as_raw() == other.as_raw(),
            (VariantData::Binary(_), VariantData::Binary(_)) => {
                self.as_binary() == other.as_binary()
            }
            (VariantData::Array(_), VariantData::Array(_)) => arrays_equal(self, other),
            (VariantData::Object(_), VariantData::Object(_)) => objects_equal(self, other),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{decode_json, Document, Linked};

    #[test]
    fn test_numbers_compare_by_value() {
        let mut a = Document::new();
        let mut b = Document::new();
        a.root_mut().set(2u8);
        b.root_mut().set(2i64);
        assert_eq!(a.root(), b.root());
        b.root_mut().set(2.0);
        assert_eq!(a.root(), b.root());
        b.root_mut().set(2.5);
        assert_ne!(a.root(), b.root());
        b.root_mut().set(true);
        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn test_linked_and_owned_strings_are_equal() {
        let mut a = Document::new();
        let mut b = Document::new();
        a.root_mut().set(Linked("same"));
        b.root_mut().set("same");
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn test_array_order_matters() {
        let mut a = Document::new();
        let mut b = Document::new();
        let mut root = a.root_mut();
        let mut array = root.to_array();
        array.add(1);
        array.add(2);
        let mut root = b.root_mut();
        let mut array = root.to_array();
        array.add(2);
        array.add(1);
        assert_ne!(a.root(), b.root());
        assert!(b.root_mut().remove(0));
        assert!(b.root_mut().as_array_mut().add(2));
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn test_object_order_does_not_matter() {
        let mut a = Document::new();
        let mut b = Document::new();
        let mut root = a.root_mut();
        let mut object = root.to_object();
        object.insert("x", 1);
        object.insert("y", "two");
        let mut root = b.root_mut();
        let mut object = root.to_object();
        object.insert("y", "two");
        object.insert("x", 1);
        assert_eq!(a.root(), b.root());
        b.root_mut().as_object_mut().insert("z", 3);
        assert_ne!(a.root(), b.root());
    }

    #[test]
    fn test_null_member_differs_from_missing_member() {
        let mut a = Document::new();
        let mut b = Document::new();
        decode_json(&mut a, br#"{"k":null,"x":1}"#).unwrap();
        decode_json(&mut b, br#"{"x":1,"y":2}"#).unwrap();
        assert_ne!(a.root(), b.root());
        assert_ne!(b.root(), a.root());

        decode_json(&mut b, br#"{"x":1,"k":null}"#).unwrap();
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn test_unbound_equals_null() {
        let a = Document::new();
        assert_eq!(a.root().get(0), a.root());
    }
}
