// SPDX-License-Identifier: Apache-2.0

//! Conversions between caller types and stored variants.

use alloc::borrow::Cow;
use alloc::string::String;

use super::data::VariantData;
use super::handles::VariantRef;
use crate::number::{parse_number, Number};
use crate::strings::{AdaptedString, Binary, Linked, Raw, StringAdapter};

/// A caller value on its way into a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    String(AdaptedString<'a>),
    Raw(AdaptedString<'a>),
    Binary(&'a [u8]),
}

/// Types that can be stored with [`VariantMut::set`](crate::VariantMut::set).
pub trait IntoVariant {
    fn to_value(&self) -> Value<'_>;
}

impl IntoVariant for Value<'_> {
    fn to_value(&self) -> Value<'_> {
        *self
    }
}

impl IntoVariant for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

macro_rules! impl_into_variant {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl IntoVariant for $t {
                fn to_value(&self) -> Value<'_> {
                    Value::$variant(*self as $wide)
                }
            }
        )*
    };
}

impl_into_variant!(Signed as i64: i8, i16, i32, i64, isize);
impl_into_variant!(Unsigned as u64: u8, u16, u32, u64, usize);
impl_into_variant!(Float as f64: f32, f64);

macro_rules! impl_into_variant_for_strings {
    ($($t:ty),*) => {
        $(
            impl IntoVariant for $t {
                fn to_value(&self) -> Value<'_> {
                    Value::String(self.adapt())
                }
            }
        )*
    };
}

impl_into_variant_for_strings!(str, String, Linked, Cow<'static, str>);

impl<T: StringAdapter> IntoVariant for Option<T> {
    fn to_value(&self) -> Value<'_> {
        Value::String(self.adapt())
    }
}

impl<S: StringAdapter> IntoVariant for Raw<S> {
    fn to_value(&self) -> Value<'_> {
        Value::Raw(self.0.adapt())
    }
}

impl IntoVariant for Binary<'_> {
    fn to_value(&self) -> Value<'_> {
        Value::Binary(self.0)
    }
}

impl<T: IntoVariant + ?Sized> IntoVariant for &T {
    fn to_value(&self) -> Value<'_> {
        (**self).to_value()
    }
}

/// Types a variant can be read as, with [`VariantRef::to`] and [`VariantRef::is`].
///
/// `is` answers whether the stored value is exactly representable as the
/// type; `from_variant` always produces a value, falling back to the type's
/// zero when it is not.
pub trait VariantType<'d>: Sized {
    fn is(variant: &VariantRef<'d>) -> bool;
    fn from_variant(variant: &VariantRef<'d>) -> Self;
}

/// Number a variant converts to: stored numbers, booleans as 0/1 and
/// numeric strings.
fn numeric_value(variant: &VariantRef<'_>) -> Option<Number> {
    match variant.data()? {
        VariantData::Boolean(b) => Some(Number::Unsigned((*b).into())),
        VariantData::String(_) => variant.as_bytes().and_then(parse_number),
        data => data.number(),
    }
}

macro_rules! impl_integer_variant_type {
    ($($t:ty),*) => {
        $(
            impl<'d> VariantType<'d> for $t {
                fn is(variant: &VariantRef<'d>) -> bool {
                    match variant.data() {
                        Some(data @ (VariantData::Signed(_) | VariantData::Unsigned(_))) => data
                            .number()
                            .and_then(|n| n.to_integer::<$t>())
                            .is_some(),
                        _ => false,
                    }
                }

                fn from_variant(variant: &VariantRef<'d>) -> Self {
                    numeric_value(variant)
                        .and_then(|n| n.to_integer::<$t>())
                        .unwrap_or(0)
                }
            }
        )*
    };
}

impl_integer_variant_type!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float_variant_type {
    ($($t:ty),*) => {
        $(
            impl<'d> VariantType<'d> for $t {
                fn is(variant: &VariantRef<'d>) -> bool {
                    variant.data().and_then(VariantData::number).is_some()
                }

                fn from_variant(variant: &VariantRef<'d>) -> Self {
                    numeric_value(variant).map_or(0.0, |n| n.to_f64() as $t)
                }
            }
        )*
    };
}

impl_float_variant_type!(f32, f64);

impl<'d> VariantType<'d> for bool {
    fn is(variant: &VariantRef<'d>) -> bool {
        matches!(variant.data(), Some(VariantData::Boolean(_)))
    }

    fn from_variant(variant: &VariantRef<'d>) -> Self {
        match variant.data() {
            None | Some(VariantData::Null) => false,
            Some(VariantData::Boolean(b)) => *b,
            Some(VariantData::Signed(v)) => *v != 0,
            Some(VariantData::Unsigned(v)) => *v != 0,
            Some(VariantData::Float(v)) => *v != 0.0,
            Some(_) => true,
        }
    }
}

impl<'d> VariantType<'d> for Option<&'d str> {
    fn is(variant: &VariantRef<'d>) -> bool {
        variant.as_str().is_some()
    }

    fn from_variant(variant: &VariantRef<'d>) -> Self {
        variant.as_str()
    }
}

impl<'d> VariantType<'d> for &'d str {
    fn is(variant: &VariantRef<'d>) -> bool {
        variant.as_str().is_some()
    }

    fn from_variant(variant: &VariantRef<'d>) -> Self {
        variant.as_str().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn with_value<T: IntoVariant>(value: T) -> Document {
        let mut doc = Document::new();
        assert!(doc.root_mut().set(value));
        doc
    }

    #[test]
    fn test_integer_range_checks() {
        let doc = with_value(256u32);
        assert_eq!(doc.root().to::<u8>(), 0);
        assert!(!doc.root().is::<u8>());
        assert_eq!(doc.root().to::<u16>(), 256);

        let doc = with_value(255u32);
        assert_eq!(doc.root().to::<u8>(), 255);
        assert!(doc.root().is::<u8>());

        let doc = with_value(-1i32);
        assert_eq!(doc.root().to::<u32>(), 0);
        assert!(doc.root().is::<i8>());
    }

    #[test]
    fn test_float_to_integer() {
        let doc = with_value(3.75f64);
        assert!(!doc.root().is::<i32>());
        assert_eq!(doc.root().to::<i32>(), 3);
        assert!(doc.root().is::<f64>());
        assert_eq!(doc.root().to::<f32>(), 3.75);
    }

    #[test]
    fn test_bool_conversions() {
        assert!(with_value(7).root().to::<bool>());
        assert!(!with_value(0.0).root().to::<bool>());
        assert!(with_value("").root().to::<bool>());
        assert!(!Document::new().root().to::<bool>());
        assert!(!with_value(1).root().is::<bool>());
        assert_eq!(with_value(true).root().to::<i32>(), 1);
    }

    #[test]
    fn test_numeric_strings() {
        let doc = with_value("42");
        assert_eq!(doc.root().to::<i32>(), 42);
        assert!(!doc.root().is::<i32>());
        assert_eq!(with_value("abc").root().to::<i32>(), 0);
    }

    #[test]
    fn test_string_reads() {
        let doc = with_value("hello");
        assert_eq!(doc.root().to::<&str>(), "hello");
        assert_eq!(doc.root().to::<Option<&str>>(), Some("hello"));

        let doc = with_value(5);
        assert_eq!(doc.root().to::<&str>(), "");
        assert_eq!(doc.root().to::<Option<&str>>(), None);
        assert!(!doc.root().is::<&str>());
    }

    #[test]
    fn test_none_string_stores_null() {
        let doc = with_value(None::<&str>);
        assert!(doc.root().is_null());
    }
}
