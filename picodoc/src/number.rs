// SPDX-License-Identifier: Apache-2.0

//! Numeric storage types and the three-way {signed, unsigned, float} policy.

use core::str::FromStr;

use crate::int_parser::magnitude_u64;

/// Signed integer type stored in variants, selected by the `int16`/`int32`/`int64` features.
#[cfg(feature = "int16")]
pub type Integer = i16;
/// Unsigned integer type stored in variants.
#[cfg(feature = "int16")]
pub type UInteger = u16;
#[cfg(feature = "int32")]
pub type Integer = i32;
#[cfg(feature = "int32")]
pub type UInteger = u32;
#[cfg(feature = "int64")]
pub type Integer = i64;
#[cfg(feature = "int64")]
pub type UInteger = u64;

/// Floating point type stored in variants, `f32` with the `float32` feature.
#[cfg(not(feature = "float32"))]
pub type Float = f64;
#[cfg(feature = "float32")]
pub type Float = f32;

/// A number in its stored representation.
///
/// The representation is chosen once, when the value is set or parsed, and
/// is never revisited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Signed(Integer),
    Unsigned(UInteger),
    Float(Float),
}

impl Number {
    /// Stores a signed value: signed if it fits, else unsigned if it fits,
    /// else float.
    pub fn from_signed(value: i128) -> Self {
        if let Ok(v) = Integer::try_from(value) {
            Number::Signed(v)
        } else if let Ok(v) = UInteger::try_from(value) {
            Number::Unsigned(v)
        } else {
            Number::Float(value as Float)
        }
    }

    /// Stores an unsigned value: unsigned if it fits, else float.
    pub fn from_unsigned(value: u128) -> Self {
        match UInteger::try_from(value) {
            Ok(v) => Number::Unsigned(v),
            Err(_) => Number::Float(value as Float),
        }
    }

    /// Converts to an integer type, `None` when the value is out of range.
    pub fn to_integer<T: IntegerTarget>(self) -> Option<T> {
        match self {
            Number::Signed(v) => T::try_from(v).ok(),
            Number::Unsigned(v) => T::try_from(v).ok(),
            Number::Float(v) => float_to_integer(f64::from(v)),
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Number::Signed(v) => v as f64,
            Number::Unsigned(v) => v as f64,
            Number::Float(v) => f64::from(v),
        }
    }

    /// Integral value widened for exact comparisons.
    pub fn to_i128(self) -> Option<i128> {
        match self {
            Number::Signed(v) => Some(i128::from(v)),
            Number::Unsigned(v) => Some(i128::from(v)),
            Number::Float(_) => None,
        }
    }
}

/// Integer types that stored numbers can be read as.
pub trait IntegerTarget: Copy + TryFrom<Integer> + TryFrom<UInteger> {
    const SIGNED: bool;
    const BITS: u32;
    /// Truncating conversion, only called for in-range values.
    fn from_f64_truncated(value: f64) -> Self;
}

macro_rules! impl_integer_target {
    ($($t:ty => $signed:expr),* $(,)?) => {
        $(
            impl IntegerTarget for $t {
                const SIGNED: bool = $signed;
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn from_f64_truncated(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_integer_target!(
    i8 => true, i16 => true, i32 => true, i64 => true, isize => true,
    u8 => false, u16 => false, u32 => false, u64 => false, usize => false,
);

/// Exact power of two as a float, without `std` math.
fn pow2(exponent: u32) -> f64 {
    let mut result = 1.0;
    for _ in 0..exponent {
        result *= 2.0;
    }
    result
}

fn float_to_integer<T: IntegerTarget>(value: f64) -> Option<T> {
    let (min, max_exclusive) = if T::SIGNED {
        let half = pow2(T::BITS - 1);
        (-half, half)
    } else {
        (0.0, pow2(T::BITS))
    };
    // NaN fails both comparisons
    if value >= min && value < max_exclusive {
        Some(T::from_f64_truncated(value))
    } else {
        None
    }
}

/// Returns true for bytes that may appear in a number token.
pub(crate) fn can_be_in_number(c: u8) -> bool {
    #[cfg(feature = "nan-infinity")]
    if matches!(c, b'N' | b'a' | b'I' | b'n' | b'f' | b'i' | b't' | b'y') {
        return true;
    }
    matches!(c, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')
}

/// Checks `-? digits ( . digits )? ( [eE] [+-]? digits )?` and reports
/// whether the literal has a fraction or exponent.
fn validate_number(bytes: &[u8]) -> Option<bool> {
    let mut rest = match bytes {
        [b'-', rest @ ..] => rest,
        _ => bytes,
    };
    let digits = |s: &[u8]| s.iter().take_while(|b| b.is_ascii_digit()).count();

    let integral = digits(rest);
    if integral == 0 {
        return None;
    }
    rest = &rest[integral..];
    let mut is_float = false;

    if let [b'.', tail @ ..] = rest {
        let fraction = digits(tail);
        if fraction == 0 {
            return None;
        }
        rest = &tail[fraction..];
        is_float = true;
    }
    if let [b'e' | b'E', tail @ ..] = rest {
        let tail = match tail {
            [b'+' | b'-', t @ ..] => t,
            _ => tail,
        };
        let exponent = digits(tail);
        if exponent == 0 {
            return None;
        }
        rest = &tail[exponent..];
        is_float = true;
    }
    if rest.is_empty() {
        Some(is_float)
    } else {
        None
    }
}

#[cfg(feature = "nan-infinity")]
fn parse_special(bytes: &[u8]) -> Option<Number> {
    match bytes {
        b"NaN" => Some(Number::Float(Float::NAN)),
        b"Infinity" | b"+Infinity" => Some(Number::Float(Float::INFINITY)),
        b"-Infinity" => Some(Number::Float(Float::NEG_INFINITY)),
        _ => None,
    }
}

/// Parses a number literal into its stored representation.
///
/// Integer literals become signed (negative) or unsigned (positive) values;
/// literals exceeding both integer ranges fall back to float.
pub(crate) fn parse_number(bytes: &[u8]) -> Option<Number> {
    #[cfg(feature = "nan-infinity")]
    if let Some(special) = parse_special(bytes) {
        return Some(special);
    }

    let is_float = validate_number(bytes)?;
    if !is_float {
        let (negative, digits) = match bytes {
            [b'-', rest @ ..] => (true, rest),
            _ => (false, bytes),
        };
        if let Some(magnitude) = magnitude_u64(digits) {
            return Some(if negative {
                Number::from_signed(-i128::from(magnitude))
            } else {
                Number::from_unsigned(u128::from(magnitude))
            });
        }
    }

    let text = core::str::from_utf8(bytes).ok()?;
    Float::from_str(text).ok().map(Number::Float)
}
