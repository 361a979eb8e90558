// SPDX-License-Identifier: Apache-2.0

//! Float decomposition for text output without a float formatting library.
//!
//! A positive finite float is split into an integral part, up to 9 (6 for
//! `f32`) decimal digits and a decimal exponent. Values at or above `1e7`
//! and at or below `1e-5` are normalized into scientific notation first.

use crate::number::Float;

#[cfg(not(feature = "float32"))]
mod traits {
    use crate::number::Float;

    pub const DECIMAL_PLACES: i8 = 9;
    pub const MAX_DECIMAL_PART: u32 = 1_000_000_000;

    pub const POSITIVE_BINARY_POWERS: [Float; 9] =
        [1e1, 1e2, 1e4, 1e8, 1e16, 1e32, 1e64, 1e128, 1e256];
    pub const NEGATIVE_BINARY_POWERS: [Float; 9] =
        [1e-1, 1e-2, 1e-4, 1e-8, 1e-16, 1e-32, 1e-64, 1e-128, 1e-256];
    pub const NEGATIVE_BINARY_POWERS_PLUS_ONE: [Float; 9] =
        [1e0, 1e-1, 1e-3, 1e-7, 1e-15, 1e-31, 1e-63, 1e-127, 1e-255];
}

#[cfg(feature = "float32")]
mod traits {
    use crate::number::Float;

    pub const DECIMAL_PLACES: i8 = 6;
    pub const MAX_DECIMAL_PART: u32 = 1_000_000;

    pub const POSITIVE_BINARY_POWERS: [Float; 6] = [1e1, 1e2, 1e4, 1e8, 1e16, 1e32];
    pub const NEGATIVE_BINARY_POWERS: [Float; 6] = [1e-1, 1e-2, 1e-4, 1e-8, 1e-16, 1e-32];
    pub const NEGATIVE_BINARY_POWERS_PLUS_ONE: [Float; 6] =
        [1e0, 1e-1, 1e-3, 1e-7, 1e-15, 1e-31];
}

const POSITIVE_EXPONENTIATION_THRESHOLD: Float = 1e7;
const NEGATIVE_EXPONENTIATION_THRESHOLD: Float = 1e-5;

/// The printable pieces of a float: `integral[.decimal]e[exponent]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatParts {
    pub integral: u32,
    /// Decimal digits, to be left-padded with zeros to `decimal_places`.
    pub decimal: u32,
    pub decimal_places: i8,
    pub exponent: i16,
}

/// Brings `value` into `[1, 1e7)` (or leaves it alone) and returns the
/// power of ten that was factored out.
fn normalize(value: &mut Float) -> i16 {
    let mut powers_of_10: i16 = 0;
    let top = traits::POSITIVE_BINARY_POWERS.len() - 1;

    if *value >= POSITIVE_EXPONENTIATION_THRESHOLD {
        for index in (0..=top).rev() {
            if *value >= traits::POSITIVE_BINARY_POWERS[index] {
                *value *= traits::NEGATIVE_BINARY_POWERS[index];
                powers_of_10 += 1 << index;
            }
        }
    }

    if *value > 0.0 && *value <= NEGATIVE_EXPONENTIATION_THRESHOLD {
        for index in (0..=top).rev() {
            if *value < traits::NEGATIVE_BINARY_POWERS_PLUS_ONE[index] {
                *value *= traits::POSITIVE_BINARY_POWERS[index];
                powers_of_10 -= 1 << index;
            }
        }
    }

    powers_of_10
}

/// Decomposes a positive, finite float into printable parts.
///
/// Shared by every text number writer; the digits produced are the minimal
/// ones that survive a parse round trip at the configured precision.
pub fn decompose_float(mut value: Float) -> FloatParts {
    debug_assert!(value >= 0.0 && value.is_finite());

    let mut max_decimal_part = traits::MAX_DECIMAL_PART;
    let mut decimal_places = traits::DECIMAL_PLACES;

    let mut exponent = normalize(&mut value);

    let mut integral = value as u32;
    // reduce number of decimal places by the number of integral places
    let mut tmp = integral;
    while tmp >= 10 {
        max_decimal_part /= 10;
        decimal_places -= 1;
        tmp /= 10;
    }

    let mut remainder = (value - integral as Float) * max_decimal_part as Float;
    let mut decimal = remainder as u32;
    remainder -= decimal as Float;

    // round half up
    decimal += (remainder * 2.0) as u32;
    if decimal >= max_decimal_part {
        decimal = 0;
        integral += 1;
        if exponent != 0 && integral >= 10 {
            exponent += 1;
            integral = 1;
        }
    }

    while decimal % 10 == 0 && decimal_places > 0 {
        decimal /= 10;
        decimal_places -= 1;
    }

    FloatParts {
        integral,
        decimal,
        decimal_places,
        exponent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(integral: u32, decimal: u32, decimal_places: i8, exponent: i16) -> FloatParts {
        FloatParts {
            integral,
            decimal,
            decimal_places,
            exponent,
        }
    }

    #[test]
    fn test_integral_values() {
        assert_eq!(decompose_float(0.0), parts(0, 0, 0, 0));
        assert_eq!(decompose_float(42.0), parts(42, 0, 0, 0));
    }

    #[test]
    fn test_simple_fractions() {
        assert_eq!(decompose_float(0.5), parts(0, 5, 1, 0));
        assert_eq!(decompose_float(3.25), parts(3, 25, 2, 0));
    }

    #[test]
    fn test_large_values_use_exponent() {
        assert_eq!(decompose_float(1e7), parts(1, 0, 0, 7));
        assert_eq!(decompose_float(1.5e10), parts(1, 5, 1, 10));
    }

    #[test]
    fn test_small_values_use_negative_exponent() {
        assert_eq!(decompose_float(1e-5), parts(1, 0, 0, -5));
        assert_eq!(decompose_float(2.5e-7), parts(2, 5, 1, -7));
    }

    #[test]
    #[cfg(not(feature = "float32"))]
    fn test_gps_coordinates() {
        assert_eq!(decompose_float(48.75608), parts(48, 75608, 5, 0));
        assert_eq!(decompose_float(2.302038), parts(2, 302038, 6, 0));
    }

    #[test]
    fn test_rounding_carries_into_integral() {
        #[cfg(not(feature = "float32"))]
        assert_eq!(decompose_float(0.9999999999), parts(1, 0, 0, 0));
        #[cfg(feature = "float32")]
        assert_eq!(decompose_float(0.9999999), parts(1, 0, 0, 0));
    }
}
