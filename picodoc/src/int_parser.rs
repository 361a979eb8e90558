// SPDX-License-Identifier: Apache-2.0

// Integer <-> ASCII conversions, locale independent and panic free.

/// Creates a panic-free, const-stable, base-10 parser for an unsigned magnitude.
macro_rules! define_magnitude_parser {
    ($fn_name:ident, $int_ty:ty) => {
        /// Parses a run of ASCII digits into a(n) `
        #[doc = stringify!($int_ty)]
        /// `, returning `None` on an empty run, a non-digit or overflow.
        pub const fn $fn_name(src: &[u8]) -> Option<$int_ty> {
            if src.is_empty() {
                return None;
            }
            let mut digits = src;
            let mut result: $int_ty = 0;

            while let Some((&byte, rest)) = digits.split_first() {
                let digit = match byte {
                    b'0'..=b'9' => (byte - b'0') as $int_ty,
                    _ => return None,
                };
                result = match result.checked_mul(10) {
                    Some(val) => val,
                    None => return None,
                };
                result = match result.checked_add(digit) {
                    Some(val) => val,
                    None => return None,
                };
                digits = rest;
            }

            Some(result)
        }
    };
}

define_magnitude_parser!(magnitude_u64, u64);

/// Scratch space large enough for any `u64` in decimal, plus a sign.
pub const INTEGER_BUFFER_LEN: usize = 21;

/// Writes `value` in decimal at the end of `buffer` and returns the digits.
pub fn format_unsigned(value: u64, buffer: &mut [u8; INTEGER_BUFFER_LEN]) -> &[u8] {
    let mut begin = buffer.len();
    let mut rest = value;
    loop {
        begin -= 1;
        buffer[begin] = b'0' + (rest % 10) as u8;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    &buffer[begin..]
}

/// Writes `value` in decimal at the end of `buffer` and returns the text.
pub fn format_signed(value: i64, buffer: &mut [u8; INTEGER_BUFFER_LEN]) -> &[u8] {
    let len = format_unsigned(value.unsigned_abs(), buffer).len();
    let mut begin = buffer.len() - len;
    if value < 0 {
        begin -= 1;
        buffer[begin] = b'-';
    }
    &buffer[begin..]
}
