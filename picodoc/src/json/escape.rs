// SPDX-License-Identifier: Apache-2.0

//! JSON escape sequences, in both directions.

/// Unescaped byte for the character following a backslash, `None` when the
/// sequence is not a simple escape.
///
/// `\u` escapes are not simple and are handled by the caller.
pub(crate) fn unescape(escape_char: u8) -> Option<u8> {
    match escape_char {
        b'n' => Some(b'\n'),
        b't' => Some(b'\t'),
        b'r' => Some(b'\r'),
        b'\\' => Some(b'\\'),
        b'"' => Some(b'"'),
        b'/' => Some(b'/'),
        b'b' => Some(0x08),
        b'f' => Some(0x0C),
        #[cfg(feature = "single-quotes")]
        b'\'' => Some(b'\''),
        _ => None,
    }
}

/// Character to write after a backslash for `byte`, `None` when `byte`
/// has no short escape.
///
/// `/` is never escaped on output.
pub(crate) fn escape_char(byte: u8) -> Option<u8> {
    match byte {
        b'"' => Some(b'"'),
        b'\\' => Some(b'\\'),
        0x08 => Some(b'b'),
        0x0C => Some(b'f'),
        b'\n' => Some(b'n'),
        b'\r' => Some(b'r'),
        b'\t' => Some(b't'),
        _ => None,
    }
}

/// Numeric value of a hexadecimal digit.
#[cfg_attr(not(feature = "unicode-escape"), allow(dead_code))]
pub(crate) fn hex_digit(byte: u8) -> Option<u32> {
    match byte {
        b'0'..=b'9' => Some(u32::from(byte - b'0')),
        b'a'..=b'f' => Some(u32::from(byte - b'a') + 10),
        b'A'..=b'F' => Some(u32::from(byte - b'A') + 10),
        _ => None,
    }
}

/// Lowercase hexadecimal digit for a nibble.
pub(crate) fn hex_char(nibble: u8) -> u8 {
    b"0123456789abcdef"[usize::from(nibble & 0x0F)]
}

/// Check if a Unicode codepoint is a high surrogate (0xD800-0xDBFF)
#[cfg_attr(not(feature = "unicode-escape"), allow(dead_code))]
pub(crate) fn is_high_surrogate(codepoint: u32) -> bool {
    (0xD800..=0xDBFF).contains(&codepoint)
}

/// Check if a Unicode codepoint is a low surrogate (0xDC00-0xDFFF)
#[cfg_attr(not(feature = "unicode-escape"), allow(dead_code))]
pub(crate) fn is_low_surrogate(codepoint: u32) -> bool {
    (0xDC00..=0xDFFF).contains(&codepoint)
}

/// Combines a UTF-16 surrogate pair into one codepoint.
#[cfg_attr(not(feature = "unicode-escape"), allow(dead_code))]
pub(crate) fn combine_surrogate_pair(high: u32, low: u32) -> Option<u32> {
    if !is_high_surrogate(high) || !is_low_surrogate(low) {
        return None;
    }
    Some(0x10000 + ((high & 0x3FF) << 10) + (low & 0x3FF))
}
