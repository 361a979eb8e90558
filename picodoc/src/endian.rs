// SPDX-License-Identifier: Apache-2.0

/// Converts between big-endian wire order and host order, in place.
///
/// The operation is its own inverse, so the same call serves both decoding
/// and encoding of every integer and float width.
#[inline]
pub(crate) fn fix_endianness<const N: usize>(bytes: &mut [u8; N]) {
    #[cfg(target_endian = "little")]
    bytes.reverse();
    #[cfg(target_endian = "big")]
    let _ = bytes;
}
