// SPDX-License-Identifier: Apache-2.0

//! String adapters: how caller strings are presented to the pool.

use alloc::borrow::Cow;
use alloc::string::String;
use core::cmp::Ordering;

use crate::pool::StringId;

/// How the pool should store a string coming from a given adapter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePolicy {
    /// Keep a reference to the caller's `'static` bytes.
    ByAddress,
    /// Copy the bytes into the pool.
    ByCopy,
    /// The adapter reports per value whether its source is `'static`.
    DecideAtRuntime,
}

/// A caller string, adapted for comparison and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptedString<'a> {
    /// Absent string, stored as null.
    Null,
    /// Static bytes that the pool may link instead of copying.
    Linked(&'static [u8]),
    /// Transient bytes that the pool must copy.
    Borrowed(&'a [u8]),
}

impl<'a> AdaptedString<'a> {
    pub fn size(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AdaptedString::Null)
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, AdaptedString::Linked(_))
    }

    /// The string bytes; empty for a null string.
    pub fn bytes(&self) -> &'a [u8] {
        match *self {
            AdaptedString::Null => b"",
            AdaptedString::Linked(bytes) => bytes,
            AdaptedString::Borrowed(bytes) => bytes,
        }
    }

    /// Bytewise comparison; a null string sorts before every other string.
    pub fn compare(&self, other: &[u8]) -> Ordering {
        if self.is_null() {
            return Ordering::Less;
        }
        self.bytes().cmp(other)
    }

    pub fn equals(&self, other: &[u8]) -> bool {
        !self.is_null() && self.bytes() == other
    }

    /// Copies as many bytes as fit into `dest`, returning the count.
    pub fn copy_to(&self, dest: &mut [u8]) -> usize {
        let bytes = self.bytes();
        let n = bytes.len().min(dest.len());
        dest[..n].copy_from_slice(&bytes[..n]);
        n
    }
}

/// Presents a string type to the pool.
pub trait StringAdapter {
    const POLICY: StoragePolicy;

    fn adapt(&self) -> AdaptedString<'_>;
}

impl StringAdapter for str {
    const POLICY: StoragePolicy = StoragePolicy::ByCopy;

    fn adapt(&self) -> AdaptedString<'_> {
        AdaptedString::Borrowed(self.as_bytes())
    }
}

impl StringAdapter for [u8] {
    const POLICY: StoragePolicy = StoragePolicy::ByCopy;

    fn adapt(&self) -> AdaptedString<'_> {
        AdaptedString::Borrowed(self)
    }
}

impl StringAdapter for String {
    const POLICY: StoragePolicy = StoragePolicy::ByCopy;

    fn adapt(&self) -> AdaptedString<'_> {
        AdaptedString::Borrowed(self.as_bytes())
    }
}

impl<T: StringAdapter + ?Sized> StringAdapter for &T {
    const POLICY: StoragePolicy = T::POLICY;

    fn adapt(&self) -> AdaptedString<'_> {
        (**self).adapt()
    }
}

impl<T: StringAdapter> StringAdapter for Option<T> {
    const POLICY: StoragePolicy = T::POLICY;

    fn adapt(&self) -> AdaptedString<'_> {
        match self {
            Some(s) => s.adapt(),
            None => AdaptedString::Null,
        }
    }
}

impl StringAdapter for Cow<'static, str> {
    const POLICY: StoragePolicy = StoragePolicy::DecideAtRuntime;

    fn adapt(&self) -> AdaptedString<'_> {
        match self {
            Cow::Borrowed(s) => AdaptedString::Linked(s.as_bytes()),
            Cow::Owned(s) => AdaptedString::Borrowed(s.as_bytes()),
        }
    }
}

/// A `'static` string the document stores by reference instead of copying.
///
/// ```
/// use picodoc::{Document, Linked};
///
/// let mut doc = Document::new();
/// doc.root_mut().set(Linked("hello"));
/// assert_eq!(doc.string_count(), 0);
/// assert_eq!(doc.root().as_str(), Some("hello"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linked(pub &'static str);

impl StringAdapter for Linked {
    const POLICY: StoragePolicy = StoragePolicy::ByAddress;

    fn adapt(&self) -> AdaptedString<'_> {
        AdaptedString::Linked(self.0.as_bytes())
    }
}

/// A pre-serialized fragment, written verbatim by the encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Raw<S>(pub S);

/// An opaque byte payload (MessagePack `bin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binary<'b>(pub &'b [u8]);

/// Where the bytes of a stored string live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringRef {
    Linked(&'static [u8]),
    Owned(StringId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies() {
        assert_eq!(<&str as StringAdapter>::POLICY, StoragePolicy::ByCopy);
        assert_eq!(Linked::POLICY, StoragePolicy::ByAddress);
        assert_eq!(
            <Cow<'static, str>>::POLICY,
            StoragePolicy::DecideAtRuntime
        );
    }

    #[test]
    fn test_cow_decides_at_runtime() {
        let borrowed: Cow<'static, str> = Cow::Borrowed("abc");
        let owned: Cow<'static, str> = Cow::Owned(String::from("abc"));
        assert!(borrowed.adapt().is_linked());
        assert!(!owned.adapt().is_linked());
        assert_eq!(owned.adapt().bytes(), b"abc");
    }

    #[test]
    fn test_null_adapter() {
        let none: Option<&str> = None;
        let adapted = none.adapt();
        assert!(adapted.is_null());
        assert_eq!(adapted.size(), 0);
        assert!(!adapted.equals(b""));
        assert_eq!(adapted.compare(b""), Ordering::Less);
    }

    #[test]
    fn test_compare_and_copy() {
        let adapted = "hello".adapt();
        assert_eq!(adapted.compare(b"hello"), Ordering::Equal);
        assert_eq!(adapted.compare(b"world"), Ordering::Less);
        assert!(adapted.equals(b"hello"));

        let mut dest = [0u8; 3];
        assert_eq!(adapted.copy_to(&mut dest), 3);
        assert_eq!(&dest, b"hel");
    }
}
