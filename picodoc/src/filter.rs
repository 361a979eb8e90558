// SPDX-License-Identifier: Apache-2.0

//! Per-call decoding options: nesting limit and input filter.

use crate::error::DecodeError;
use crate::variant::{VariantData, VariantRef};

/// Maximum container nesting accepted by a decoder.
///
/// A limit of `N` admits a root container holding up to `N` further levels
/// of containers. A limit of 0 admits only scalar documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestingLimit(u8);

impl NestingLimit {
    pub const DEFAULT: NestingLimit = NestingLimit(10);

    pub const fn new(limit: u8) -> Self {
        Self(limit)
    }

    pub const fn value(&self) -> u8 {
        self.0
    }

    pub(crate) fn budget(&self) -> Depth {
        if self.0 == 0 {
            Depth(0)
        } else {
            Depth(u16::from(self.0) + 1)
        }
    }
}

impl Default for NestingLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Remaining container levels during a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Depth(u16);

impl Depth {
    /// Descends into a container, failing when no level is left.
    pub fn enter(self) -> Result<Depth, DecodeError> {
        match self.0.checked_sub(1) {
            Some(left) => Ok(Depth(left)),
            None => Err(DecodeError::TooDeep),
        }
    }
}

/// Selects which parts of the input a decoder keeps.
///
/// A filter tree mirrors the shape of the wanted data: `true` keeps a whole
/// subtree, an object keeps the listed members (`"*"` matches any other
/// key), and an array's first element filters every element. Filtered-out
/// values are skipped without allocating.
///
/// ```
/// use picodoc::{decode_json, decode_json_with, DecodeOptions, Document, Filter};
///
/// let mut filter = Document::new();
/// decode_json(&mut filter, br#"{"list":[{"id":true}]}"#).unwrap();
///
/// let mut doc = Document::new();
/// let input = br#"{"list":[{"id":1,"name":"a"},{"id":2,"name":"b"}],"other":0}"#;
/// let options = DecodeOptions::new().filter(Filter::new(filter.root()));
/// decode_json_with(&mut doc, input, options).unwrap();
///
/// assert_eq!(doc.root().size(), 1);
/// assert_eq!(doc.root().member("list").get(1).member("id").to::<i32>(), 2);
/// assert!(doc.root().member("list").get(1).member("name").is_unbound());
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Filter<'f> {
    /// Keep everything.
    AllowAll,
    /// Keep nothing.
    Reject,
    /// Keep what the tree describes.
    Tree(VariantRef<'f>),
}

impl<'f> Filter<'f> {
    pub fn new(tree: VariantRef<'f>) -> Self {
        Filter::Tree(tree)
    }

    fn is_true(tree: &VariantRef<'f>) -> bool {
        matches!(tree.data(), Some(VariantData::Boolean(true)))
    }

    /// Whether the current value is kept at all.
    pub fn allow(&self) -> bool {
        match self {
            Filter::AllowAll => true,
            Filter::Reject => false,
            Filter::Tree(tree) => tree.to::<bool>(),
        }
    }

    pub fn allow_array(&self) -> bool {
        match self {
            Filter::AllowAll => true,
            Filter::Reject => false,
            Filter::Tree(tree) => Self::is_true(tree) || tree.is_array(),
        }
    }

    pub fn allow_object(&self) -> bool {
        match self {
            Filter::AllowAll => true,
            Filter::Reject => false,
            Filter::Tree(tree) => Self::is_true(tree) || tree.is_object(),
        }
    }

    /// Whether a scalar at this position is kept.
    pub fn allow_value(&self) -> bool {
        match self {
            Filter::AllowAll => true,
            Filter::Reject => false,
            Filter::Tree(tree) => Self::is_true(tree),
        }
    }

    /// Filter for the member named `key`.
    pub fn member(&self, key: &[u8]) -> Filter<'f> {
        match self {
            Filter::Tree(tree) if !Self::is_true(tree) => {
                let member = tree.member(key);
                if member.is_null() {
                    Filter::Tree(tree.member("*"))
                } else {
                    Filter::Tree(member)
                }
            }
            _ => *self,
        }
    }

    /// Filter for every element of an array.
    pub fn element(&self) -> Filter<'f> {
        match self {
            Filter::Tree(tree) if !Self::is_true(tree) => Filter::Tree(tree.get(0)),
            _ => *self,
        }
    }
}

/// Options of a single decode call.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions<'f> {
    pub nesting_limit: NestingLimit,
    pub filter: Filter<'f>,
}

impl Default for DecodeOptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'f> DecodeOptions<'f> {
    pub const fn new() -> Self {
        Self {
            nesting_limit: NestingLimit::DEFAULT,
            filter: Filter::AllowAll,
        }
    }

    pub fn nesting_limit(self, nesting_limit: NestingLimit) -> Self {
        Self {
            nesting_limit,
            ..self
        }
    }

    pub fn filter(self, filter: Filter<'f>) -> Self {
        Self { filter, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_json, Document};

    #[test]
    fn test_budget_counts_root_container() {
        assert_eq!(NestingLimit::new(0).budget(), Depth(0));
        assert_eq!(NestingLimit::new(2).budget(), Depth(3));
        assert_eq!(Depth(1).enter(), Ok(Depth(0)));
        assert_eq!(Depth(0).enter(), Err(DecodeError::TooDeep));
        assert_eq!(NestingLimit::default().value(), 10);
    }

    #[test]
    fn test_fixed_filters() {
        assert!(Filter::AllowAll.allow_value());
        assert!(Filter::AllowAll.member(b"x").allow_object());
        assert!(!Filter::Reject.allow());
        assert!(!Filter::Reject.element().allow_array());
    }

    #[test]
    fn test_tree_filter_paths() {
        let mut tree = Document::new();
        decode_json(&mut tree, br#"{"a":true,"b":{"c":true},"*":[true],"d":false}"#).unwrap();
        let filter = Filter::new(tree.root());

        assert!(filter.allow_object());
        assert!(!filter.allow_value());
        assert!(filter.member(b"a").allow_value());
        assert!(filter.member(b"a").member(b"anything").allow_array());
        assert!(filter.member(b"b").allow_object());
        assert!(!filter.member(b"b").member(b"z").allow());
        assert!(filter.member(b"other").allow_array());
        assert!(filter.member(b"other").element().allow_value());
        assert!(!filter.member(b"d").allow());
    }
}
