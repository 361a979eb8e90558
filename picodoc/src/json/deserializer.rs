// SPDX-License-Identifier: Apache-2.0

use log::trace;

use super::escape;
use crate::error::DecodeError;
use crate::filter::{DecodeOptions, Depth, Filter};
use crate::io::Source;
use crate::number::{can_be_in_number, parse_number};
use crate::pool::ResourceManager;
use crate::strings::StringRef;
use crate::variant::{CollectionData, VariantData};

/// Longest number token accepted, in bytes.
const MAX_NUMBER_LEN: usize = 63;

/// One byte of lookahead over a [`Source`].
struct Latch<S: Source> {
    source: S,
    current: Option<u8>,
    loaded: bool,
}

impl<S: Source> Latch<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            current: None,
            loaded: false,
        }
    }

    fn current(&mut self) -> Option<u8> {
        if !self.loaded {
            self.current = self.source.read_byte();
            self.loaded = true;
        }
        self.current
    }

    /// Consumes the current byte.
    fn clear(&mut self) {
        self.loaded = false;
    }

    fn failed(&self) -> bool {
        self.source.failed()
    }
}

/// Recursive-descent JSON decoder writing straight into a pool.
///
/// Every container level costs one native stack frame, bounded by the
/// nesting limit.
pub(crate) struct JsonDeserializer<'r, S: Source> {
    latch: Latch<S>,
    resources: &'r mut ResourceManager,
}

impl<'r, S: Source> JsonDeserializer<'r, S> {
    pub fn new(source: S, resources: &'r mut ResourceManager) -> Self {
        Self {
            latch: Latch::new(source),
            resources,
        }
    }

    /// Decodes one document and returns its root.
    pub fn parse(mut self, options: DecodeOptions<'_>) -> Result<VariantData, DecodeError> {
        self.skip_spaces_and_comments()?;
        let first = match self.latch.current() {
            Some(c) => c,
            None if self.latch.failed() => return Err(DecodeError::IncompleteInput),
            None => return Err(DecodeError::EmptyInput),
        };

        let root = self.parse_variant(options.filter, options.nesting_limit.budget())?;

        if !matches!(first, b'[' | b'{') {
            self.skip_spaces_and_comments()?;
            if self.latch.current().is_some() {
                return Err(DecodeError::InvalidInput);
            }
        }
        Ok(root)
    }

    /// Consumes and returns the current byte; end of input here means the
    /// document was cut short.
    fn next_byte(&mut self) -> Result<u8, DecodeError> {
        let c = self.latch.current().ok_or(DecodeError::IncompleteInput)?;
        self.latch.clear();
        Ok(c)
    }

    /// Consumes `expected` if it is the current byte.
    fn eat(&mut self, expected: u8) -> Result<bool, DecodeError> {
        match self.latch.current() {
            Some(c) if c == expected => {
                self.latch.clear();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DecodeError::IncompleteInput),
        }
    }

    fn skip_spaces_and_comments(&mut self) -> Result<(), DecodeError> {
        loop {
            match self.latch.current() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.latch.clear(),
                #[cfg(feature = "comments")]
                Some(b'/') => {
                    self.latch.clear();
                    self.skip_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Skips the rest of a comment whose leading `/` was consumed.
    #[cfg(feature = "comments")]
    fn skip_comment(&mut self) -> Result<(), DecodeError> {
        match self.next_byte()? {
            b'*' => {
                let mut star = false;
                loop {
                    let c = self.next_byte()?;
                    if star && c == b'/' {
                        return Ok(());
                    }
                    star = c == b'*';
                }
            }
            b'/' => {
                // a line comment may run to the end of input
                while let Some(c) = self.latch.current() {
                    self.latch.clear();
                    if c == b'\n' {
                        break;
                    }
                }
                Ok(())
            }
            _ => Err(DecodeError::InvalidInput),
        }
    }

    fn parse_variant(&mut self, filter: Filter<'_>, depth: Depth) -> Result<VariantData, DecodeError> {
        self.skip_spaces_and_comments()?;
        let c = self.latch.current().ok_or(DecodeError::IncompleteInput)?;
        match c {
            b'[' => self.parse_array(filter, depth),
            b'{' => self.parse_object(filter, depth),
            b'"' => self.parse_string_value(filter),
            #[cfg(feature = "single-quotes")]
            b'\'' => self.parse_string_value(filter),
            b't' => self.parse_keyword(b"true", VariantData::Boolean(true), filter),
            b'f' => self.parse_keyword(b"false", VariantData::Boolean(false), filter),
            b'n' => self.parse_keyword(b"null", VariantData::Null, filter),
            c if can_be_in_number(c) => self.parse_number_value(filter),
            _ => Err(DecodeError::InvalidInput),
        }
    }

    fn parse_array(&mut self, filter: Filter<'_>, depth: Depth) -> Result<VariantData, DecodeError> {
        let depth = depth.enter()?;
        self.latch.clear();

        let keep = filter.allow_array();
        let element_filter = if keep { filter.element() } else { Filter::Reject };
        trace!("array, keep={}", keep);
        let mut array = CollectionData::EMPTY;

        self.skip_spaces_and_comments()?;
        if !self.eat(b']')? {
            loop {
                if keep && element_filter.allow() {
                    let id = self.resources.alloc_slot()?;
                    array.append(id, self.resources);
                    let data = self.parse_variant(element_filter, depth)?;
                    self.resources.slot_mut(id).data = data;
                } else {
                    self.parse_variant(Filter::Reject, depth)?;
                }

                self.skip_spaces_and_comments()?;
                if self.eat(b']')? {
                    break;
                }
                if !self.eat(b',')? {
                    return Err(DecodeError::InvalidInput);
                }
            }
        }

        Ok(if keep {
            VariantData::Array(array)
        } else {
            VariantData::Null
        })
    }

    fn parse_object(&mut self, filter: Filter<'_>, depth: Depth) -> Result<VariantData, DecodeError> {
        let depth = depth.enter()?;
        self.latch.clear();

        let keep = filter.allow_object();
        trace!("object, keep={}", keep);
        let mut object = CollectionData::EMPTY;

        self.skip_spaces_and_comments()?;
        if !self.eat(b'}')? {
            loop {
                self.skip_spaces_and_comments()?;
                self.parse_key(keep)?;

                self.skip_spaces_and_comments()?;
                if !self.eat(b':')? {
                    return Err(DecodeError::InvalidInput);
                }

                let member_filter = if keep {
                    filter.member(self.resources.pending_string())
                } else {
                    Filter::Reject
                };

                if keep && member_filter.allow() {
                    let id = object.claim_member(self.resources)?;
                    let data = self.parse_variant(member_filter, depth)?;
                    self.resources.slot_mut(id).data = data;
                } else {
                    self.resources.discard_string();
                    self.parse_variant(Filter::Reject, depth)?;
                }

                self.skip_spaces_and_comments()?;
                if self.eat(b'}')? {
                    break;
                }
                if !self.eat(b',')? {
                    return Err(DecodeError::InvalidInput);
                }
            }
        }

        Ok(if keep {
            VariantData::Object(object)
        } else {
            VariantData::Null
        })
    }

    /// Reads a member key into the string builder (when `store`).
    fn parse_key(&mut self, store: bool) -> Result<(), DecodeError> {
        match self.latch.current() {
            Some(b'"') => self.read_quoted_string(store),
            #[cfg(feature = "single-quotes")]
            Some(b'\'') => self.read_quoted_string(store),
            Some(_) => Err(DecodeError::InvalidInput),
            None => Err(DecodeError::IncompleteInput),
        }
    }

    fn parse_string_value(&mut self, filter: Filter<'_>) -> Result<VariantData, DecodeError> {
        if !filter.allow_value() {
            self.read_quoted_string(false)?;
            return Ok(VariantData::Null);
        }
        self.read_quoted_string(true)?;
        let id = self.resources.commit_string()?;
        Ok(VariantData::String(StringRef::Owned(id)))
    }

    /// Reads a string opened by the current quote byte, unescaping it into
    /// the builder when `store` is set.
    fn read_quoted_string(&mut self, store: bool) -> Result<(), DecodeError> {
        let quote = self.next_byte()?;
        if store {
            self.resources.begin_string();
        }
        loop {
            let c = self.next_byte()?;
            if c == quote {
                return Ok(());
            }
            let byte = match c {
                b'\\' => {
                    let e = self.next_byte()?;
                    if e == b'u' {
                        self.read_unicode_escape(store)?;
                        continue;
                    }
                    escape::unescape(e).ok_or(DecodeError::InvalidInput)?
                }
                #[cfg(not(feature = "raw-control-chars"))]
                0x00..=0x1F => return Err(DecodeError::InvalidInput),
                _ => c,
            };
            if store {
                self.resources.append_byte(byte)?;
            }
        }
    }

    #[cfg(feature = "unicode-escape")]
    fn read_hex4(&mut self) -> Result<u32, DecodeError> {
        let mut codepoint = 0u32;
        for _ in 0..4 {
            let digit = escape::hex_digit(self.next_byte()?).ok_or(DecodeError::InvalidInput)?;
            codepoint = (codepoint << 4) | digit;
        }
        Ok(codepoint)
    }

    /// Decodes the digits of a `\u` escape (and the low half of a surrogate
    /// pair) as UTF-8.
    #[cfg(feature = "unicode-escape")]
    fn read_unicode_escape(&mut self, store: bool) -> Result<(), DecodeError> {
        let mut codepoint = self.read_hex4()?;
        if escape::is_high_surrogate(codepoint) {
            if self.next_byte()? != b'\\' || self.next_byte()? != b'u' {
                return Err(DecodeError::InvalidInput);
            }
            let low = self.read_hex4()?;
            codepoint =
                escape::combine_surrogate_pair(codepoint, low).ok_or(DecodeError::InvalidInput)?;
        } else if escape::is_low_surrogate(codepoint) {
            return Err(DecodeError::InvalidInput);
        }
        let ch = char::from_u32(codepoint).ok_or(DecodeError::InvalidInput)?;
        if store {
            let mut utf8 = [0u8; 4];
            self.resources
                .append_bytes(ch.encode_utf8(&mut utf8).as_bytes())?;
        }
        Ok(())
    }

    #[cfg(not(feature = "unicode-escape"))]
    fn read_unicode_escape(&mut self, _store: bool) -> Result<(), DecodeError> {
        Err(DecodeError::NotSupported)
    }

    fn parse_keyword(
        &mut self,
        keyword: &[u8],
        value: VariantData,
        filter: Filter<'_>,
    ) -> Result<VariantData, DecodeError> {
        for &expected in keyword {
            if self.next_byte()? != expected {
                return Err(DecodeError::InvalidInput);
            }
        }
        Ok(if filter.allow_value() {
            value
        } else {
            VariantData::Null
        })
    }

    fn parse_number_value(&mut self, filter: Filter<'_>) -> Result<VariantData, DecodeError> {
        let mut buffer = [0u8; MAX_NUMBER_LEN];
        let mut len = 0;
        while let Some(c) = self.latch.current() {
            if !can_be_in_number(c) {
                break;
            }
            if len == MAX_NUMBER_LEN {
                return Err(DecodeError::InvalidInput);
            }
            buffer[len] = c;
            len += 1;
            self.latch.clear();
        }
        if self.latch.failed() {
            return Err(DecodeError::IncompleteInput);
        }

        let number = parse_number(&buffer[..len]).ok_or(DecodeError::InvalidInput)?;
        Ok(if filter.allow_value() {
            number.into()
        } else {
            VariantData::Null
        })
    }
}
