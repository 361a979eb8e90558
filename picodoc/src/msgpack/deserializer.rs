// SPDX-License-Identifier: Apache-2.0

use core::mem::size_of;

use log::trace;

use crate::endian::fix_endianness;
use crate::error::DecodeError;
use crate::filter::{DecodeOptions, Depth, Filter};
use crate::io::Source;
use crate::number::{Float, Number, UInteger};
use crate::pool::ResourceManager;
use crate::strings::StringRef;
use crate::variant::{CollectionData, VariantData};

/// Size of the stack buffer payloads are moved through.
const CHUNK_LEN: usize = 32;

/// MessagePack decoder writing straight into a pool.
pub(crate) struct MsgPackDeserializer<'r, S: Source> {
    source: S,
    resources: &'r mut ResourceManager,
}

impl<'r, S: Source> MsgPackDeserializer<'r, S> {
    pub fn new(source: S, resources: &'r mut ResourceManager) -> Self {
        Self { source, resources }
    }

    /// Decodes one value and returns it; bytes after it are left unread.
    pub fn parse(mut self, options: DecodeOptions<'_>) -> Result<VariantData, DecodeError> {
        let code = match self.source.read_byte() {
            Some(code) => code,
            None if self.source.failed() => return Err(DecodeError::IncompleteInput),
            None => return Err(DecodeError::EmptyInput),
        };
        self.parse_tagged(code, options.filter, options.nesting_limit.budget())
    }

    fn read_byte(&mut self) -> Result<u8, DecodeError> {
        self.source.read_byte().ok_or(DecodeError::IncompleteInput)
    }

    /// Reads a big-endian field of `N` bytes, returned in host order.
    fn read_be<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut bytes = [0u8; N];
        if self.source.read_bytes(&mut bytes) < N {
            return Err(DecodeError::IncompleteInput);
        }
        fix_endianness(&mut bytes);
        Ok(bytes)
    }

    /// Reads a length field of `width` bytes.
    fn read_length(&mut self, width: usize) -> Result<usize, DecodeError> {
        let length = match width {
            1 => u32::from(self.read_byte()?),
            2 => u32::from(u16::from_ne_bytes(self.read_be()?)),
            _ => u32::from_ne_bytes(self.read_be()?),
        };
        usize::try_from(length).map_err(|_| DecodeError::NoMemory)
    }

    fn skip(&mut self, mut count: usize) -> Result<(), DecodeError> {
        let mut chunk = [0u8; CHUNK_LEN];
        while count > 0 {
            let n = count.min(CHUNK_LEN);
            if self.source.read_bytes(&mut chunk[..n]) < n {
                return Err(DecodeError::IncompleteInput);
            }
            count -= n;
        }
        Ok(())
    }

    /// Copies `count` payload bytes into the string builder.
    fn read_into_builder(&mut self, mut count: usize) -> Result<(), DecodeError> {
        self.resources.begin_string();
        let mut chunk = [0u8; CHUNK_LEN];
        while count > 0 {
            let n = count.min(CHUNK_LEN);
            if self.source.read_bytes(&mut chunk[..n]) < n {
                return Err(DecodeError::IncompleteInput);
            }
            self.resources.append_bytes(&chunk[..n])?;
            count -= n;
        }
        Ok(())
    }

    fn parse_variant(&mut self, filter: Filter<'_>, depth: Depth) -> Result<VariantData, DecodeError> {
        let code = self.read_byte()?;
        self.parse_tagged(code, filter, depth)
    }

    fn parse_tagged(
        &mut self,
        code: u8,
        filter: Filter<'_>,
        depth: Depth,
    ) -> Result<VariantData, DecodeError> {
        let data: VariantData = match code {
            0x00..=0x7f => Number::from_unsigned(u128::from(code)).into(),
            0x80..=0x8f => return self.parse_map(usize::from(code & 0x0f), filter, depth),
            0x90..=0x9f => return self.parse_array(usize::from(code & 0x0f), filter, depth),
            0xa0..=0xbf => return self.parse_string(usize::from(code & 0x1f), filter),
            0xc0 => VariantData::Null,
            0xc1 => return Err(DecodeError::InvalidInput),
            0xc2 => VariantData::Boolean(false),
            0xc3 => VariantData::Boolean(true),
            0xc4..=0xc6 => {
                let length = self.read_length(1 << (code - 0xc4))?;
                return self.parse_binary(length, filter);
            }
            // ext and fixext carry application-defined types
            0xc7..=0xc9 | 0xd4..=0xd8 => return Err(DecodeError::NotSupported),
            0xca => VariantData::Float(f32::from_ne_bytes(self.read_be()?) as Float),
            0xcb => VariantData::Float(f64::from_ne_bytes(self.read_be()?) as Float),
            0xcc..=0xcf => return self.parse_unsigned(1 << (code - 0xcc), filter),
            0xd0..=0xd3 => return self.parse_signed(1 << (code - 0xd0), filter),
            0xd9..=0xdb => {
                let length = self.read_length(1 << (code - 0xd9))?;
                return self.parse_string(length, filter);
            }
            0xdc | 0xdd => {
                let length = self.read_length(2 << (code - 0xdc))?;
                return self.parse_array(length, filter, depth);
            }
            0xde | 0xdf => {
                let length = self.read_length(2 << (code - 0xde))?;
                return self.parse_map(length, filter, depth);
            }
            0xe0..=0xff => Number::from_signed(i128::from(code as i8)).into(),
        };
        Ok(if filter.allow_value() {
            data
        } else {
            VariantData::Null
        })
    }

    fn parse_unsigned(&mut self, width: usize, filter: Filter<'_>) -> Result<VariantData, DecodeError> {
        if !filter.allow_value() {
            self.skip(width)?;
            return Ok(VariantData::Null);
        }
        if width > size_of::<UInteger>() {
            return Err(DecodeError::NotSupported);
        }
        let value = match width {
            1 => u64::from(self.read_byte()?),
            2 => u64::from(u16::from_ne_bytes(self.read_be()?)),
            4 => u64::from(u32::from_ne_bytes(self.read_be()?)),
            _ => u64::from_ne_bytes(self.read_be()?),
        };
        Ok(Number::from_unsigned(u128::from(value)).into())
    }

    fn parse_signed(&mut self, width: usize, filter: Filter<'_>) -> Result<VariantData, DecodeError> {
        if !filter.allow_value() {
            self.skip(width)?;
            return Ok(VariantData::Null);
        }
        if width > size_of::<UInteger>() {
            return Err(DecodeError::NotSupported);
        }
        let value = match width {
            1 => i64::from(self.read_byte()? as i8),
            2 => i64::from(i16::from_ne_bytes(self.read_be()?)),
            4 => i64::from(i32::from_ne_bytes(self.read_be()?)),
            _ => i64::from_ne_bytes(self.read_be()?),
        };
        Ok(Number::from_signed(i128::from(value)).into())
    }

    fn parse_string(&mut self, length: usize, filter: Filter<'_>) -> Result<VariantData, DecodeError> {
        if !filter.allow_value() {
            self.skip(length)?;
            return Ok(VariantData::Null);
        }
        self.read_into_builder(length)?;
        let id = self.resources.commit_string()?;
        Ok(VariantData::String(StringRef::Owned(id)))
    }

    fn parse_binary(&mut self, length: usize, filter: Filter<'_>) -> Result<VariantData, DecodeError> {
        if !filter.allow_value() {
            self.skip(length)?;
            return Ok(VariantData::Null);
        }
        self.read_into_builder(length)?;
        let id = self.resources.commit_string()?;
        Ok(VariantData::Binary(StringRef::Owned(id)))
    }

    fn parse_array(
        &mut self,
        length: usize,
        filter: Filter<'_>,
        depth: Depth,
    ) -> Result<VariantData, DecodeError> {
        let depth = depth.enter()?;
        let keep = filter.allow_array();
        let element_filter = if keep { filter.element() } else { Filter::Reject };
        trace!("array of {}, keep={}", length, keep);
        let mut array = CollectionData::EMPTY;

        for _ in 0..length {
            if keep && element_filter.allow() {
                let id = self.resources.alloc_slot()?;
                array.append(id, self.resources);
                let data = self.parse_variant(element_filter, depth)?;
                self.resources.slot_mut(id).data = data;
            } else {
                self.parse_variant(Filter::Reject, depth)?;
            }
        }

        Ok(if keep {
            VariantData::Array(array)
        } else {
            VariantData::Null
        })
    }

    /// Reads a member key, which must be a str, into the builder (when
    /// `store`) or past it.
    fn parse_key(&mut self, store: bool) -> Result<(), DecodeError> {
        let code = self.read_byte()?;
        let length = match code {
            0xa0..=0xbf => usize::from(code & 0x1f),
            0xd9..=0xdb => self.read_length(1 << (code - 0xd9))?,
            _ => return Err(DecodeError::InvalidInput),
        };
        if store {
            self.read_into_builder(length)
        } else {
            self.skip(length)
        }
    }

    fn parse_map(
        &mut self,
        length: usize,
        filter: Filter<'_>,
        depth: Depth,
    ) -> Result<VariantData, DecodeError> {
        let depth = depth.enter()?;
        let keep = filter.allow_object();
        trace!("map of {}, keep={}", length, keep);
        let mut object = CollectionData::EMPTY;

        for _ in 0..length {
            self.parse_key(keep)?;
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
        }

        Ok(if keep {
            VariantData::Object(object)
        } else {
            VariantData::Null
        })
    }
}
