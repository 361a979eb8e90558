// SPDX-License-Identifier: Apache-2.0

/// Errors that can occur while decoding a document.
///
/// The same taxonomy is shared by the JSON and MessagePack decoders so that
/// callers can handle both codecs uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input contained nothing but whitespace (or nothing at all).
    EmptyInput,
    /// The input ended in the middle of a value.
    ///
    /// Distinct from [`DecodeError::InvalidInput`] so that a caller reading
    /// from a live stream can retry once more bytes arrive.
    IncompleteInput,
    /// The input is syntactically or structurally malformed.
    InvalidInput,
    /// The document pool could not satisfy an allocation.
    NoMemory,
    /// The nesting limit was exceeded.
    TooDeep,
    /// The input uses a construct this build was configured without.
    NotSupported,
}

impl DecodeError {
    /// Short, stable name of the error kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DecodeError::EmptyInput => "EmptyInput",
            DecodeError::IncompleteInput => "IncompleteInput",
            DecodeError::InvalidInput => "InvalidInput",
            DecodeError::NoMemory => "NoMemory",
            DecodeError::TooDeep => "TooDeep",
            DecodeError::NotSupported => "NotSupported",
        }
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// The document pool is exhausted.
///
/// Returned by pool allocations; decoders surface it as [`DecodeError::NoMemory`]
/// and setters report it as `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoMemory;

impl From<NoMemory> for DecodeError {
    fn from(_: NoMemory) -> Self {
        DecodeError::NoMemory
    }
}

impl core::fmt::Display for NoMemory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("NoMemory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_memory_conversion() {
        let error: DecodeError = NoMemory.into();
        assert_eq!(error, DecodeError::NoMemory);
    }

    #[test]
    fn test_display_matches_kind_name() {
        assert_eq!(DecodeError::IncompleteInput.to_string(), "IncompleteInput");
        assert_eq!(DecodeError::TooDeep.to_string(), "TooDeep");
        assert_eq!(NoMemory.to_string(), "NoMemory");
    }
}
