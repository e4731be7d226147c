//! Codec errors

/// Errors reported by the decoder and encoder.
///
/// Decode errors never advance the input window; the caller observes the
/// buffer exactly as it was handed in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The format code has no entry in the dispatch table
    #[error("Invalid format code 0x{0:02x}")]
    InvalidFormatCode(u8),

    /// The window ended before the declared width of the value
    #[error("Truncated input while decoding constructor 0x{code:02x}")]
    Truncated {
        /// The format code whose body was cut short
        code: u8,
    },

    /// The window ended where a constructor byte was required
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// A string body was not valid UTF-8
    #[error("Invalid UTF-8 encoding")]
    InvalidUtf8,

    /// Map constructors must carry an even item count (key and value per entry)
    #[error("Map item count must be even, found {0}")]
    OddMapCount(u32),

    /// Nested compounds exceeded the depth bound
    #[error("Nesting depth limit exceeded")]
    NestingLimit,

    /// A variable-width value is too long for any wire encoding
    #[error("Invalid length")]
    InvalidLength,

    /// Array elements must all encode under the single sub-constructor
    #[error("Array elements must share a single constructor")]
    HeterogeneousArray,
}

impl From<std::str::Utf8Error> for Error {
    fn from(_: std::str::Utf8Error) -> Self {
        Error::InvalidUtf8
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(_: std::string::FromUtf8Error) -> Self {
        Error::InvalidUtf8
    }
}
