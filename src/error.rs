//! Error type shared by the format compiler and the pack/unpack paths.

use alloc::string::String;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Everything that can go wrong while compiling a format string or moving values in and out of
/// a buffer.
///
/// Errors are reported as soon as they are detected. `pack_into` and `unpack_from` validate
/// the argument count and the buffer region before touching any bytes, so a failure from a
/// per-value check (`WrongArgumentType`, `NotAnInteger`, `OutOfRange`) may leave a prefix of
/// the destination region written.
#[derive(Error, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The format string does not match the grammar.
    #[error("invalid format string at position {position}: {reason}")]
    InvalidFormat {
        /// Byte offset of the offending character within the format string.
        position: usize,
        /// What was wrong at that position.
        reason: FormatErrorKind,
    },

    /// `n`, `N` or `P` used with a standard (`=`, `<`, `>`, `!`) byte order.
    #[error("format code '{code}' is only available with native byte order and size")]
    UnsupportedNativeCode {
        /// The rejected format code.
        code: char,
    },

    /// `pack` was given fewer values than the format consumes.
    #[error("not enough arguments for format: expected {expected}, got {got}")]
    InsufficientArguments {
        /// Number of values the format consumes.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// `pack` was given more values than the format consumes.
    #[error("too many arguments for format: expected {expected}, got {got}")]
    TooManyArguments {
        /// Number of values the format consumes.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// A value of the wrong kind was supplied for a field.
    #[error("format code '{code}' expects {expected}, got {got}")]
    WrongArgumentType {
        /// The field's format code.
        code: char,
        /// Description of the accepted value kinds.
        expected: &'static str,
        /// Kind of the value that was supplied.
        got: &'static str,
    },

    /// A float with a fractional part (or a non-finite float) was supplied for an integer field.
    #[error("value {value} is not an integer (format code '{code}')")]
    NotAnInteger {
        /// The field's format code.
        code: char,
        /// The rejected value.
        value: f64,
    },

    /// A numeric value does not fit the field.
    #[error("value {value} is out of range for format code '{code}'")]
    OutOfRange {
        /// The field's format code.
        code: char,
        /// The rejected value, rendered as text so arbitrary-precision inputs survive intact.
        value: String,
    },

    /// The offset lies beyond the end of the buffer.
    #[error("offset {offset} is outside of a buffer of {len} bytes")]
    InvalidOffset {
        /// The requested offset.
        offset: usize,
        /// Length of the buffer.
        len: usize,
    },

    /// Reading or writing the fields would run past the end of the buffer.
    #[error("buffer too small: {needed} bytes needed, {available} available")]
    BufferTooSmall {
        /// Buffer length that would have been required.
        needed: usize,
        /// Actual buffer length.
        available: usize,
    },

    /// `unpack` (or `iter_unpack`) was given a buffer whose length does not match the format.
    #[error("buffer has wrong length: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Length the format requires.
        expected: usize,
        /// Length of the supplied buffer.
        actual: usize,
    },

    /// `iter_unpack` was called with a format that describes zero bytes.
    #[error("cannot iterate over records of a zero-sized format")]
    EmptyRecord,
}

/// The reason attached to [`Error::InvalidFormat`].
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum FormatErrorKind {
    /// The format string is empty.
    #[error("format string is empty")]
    Empty,

    /// A byte-order marker is not followed by any element.
    #[error("expected at least one format code")]
    MissingElement,

    /// A character that is not a supported format code.
    #[error("unknown format code {0:?}")]
    UnknownCode(char),

    /// A repeat count that is not immediately followed by a format code.
    #[error("repeat count is not followed by a format code")]
    DanglingCount,

    /// A repeat count that does not fit in `usize`.
    #[error("repeat count is too large")]
    CountOverflow,

    /// The total size of the format, or the number of values it takes, does not fit in `usize`.
    #[error("total size of the format overflows")]
    SizeOverflow,
}

impl Error {
    pub(crate) fn invalid_format(position: usize, reason: FormatErrorKind) -> Self {
        Self::InvalidFormat { position, reason }
    }

    pub(crate) fn out_of_range(code: char, value: impl core::fmt::Display) -> Self {
        use alloc::string::ToString;
        Self::OutOfRange {
            code,
            value: value.to_string(),
        }
    }
}
