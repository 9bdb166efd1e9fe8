//! Compiles format strings into [`FormatSpec`]s.
//!
//! ```text
//! format    := [byteorder] element+
//! byteorder := '@' | '=' | '<' | '>' | '!'
//! element   := [count] code
//! count     := digit+
//! code      := 'x' | 'c' | 'b' | 'B' | '?' | 'h' | 'H' | 'i' | 'I' | 'l' | 'L'
//!            | 'q' | 'Q' | 'n' | 'N' | 'e' | 'f' | 'd' | 'P' | 's'
//! ```
//!
//! Whitespace may appear after the byte-order marker and between elements, but not between a
//! count and its code.

use crate::code::TypeCode;
use crate::error::{Error, FormatErrorKind, Result};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

/// The byte order and size mode selected by the first character of a format string.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ByteOrder {
    /// No marker: native byte order, native-only codes allowed.
    NativeDefault,
    /// `@`: native byte order, native-only codes allowed.
    Native,
    /// `=`: native byte order, standard sizes only.
    StandardNative,
    /// `<`: little-endian.
    Little,
    /// `>`: big-endian.
    Big,
    /// `!`: network order, i.e. big-endian.
    Network,
}

impl ByteOrder {
    fn from_marker(c: char) -> Option<Self> {
        Some(match c {
            '@' => Self::Native,
            '=' => Self::StandardNative,
            '<' => Self::Little,
            '>' => Self::Big,
            '!' => Self::Network,
            _ => return None,
        })
    }

    /// The marker character, or `None` for [`ByteOrder::NativeDefault`].
    pub fn marker(self) -> Option<char> {
        match self {
            Self::NativeDefault => None,
            Self::Native => Some('@'),
            Self::StandardNative => Some('='),
            Self::Little => Some('<'),
            Self::Big => Some('>'),
            Self::Network => Some('!'),
        }
    }

    /// Whether multi-byte fields are stored least significant byte first.
    pub fn is_little_endian(self) -> bool {
        match self {
            Self::Little => true,
            Self::Big | Self::Network => false,
            Self::NativeDefault | Self::Native | Self::StandardNative => {
                platform_is_little_endian()
            }
        }
    }

    /// Whether `n`, `N` and `P` are allowed.
    pub fn supports_native_codes(self) -> bool {
        matches!(self, Self::NativeDefault | Self::Native)
    }
}

/// Determines the host byte order by looking at how a known pattern is laid out in memory.
pub fn platform_is_little_endian() -> bool {
    0x1122_3344u32.to_ne_bytes()[0] == 0x44
}

/// One element of a compiled format: a code and its repeat count.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldDescriptor {
    code: TypeCode,
    count: usize,
}

impl FieldDescriptor {
    /// Creates a descriptor.
    pub fn new(code: TypeCode, count: usize) -> Self {
        Self { code, count }
    }

    /// The field's format code.
    pub fn code(&self) -> TypeCode {
        self.code
    }

    /// The repeat count. For `s` fields this is the byte length of the one string.
    pub fn count(&self) -> usize {
        self.count
    }

    /// True for `s`.
    pub fn is_string(&self) -> bool {
        self.code == TypeCode::Bytes
    }

    /// True for `x`.
    pub fn is_padding(&self) -> bool {
        self.code == TypeCode::Pad
    }

    /// Bytes this field occupies, or `None` on overflow.
    pub fn size(&self) -> Option<usize> {
        self.count.checked_mul(self.code.byte_width())
    }

    /// How many values this field consumes on pack and produces on unpack.
    pub fn value_count(&self) -> usize {
        match self.code {
            TypeCode::Pad => 0,
            TypeCode::Bytes => 1,
            _ => self.count,
        }
    }
}

/// A compiled format string.
///
/// Compiling validates the format once; the result is immutable and can be shared and reused
/// for any number of pack and unpack calls.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FormatSpec {
    source: String,
    byte_order: ByteOrder,
    little_endian: bool,
    fields: Vec<FieldDescriptor>,
    size: usize,
    value_count: usize,
}

impl FormatSpec {
    /// Compiles `format`.
    pub fn compile(format: &str) -> Result<Self> {
        match Scanner::new(format).run() {
            Ok(spec) => {
                tracing::trace!(
                    format,
                    size = spec.size,
                    fields = spec.fields.len(),
                    "compiled struct format"
                );
                Ok(spec)
            }
            Err(e) => {
                tracing::debug!(format, error = %e, "rejected struct format");
                Err(e)
            }
        }
    }

    /// The format string this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The byte-order mode.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Whether multi-byte fields are little-endian. Resolved once, at compile time.
    pub fn is_little_endian(&self) -> bool {
        self.little_endian
    }

    /// Whether `n`, `N` and `P` are allowed in this format.
    pub fn supports_native_codes(&self) -> bool {
        self.byte_order.supports_native_codes()
    }

    /// The fields, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Total size in bytes of a packed record.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of values pack consumes and unpack produces.
    pub fn value_count(&self) -> usize {
        self.value_count
    }
}

impl FromStr for FormatSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Single-pass scanner over a format string.
struct Scanner<'a> {
    source: &'a str,
    chars: core::iter::Peekable<core::str::CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn run(mut self) -> Result<FormatSpec> {
        if self.source.is_empty() {
            return Err(Error::invalid_format(0, FormatErrorKind::Empty));
        }

        let byte_order = match self.chars.peek() {
            Some(&(_, c)) => match ByteOrder::from_marker(c) {
                Some(order) => {
                    self.chars.next();
                    order
                }
                None => ByteOrder::NativeDefault,
            },
            None => ByteOrder::NativeDefault,
        };

        let mut fields = Vec::new();
        let mut size = 0usize;
        let mut value_count = 0usize;

        self.skip_whitespace();
        while let Some(&(start, _)) = self.chars.peek() {
            let field = self.element(byte_order)?;
            size = field
                .size()
                .and_then(|n| size.checked_add(n))
                .ok_or_else(|| Error::invalid_format(start, FormatErrorKind::SizeOverflow))?;
            value_count = value_count
                .checked_add(field.value_count())
                .ok_or_else(|| Error::invalid_format(start, FormatErrorKind::SizeOverflow))?;
            fields.push(field);
            self.skip_whitespace();
        }

        if fields.is_empty() {
            return Err(Error::invalid_format(
                self.source.len(),
                FormatErrorKind::MissingElement,
            ));
        }

        Ok(FormatSpec {
            source: self.source.into(),
            byte_order,
            little_endian: byte_order.is_little_endian(),
            fields,
            size,
            value_count,
        })
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
    }

    /// Scans `[count] code`.
    fn element(&mut self, byte_order: ByteOrder) -> Result<FieldDescriptor> {
        let count = self.count()?;
        let Some((pos, c)) = self.chars.next() else {
            return Err(Error::invalid_format(
                self.source.len(),
                FormatErrorKind::DanglingCount,
            ));
        };
        let Some(code) = TypeCode::from_char(c) else {
            let reason = if count.is_some() && c.is_whitespace() {
                FormatErrorKind::DanglingCount
            } else {
                FormatErrorKind::UnknownCode(c)
            };
            return Err(Error::invalid_format(pos, reason));
        };
        if code.is_native_only() && !byte_order.supports_native_codes() {
            return Err(Error::UnsupportedNativeCode { code: c });
        }
        Ok(FieldDescriptor::new(code, count.unwrap_or(1)))
    }

    /// Scans an optional decimal repeat count.
    fn count(&mut self) -> Result<Option<usize>> {
        let mut count: Option<usize> = None;
        while let Some((pos, c)) = self.chars.next_if(|&(_, c)| c.is_ascii_digit()) {
            let digit = c as usize - '0' as usize;
            let next = count
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|n| n.checked_add(digit))
                .ok_or_else(|| Error::invalid_format(pos, FormatErrorKind::CountOverflow))?;
            count = Some(next);
        }
        Ok(count)
    }
}
