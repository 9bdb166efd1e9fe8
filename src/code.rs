//! The table of format codes: byte widths, value checks, and the per-code encoding.

use crate::error::{Error, Result};
use crate::float16;
use crate::reader::FieldReader;
use crate::strings::StringCodec;
use crate::value::Value;
use crate::writer::{Args, FieldWriter};
use alloc::vec::Vec;
use zerocopy::byteorder::{ByteOrder, F32, F64, I16, I32, I64, U16, U32, U64};

/// A single format code.
///
/// Widths are the standard sizes and do not depend on the byte-order marker. `n`, `N` and `P`
/// are emulated with fixed 4-byte layouts and are only accepted in native mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeCode {
    /// `x`: one pad byte, no value.
    Pad,
    /// `c`: a character with a code point below 256.
    Char,
    /// `b`: `i8`.
    SignedChar,
    /// `B`: `u8`.
    UnsignedChar,
    /// `?`: a boolean byte.
    Bool,
    /// `h`: `i16`.
    Short,
    /// `H`: `u16`.
    UnsignedShort,
    /// `i`: `i32`.
    Int,
    /// `I`: `u32`.
    UnsignedInt,
    /// `l`: `i32`.
    Long,
    /// `L`: `u32`.
    UnsignedLong,
    /// `q`: `i64`.
    LongLong,
    /// `Q`: `u64`.
    UnsignedLongLong,
    /// `n`: native `ssize_t`, emulated as `i32`.
    SSize,
    /// `N`: native `size_t`, emulated as `u32`.
    Size,
    /// `e`: IEEE-754 binary16.
    Half,
    /// `f`: IEEE-754 binary32.
    Float,
    /// `d`: IEEE-754 binary64.
    Double,
    /// `P`: native pointer, emulated as `u32`.
    Pointer,
    /// `s`: a fixed-length byte string. Its repeat count is its length.
    Bytes,
}

impl TypeCode {
    /// Every supported code, in the order of the format-character table.
    pub const ALL: [TypeCode; 20] = [
        Self::Pad,
        Self::Char,
        Self::SignedChar,
        Self::UnsignedChar,
        Self::Bool,
        Self::Short,
        Self::UnsignedShort,
        Self::Int,
        Self::UnsignedInt,
        Self::Long,
        Self::UnsignedLong,
        Self::LongLong,
        Self::UnsignedLongLong,
        Self::SSize,
        Self::Size,
        Self::Half,
        Self::Float,
        Self::Double,
        Self::Pointer,
        Self::Bytes,
    ];

    /// Looks up the code for a format character.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'x' => Self::Pad,
            'c' => Self::Char,
            'b' => Self::SignedChar,
            'B' => Self::UnsignedChar,
            '?' => Self::Bool,
            'h' => Self::Short,
            'H' => Self::UnsignedShort,
            'i' => Self::Int,
            'I' => Self::UnsignedInt,
            'l' => Self::Long,
            'L' => Self::UnsignedLong,
            'q' => Self::LongLong,
            'Q' => Self::UnsignedLongLong,
            'n' => Self::SSize,
            'N' => Self::Size,
            'e' => Self::Half,
            'f' => Self::Float,
            'd' => Self::Double,
            'P' => Self::Pointer,
            's' => Self::Bytes,
            _ => return None,
        })
    }

    /// The format character for this code.
    pub fn as_char(self) -> char {
        match self {
            Self::Pad => 'x',
            Self::Char => 'c',
            Self::SignedChar => 'b',
            Self::UnsignedChar => 'B',
            Self::Bool => '?',
            Self::Short => 'h',
            Self::UnsignedShort => 'H',
            Self::Int => 'i',
            Self::UnsignedInt => 'I',
            Self::Long => 'l',
            Self::UnsignedLong => 'L',
            Self::LongLong => 'q',
            Self::UnsignedLongLong => 'Q',
            Self::SSize => 'n',
            Self::Size => 'N',
            Self::Half => 'e',
            Self::Float => 'f',
            Self::Double => 'd',
            Self::Pointer => 'P',
            Self::Bytes => 's',
        }
    }

    /// Size in bytes of one repetition of this code. For `s` this is the size of one byte of
    /// the string.
    pub fn byte_width(self) -> usize {
        match self {
            Self::Pad
            | Self::Char
            | Self::SignedChar
            | Self::UnsignedChar
            | Self::Bool
            | Self::Bytes => 1,
            Self::Short | Self::UnsignedShort | Self::Half => 2,
            Self::Int
            | Self::UnsignedInt
            | Self::Long
            | Self::UnsignedLong
            | Self::SSize
            | Self::Size
            | Self::Float
            | Self::Pointer => 4,
            Self::LongLong | Self::UnsignedLongLong | Self::Double => 8,
        }
    }

    /// True for `n`, `N` and `P`, which need native byte order and size.
    pub fn is_native_only(self) -> bool {
        matches!(self, Self::SSize | Self::Size | Self::Pointer)
    }

    /// The inclusive range of values an integer code accepts, or `None` for non-integer codes.
    pub fn integer_range(self) -> Option<(i128, i128)> {
        Some(match self {
            Self::SignedChar => (i8::MIN.into(), i8::MAX.into()),
            Self::UnsignedChar => (0, u8::MAX.into()),
            Self::Short => (i16::MIN.into(), i16::MAX.into()),
            Self::UnsignedShort => (0, u16::MAX.into()),
            Self::Int | Self::Long | Self::SSize => (i32::MIN.into(), i32::MAX.into()),
            Self::UnsignedInt | Self::UnsignedLong | Self::Size | Self::Pointer => {
                (0, u32::MAX.into())
            }
            Self::LongLong => (i64::MIN.into(), i64::MAX.into()),
            Self::UnsignedLongLong => (0, u64::MAX.into()),
            _ => return None,
        })
    }

    /// Writes one field of this code with repeat count `count`, taking its values from `args`.
    pub(crate) fn encode<'w, O: ByteOrder, S: StringCodec + ?Sized>(
        self,
        w: &mut FieldWriter<'w, O>,
        count: usize,
        args: &mut Args<'_>,
        strings: &S,
    ) -> Result<()> {
        match self {
            // Padding never consumes a value.
            Self::Pad => w.zero_fill(count),
            // `count` is the length of the one string, not a repeat count.
            Self::Bytes => match args.next()? {
                Value::Text(text) => w.write_text(text, count, strings),
                Value::Bytes(bytes) => w.write_padded(bytes, count),
                Value::Char(c) => {
                    let mut utf8 = [0u8; 4];
                    w.write_text(c.encode_utf8(&mut utf8), count, strings)
                }
                other => Err(self.wrong_type("text or bytes", other)),
            },
            Self::Char => each(w, count, args, |w, v| w.write_u8(self.char_byte(v)?)),
            Self::Bool => each(w, count, args, |w, v| w.write_u8(v.is_truthy() as u8)),
            Self::SignedChar => {
                each(w, count, args, |w, v| w.write_u8(self.integer(v)? as i8 as u8))
            }
            Self::UnsignedChar => each(w, count, args, |w, v| w.write_u8(self.integer(v)? as u8)),
            Self::Short => each(w, count, args, |w, v| {
                w.write_cbytes(I16::<O>::new(self.integer(v)? as i16).to_bytes())
            }),
            Self::UnsignedShort => each(w, count, args, |w, v| {
                w.write_cbytes(U16::<O>::new(self.integer(v)? as u16).to_bytes())
            }),
            Self::Int | Self::Long | Self::SSize => each(w, count, args, |w, v| {
                w.write_cbytes(I32::<O>::new(self.integer(v)? as i32).to_bytes())
            }),
            Self::UnsignedInt | Self::UnsignedLong | Self::Size | Self::Pointer => {
                each(w, count, args, |w, v| {
                    w.write_cbytes(U32::<O>::new(self.integer(v)? as u32).to_bytes())
                })
            }
            Self::LongLong => each(w, count, args, |w, v| {
                w.write_cbytes(I64::<O>::new(self.integer(v)? as i64).to_bytes())
            }),
            Self::UnsignedLongLong => each(w, count, args, |w, v| {
                w.write_cbytes(U64::<O>::new(self.integer(v)? as u64).to_bytes())
            }),
            Self::Half => each(w, count, args, |w, v| {
                let x = self.float(v)?;
                let bits = float16::from_f64(x).ok_or_else(|| Error::out_of_range('e', x))?;
                w.write_cbytes(U16::<O>::new(bits).to_bytes())
            }),
            Self::Float => each(w, count, args, |w, v| {
                w.write_cbytes(F32::<O>::new(self.float(v)? as f32).to_bytes())
            }),
            Self::Double => each(w, count, args, |w, v| {
                w.write_cbytes(F64::<O>::new(self.float(v)?).to_bytes())
            }),
        }
    }

    /// Reads one field of this code with repeat count `count`, appending its values to `out`.
    pub(crate) fn decode<'a, O: ByteOrder, S: StringCodec + ?Sized>(
        self,
        r: &mut FieldReader<'a, O>,
        count: usize,
        strings: &S,
        out: &mut Vec<Value>,
    ) -> Result<()> {
        match self {
            Self::Pad => r.skip(count),
            // No trimming: embedded and trailing zero bytes are part of the value.
            Self::Bytes => {
                out.push(strings.decode(r.read_bytes(count)?));
                Ok(())
            }
            Self::Char => collect(r, count, out, |r| Ok(Value::Char(char::from(r.read_u8()?)))),
            Self::Bool => collect(r, count, out, |r| Ok(Value::Bool(r.read_u8()? != 0))),
            Self::SignedChar => {
                collect(r, count, out, |r| Ok(Value::Int((r.read_u8()? as i8).into())))
            }
            Self::UnsignedChar => collect(r, count, out, |r| Ok(Value::Int(r.read_u8()?.into()))),
            Self::Short => collect(r, count, out, |r| {
                Ok(Value::Int(I16::<O>::from_bytes(r.read_cbytes()?).get().into()))
            }),
            Self::UnsignedShort => collect(r, count, out, |r| {
                Ok(Value::Int(U16::<O>::from_bytes(r.read_cbytes()?).get().into()))
            }),
            Self::Int | Self::Long | Self::SSize => collect(r, count, out, |r| {
                Ok(Value::Int(I32::<O>::from_bytes(r.read_cbytes()?).get().into()))
            }),
            Self::UnsignedInt | Self::UnsignedLong | Self::Size | Self::Pointer => {
                collect(r, count, out, |r| {
                    Ok(Value::Int(U32::<O>::from_bytes(r.read_cbytes()?).get().into()))
                })
            }
            Self::LongLong => collect(r, count, out, |r| {
                Ok(Value::Int(I64::<O>::from_bytes(r.read_cbytes()?).get().into()))
            }),
            Self::UnsignedLongLong => collect(r, count, out, |r| {
                Ok(Value::Int(U64::<O>::from_bytes(r.read_cbytes()?).get().into()))
            }),
            Self::Half => collect(r, count, out, |r| {
                let bits = U16::<O>::from_bytes(r.read_cbytes()?).get();
                Ok(Value::Float(float16::to_f64(bits)))
            }),
            Self::Float => collect(r, count, out, |r| {
                Ok(Value::Float(F32::<O>::from_bytes(r.read_cbytes()?).get().into()))
            }),
            Self::Double => collect(r, count, out, |r| {
                Ok(Value::Float(F64::<O>::from_bytes(r.read_cbytes()?).get()))
            }),
        }
    }

    /// Converts `value` to an integer and checks it against this code's range.
    fn integer(self, value: &Value) -> Result<i128> {
        let code = self.as_char();
        let n = match value {
            Value::Int(n) => *n,
            Value::Float(x) => integral_float(code, *x)?,
            Value::BigInt(big) if self.byte_width() == 8 => {
                i128::try_from(big).map_err(|_| Error::out_of_range(code, big))?
            }
            other => return Err(self.wrong_type("an integer", other)),
        };
        match self.integer_range() {
            Some((min, max)) if n < min || n > max => Err(Error::out_of_range(code, n)),
            _ => Ok(n),
        }
    }

    fn float(self, value: &Value) -> Result<f64> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(n) => Ok(*n as f64),
            other => Err(self.wrong_type("a number", other)),
        }
    }

    fn char_byte(self, value: &Value) -> Result<u8> {
        let c = match value {
            Value::Char(c) => *c,
            Value::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => return Err(self.wrong_type("a single character", value)),
                }
            }
            Value::Bytes(b) if b.len() == 1 => return Ok(b[0]),
            other => return Err(self.wrong_type("a single character", other)),
        };
        u8::try_from(c).map_err(|_| Error::out_of_range('c', c.escape_unicode()))
    }

    fn wrong_type(self, expected: &'static str, got: &Value) -> Error {
        Error::WrongArgumentType {
            code: self.as_char(),
            expected,
            got: got.kind(),
        }
    }
}

/// Writes `count` consecutive values from `args` with `put`.
fn each<'w, O: ByteOrder>(
    w: &mut FieldWriter<'w, O>,
    count: usize,
    args: &mut Args<'_>,
    mut put: impl FnMut(&mut FieldWriter<'w, O>, &Value) -> Result<()>,
) -> Result<()> {
    for _ in 0..count {
        put(w, args.next()?)?;
    }
    Ok(())
}

/// Reads `count` consecutive values with `get`.
fn collect<'a, O: ByteOrder>(
    r: &mut FieldReader<'a, O>,
    count: usize,
    out: &mut Vec<Value>,
    mut get: impl FnMut(&mut FieldReader<'a, O>) -> Result<Value>,
) -> Result<()> {
    for _ in 0..count {
        out.push(get(r)?);
    }
    Ok(())
}

/// 2^127: every finite `f64` at or beyond this magnitude is integral but outside `i128`.
const I128_LIMIT: f64 = 170141183460469231731687303715884105728.0;

/// Accepts a float for an integer field if it has no fractional part.
fn integral_float(code: char, x: f64) -> Result<i128> {
    if !x.is_finite() {
        return Err(Error::NotAnInteger { code, value: x });
    }
    if x >= I128_LIMIT || x < -I128_LIMIT {
        return Err(Error::out_of_range(code, x));
    }
    let n = x as i128;
    if n as f64 != x {
        return Err(Error::NotAnInteger { code, value: x });
    }
    Ok(n)
}
