use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use num_bigint::{BigInt, Sign};

/// A single value packed into, or unpacked from, one field of a format.
///
/// Which variants a field accepts depends on its format code; see the crate documentation for
/// the full table. Unpacking produces `Int` for every integer code, `Float` for `e`, `f` and
/// `d`, `Bool` for `?`, `Char` for `c`, and whatever the active [`StringCodec`] produces for
/// `s`.
///
/// [`StringCodec`]: crate::StringCodec
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Absence of a value. Only meaningful for `?`, where it packs as false.
    None,
    /// A boolean.
    Bool(bool),
    /// An integer. `i128` holds every value of every fixed-width integer code, so range checks
    /// against the field happen on pack rather than on construction.
    Int(i128),
    /// An arbitrary-precision integer. Accepted by `q` and `Q`.
    BigInt(BigInt),
    /// A floating-point number.
    Float(f64),
    /// A single character.
    Char(char),
    /// Text, encoded by the active [`StringCodec`](crate::StringCodec) when packed into `s`.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Value {
    /// A short name for the kind of this value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::BigInt(_) => "big integer",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
        }
    }

    /// How this value packs into a `?` field.
    ///
    /// False for `None`, `Bool(false)`, zero integers, `0.0`, `-0.0`, NaN, empty text and empty
    /// bytes. Everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::BigInt(n) => n.sign() != Sign::NoSign,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Char(_) => true,
            Self::Text(s) => !s.is_empty(),
            Self::Bytes(b) => !b.is_empty(),
        }
    }

    /// Returns the integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i128> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float, if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text, if this is `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the bytes, if this is `Bytes`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::BigInt(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Char(c) => write!(f, "{c:?}"),
            Self::Text(s) => write!(f, "{s:?}"),
            #[cfg(feature = "bstr")]
            Self::Bytes(b) => write!(f, "b{:?}", bstr::BStr::new(b)),
            #[cfg(not(feature = "bstr"))]
            Self::Bytes(b) => write!(f, "{b:?}"),
        }
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::Int(value as i128)
                }
            }
        )*
    };
}

from_int!(i8, u8, i16, u16, i32, u32, i64, u64, i128, isize, usize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Self::BigInt(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(value: &[u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Value {
    fn from(value: [u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}
