//! Packs and unpacks fixed binary layouts described by Python `struct` format strings.
//!
//! A format string such as `"<IBB10s"` describes a sequence of typed fields. Compiling it once
//! produces a [`FormatSpec`]; [`Struct`] binds a compiled spec to a [`StringCodec`] and moves
//! [`Value`]s in and out of byte buffers at any offset.
//!
//! ```
//! use binstruct::{values, Value};
//!
//! let bytes = binstruct::pack("<IBB", &values![963497464u32, 17u8, 84u8])?;
//! assert_eq!(bytes, [0xf8, 0xcd, 0x6d, 0x39, 0x11, 0x54]);
//!
//! let fields = binstruct::unpack("<IBB", &bytes)?;
//! assert_eq!(fields, values![963497464u32, 17u8, 84u8]);
//! # Ok::<(), binstruct::Error>(())
//! ```
//!
//! # Byte order
//!
//! Character | Byte order            | `n`, `N`, `P`
//! --------- | --------------------- | -------------
//! (none)    | native                | allowed
//! `@`       | native                | allowed
//! `=`       | native                | rejected
//! `<`       | little-endian         | rejected
//! `>`       | big-endian            | rejected
//! `!`       | network (big-endian)  | rejected
//!
//! Sizes are always the standard sizes below; no alignment padding is inserted.
//!
//! # Format codes
//!
//! Code | Size | Packs from                                  | Unpacks to
//! ---- | ---- | ------------------------------------------- | -----------
//! `x`  | 1    | nothing (writes a zero byte)                | nothing
//! `c`  | 1    | `Char`, one-char `Text`, one-byte `Bytes`   | `Char`
//! `b`  | 1    | integer in `i8` range                       | `Int`
//! `B`  | 1    | integer in `u8` range                       | `Int`
//! `?`  | 1    | any value, by [`Value::is_truthy`]          | `Bool`
//! `h`  | 2    | integer in `i16` range                      | `Int`
//! `H`  | 2    | integer in `u16` range                      | `Int`
//! `i`  | 4    | integer in `i32` range                      | `Int`
//! `I`  | 4    | integer in `u32` range                      | `Int`
//! `l`  | 4    | integer in `i32` range                      | `Int`
//! `L`  | 4    | integer in `u32` range                      | `Int`
//! `q`  | 8    | integer or `BigInt` in `i64` range          | `Int`
//! `Q`  | 8    | integer or `BigInt` in `u64` range          | `Int`
//! `n`  | 4    | integer in `i32` range                      | `Int`
//! `N`  | 4    | integer in `u32` range                      | `Int`
//! `e`  | 2    | number, must fit IEEE-754 binary16          | `Float`
//! `f`  | 4    | number                                      | `Float`
//! `d`  | 8    | number                                      | `Float`
//! `P`  | 4    | integer in `u32` range                      | `Int`
//! `s`  | n    | `Text` or `Bytes`                           | per [`StringCodec`]
//!
//! "Integer" means `Value::Int` or a `Value::Float` with no fractional part.
//!
//! Any code may be preceded by a decimal repeat count: `"4h"` is the same as `"hhhh"`. For `s`
//! the count is instead the byte length of a single string: `"10s"` is one 10-byte field,
//! zero-filled when the packed value is shorter and truncated when it is longer.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

extern crate alloc;

mod code;
mod error;
mod float16;
mod format;
mod reader;
mod strings;
mod structure;
mod value;
mod writer;

#[cfg(feature = "std")]
mod cache;


#[cfg(feature = "std")]
pub use cache::FormatCache;
pub use code::TypeCode;
pub use error::{Error, FormatErrorKind, Result};
pub use format::{platform_is_little_endian, ByteOrder, FieldDescriptor, FormatSpec};
pub use num_bigint::BigInt;
pub use reader::FieldReader;
pub use strings::{RawBytes, StringCodec, Utf8};
pub use structure::{IterUnpack, Struct};
pub use value::Value;
pub use writer::FieldWriter;

use alloc::vec::Vec;

/// Builds a `Vec<Value>` from a list of expressions convertible into [`Value`].
///
/// ```
/// use binstruct::{values, Value};
///
/// assert_eq!(values![1u8, "ab", true], [Value::Int(1), Value::Text("ab".into()), Value::Bool(true)]);
/// ```
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        $crate::__alloc::vec![$($crate::Value::from($value)),*]
    };
}

#[doc(hidden)]
pub extern crate alloc as __alloc;

/// Compiles `format`.
pub fn compile(format: &str) -> Result<FormatSpec> {
    FormatSpec::compile(format)
}

/// Returns the packed size of `format` in bytes.
pub fn calcsize(format: &str) -> Result<usize> {
    Ok(FormatSpec::compile(format)?.size())
}

/// Packs `values` according to `format`.
pub fn pack(format: &str, values: &[Value]) -> Result<Vec<u8>> {
    Struct::new(format)?.pack(values)
}

/// Packs `values` according to `format` into `buffer`, starting at `offset`.
pub fn pack_into(format: &str, buffer: &mut [u8], offset: usize, values: &[Value]) -> Result<()> {
    Struct::new(format)?.pack_into(buffer, offset, values)
}

/// Unpacks `buffer`, whose length must be exactly the size of `format`.
pub fn unpack(format: &str, buffer: &[u8]) -> Result<Vec<Value>> {
    Struct::new(format)?.unpack(buffer)
}

/// Unpacks one record of `format` from `buffer`, starting at `offset`.
pub fn unpack_from(format: &str, buffer: &[u8], offset: usize) -> Result<Vec<Value>> {
    Struct::new(format)?.unpack_from(buffer, offset)
}

/// Unpacks consecutive records of `format` from `buffer`.
pub fn iter_unpack<'b>(format: &str, buffer: &'b [u8]) -> Result<IterUnpack<'b>> {
    Struct::new(format)?.iter_unpack(buffer)
}
