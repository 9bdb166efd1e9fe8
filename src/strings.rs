//! Conversion between `s` fields and [`Value`]s.

use crate::value::Value;
use alloc::string::String;

/// Encodes text into, and decodes values out of, fixed-length `s` fields.
///
/// A [`Struct`](crate::Struct) carries one codec. Packing a `Value::Bytes` into an `s` field
/// never goes through the codec; the bytes are copied as they are.
pub trait StringCodec {
    /// Encodes as much of `text` as fits into `dest` and returns the number of bytes written.
    ///
    /// Bytes of `dest` past the returned count are zero-filled by the caller.
    fn encode_into(&self, text: &str, dest: &mut [u8]) -> usize;

    /// Converts the raw bytes of an `s` field into the value handed back by unpack.
    fn decode(&self, bytes: &[u8]) -> Value;
}

impl<T: StringCodec + ?Sized> StringCodec for &T {
    fn encode_into(&self, text: &str, dest: &mut [u8]) -> usize {
        (**self).encode_into(text, dest)
    }

    fn decode(&self, bytes: &[u8]) -> Value {
        (**self).decode(bytes)
    }
}

/// UTF-8 text. The default codec.
///
/// Encoding never splits a character: if the next character does not fit in the remaining
/// space, encoding stops. Decoding produces `Value::Text`, replacing invalid sequences with
/// U+FFFD. Zero bytes are kept.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Utf8;

impl StringCodec for Utf8 {
    fn encode_into(&self, text: &str, dest: &mut [u8]) -> usize {
        let mut written = 0;
        for c in text.chars() {
            let len = c.len_utf8();
            if written + len > dest.len() {
                break;
            }
            c.encode_utf8(&mut dest[written..written + len]);
            written += len;
        }
        written
    }

    fn decode(&self, bytes: &[u8]) -> Value {
        Value::Text(decode_lossy(bytes))
    }
}

#[cfg(feature = "bstr")]
fn decode_lossy(bytes: &[u8]) -> String {
    use bstr::ByteSlice;
    bytes.to_str_lossy().into_owned()
}

#[cfg(not(feature = "bstr"))]
fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Uninterpreted bytes.
///
/// Text is written as its UTF-8 bytes, cut at the field length even in the middle of a
/// character. Decoding produces `Value::Bytes`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RawBytes;

impl StringCodec for RawBytes {
    fn encode_into(&self, text: &str, dest: &mut [u8]) -> usize {
        let n = text.len().min(dest.len());
        dest[..n].copy_from_slice(&text.as_bytes()[..n]);
        n
    }

    fn decode(&self, bytes: &[u8]) -> Value {
        Value::Bytes(bytes.to_vec())
    }
}
