use crate::error::{Error, Result};
use crate::format::FormatSpec;
use crate::reader::unpack_fields;
use crate::strings::{StringCodec, Utf8};
use crate::value::Value;
use crate::writer::pack_fields;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::slice::ChunksExact;

/// A compiled format bound to a [`StringCodec`], for packing and unpacking the same layout
/// many times without recompiling it.
///
/// ```
/// use binstruct::{Struct, Value};
///
/// let header = Struct::new("<HHI")?;
/// let bytes = header.pack(&[Value::from(0x8200u16), Value::from(0u16), Value::from(7u32)])?;
/// assert_eq!(bytes, [0x00, 0x82, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00]);
/// assert_eq!(header.unpack(&bytes)?, [Value::Int(0x8200), Value::Int(0), Value::Int(7)]);
/// # Ok::<(), binstruct::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Struct<S = Utf8> {
    spec: Arc<FormatSpec>,
    strings: S,
}

impl Struct<Utf8> {
    /// Compiles `format`, using UTF-8 text for `s` fields.
    pub fn new(format: &str) -> Result<Self> {
        Ok(Self::from_spec(Arc::new(FormatSpec::compile(format)?)))
    }

    /// Wraps an already compiled format, using UTF-8 text for `s` fields.
    pub fn from_spec(spec: Arc<FormatSpec>) -> Self {
        Self {
            spec,
            strings: Utf8,
        }
    }
}

impl<S: StringCodec> Struct<S> {
    /// Compiles `format`, using `strings` for `s` fields.
    pub fn with_strings(format: &str, strings: S) -> Result<Self> {
        Ok(Self {
            spec: Arc::new(FormatSpec::compile(format)?),
            strings,
        })
    }

    /// Replaces the codec used for `s` fields.
    pub fn strings<T: StringCodec>(self, strings: T) -> Struct<T> {
        Struct {
            spec: self.spec,
            strings,
        }
    }

    /// The compiled format.
    pub fn spec(&self) -> &Arc<FormatSpec> {
        &self.spec
    }

    /// The format string.
    pub fn format(&self) -> &str {
        self.spec.source()
    }

    /// Size in bytes of one packed record.
    pub fn size(&self) -> usize {
        self.spec.size()
    }

    /// Packs `values` into a new buffer of exactly [`size`](Self::size) bytes.
    pub fn pack(&self, values: &[Value]) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; self.spec.size()];
        self.pack_into(&mut buffer, 0, values)?;
        Ok(buffer)
    }

    /// Packs `values` into `buffer`, starting at `offset`.
    ///
    /// Only `buffer[offset..offset + size]` is written.
    pub fn pack_into(&self, buffer: &mut [u8], offset: usize, values: &[Value]) -> Result<()> {
        pack_fields(&self.spec, buffer, offset, values, &self.strings)
    }

    /// Unpacks a buffer whose length is exactly [`size`](Self::size).
    pub fn unpack(&self, buffer: &[u8]) -> Result<Vec<Value>> {
        if buffer.len() != self.spec.size() {
            return Err(Error::SizeMismatch {
                expected: self.spec.size(),
                actual: buffer.len(),
            });
        }
        self.unpack_from(buffer, 0)
    }

    /// Unpacks one record starting at `offset`. Bytes after the record are ignored.
    pub fn unpack_from(&self, buffer: &[u8], offset: usize) -> Result<Vec<Value>> {
        unpack_fields(&self.spec, buffer, offset, &self.strings)
    }

    /// Unpacks consecutive records from a buffer whose length is a multiple of
    /// [`size`](Self::size).
    pub fn iter_unpack<'b>(&self, buffer: &'b [u8]) -> Result<IterUnpack<'b, S>>
    where
        S: Clone,
    {
        let size = self.spec.size();
        if size == 0 {
            return Err(Error::EmptyRecord);
        }
        if buffer.len() % size != 0 {
            return Err(Error::SizeMismatch {
                expected: (buffer.len() / size + 1) * size,
                actual: buffer.len(),
            });
        }
        Ok(IterUnpack {
            spec: Arc::clone(&self.spec),
            strings: self.strings.clone(),
            chunks: buffer.chunks_exact(size),
        })
    }
}

/// Iterator returned by [`Struct::iter_unpack`]. Yields one record per item.
#[derive(Debug)]
pub struct IterUnpack<'b, S = Utf8> {
    spec: Arc<FormatSpec>,
    strings: S,
    chunks: ChunksExact<'b, u8>,
}

impl<S: StringCodec> Iterator for IterUnpack<'_, S> {
    type Item = Result<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        Some(unpack_fields(&self.spec, chunk, 0, &self.strings))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<S: StringCodec> ExactSizeIterator for IterUnpack<'_, S> {}
