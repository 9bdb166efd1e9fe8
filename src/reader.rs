use crate::error::{Error, Result};
use crate::format::FormatSpec;
use crate::strings::StringCodec;
use crate::value::Value;
use alloc::vec::Vec;
use core::marker::PhantomData;
use zerocopy::byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Reads fixed-width fields from a slice of bytes, in the byte order `O`.
///
/// The reader keeps the whole input slice and a cursor into it, so that errors can report
/// positions relative to the start of the caller's buffer rather than the start of the record.
/// Reading past the end fails with [`Error::BufferTooSmall`] and leaves the cursor unchanged.
pub struct FieldReader<'a, O> {
    data: &'a [u8],
    pos: usize,
    order: PhantomData<O>,
}

impl<'a, O: ByteOrder> FieldReader<'a, O> {
    /// Creates a reader positioned at `pos`.
    pub fn new(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos,
            order: PhantomData,
        }
    }

    /// The current read position, relative to the start of the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The bytes that have not been read yet.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }

    /// Reads a slice of bytes whose length is `len`. This returns a slice reference to the
    /// bytes; it does not copy them.
    #[inline(always)]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(Error::BufferTooSmall {
            needed: usize::MAX,
            available: self.data.len(),
        })?;
        match self.data.get(self.pos..end) {
            Some(bytes) => {
                self.pos = end;
                Ok(bytes)
            }
            None => Err(Error::BufferTooSmall {
                needed: end,
                available: self.data.len(),
            }),
        }
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        let [b] = self.read_cbytes()?;
        Ok(b)
    }

    /// Advances past `len` bytes without looking at them.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }
}

/// Decodes every field of `spec` from `buffer`, starting at `offset`.
///
/// The whole region `[offset, offset + spec.size())` is checked up front, so either every
/// value is produced or none is.
pub(crate) fn unpack_fields<S: StringCodec + ?Sized>(
    spec: &FormatSpec,
    buffer: &[u8],
    offset: usize,
    strings: &S,
) -> Result<Vec<Value>> {
    check_region(spec, buffer.len(), offset)?;
    if spec.is_little_endian() {
        decode_all::<LittleEndian, S>(spec, FieldReader::new(buffer, offset), strings)
    } else {
        decode_all::<BigEndian, S>(spec, FieldReader::new(buffer, offset), strings)
    }
}

/// Checks that `offset` lies within a buffer of `len` bytes and that `spec` fits after it.
pub(crate) fn check_region(spec: &FormatSpec, len: usize, offset: usize) -> Result<()> {
    if offset > len {
        return Err(Error::InvalidOffset { offset, len });
    }
    match offset.checked_add(spec.size()) {
        Some(end) if end <= len => Ok(()),
        end => Err(Error::BufferTooSmall {
            needed: end.unwrap_or(usize::MAX),
            available: len,
        }),
    }
}

fn decode_all<O: ByteOrder, S: StringCodec + ?Sized>(
    spec: &FormatSpec,
    mut r: FieldReader<'_, O>,
    strings: &S,
) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(spec.value_count());
    for field in spec.fields() {
        field
            .code()
            .decode(&mut r, field.count(), strings, &mut values)?;
    }
    Ok(values)
}
