use crate::error::{Error, Result};
use crate::format::FormatSpec;
use crate::reader::check_region;
use crate::strings::StringCodec;
use crate::value::Value;
use core::marker::PhantomData;
use zerocopy::byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Writes fixed-width fields into a caller-supplied slice of bytes, in the byte order `O`.
///
/// Unlike a growable writer, the destination never changes size: writing past its end fails
/// with [`Error::BufferTooSmall`].
pub struct FieldWriter<'a, O> {
    out: &'a mut [u8],
    pos: usize,
    order: PhantomData<O>,
}

impl<'a, O: ByteOrder> FieldWriter<'a, O> {
    /// Creates a writer positioned at `pos`.
    pub fn new(out: &'a mut [u8], pos: usize) -> Self {
        Self {
            out,
            pos,
            order: PhantomData,
        }
    }

    /// The current write position, relative to the start of the output.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Reserves the next `len` bytes and returns them for writing.
    fn claim(&mut self, len: usize) -> Result<&mut [u8]> {
        let available = self.out.len();
        let end = self.pos.checked_add(len).ok_or(Error::BufferTooSmall {
            needed: usize::MAX,
            available,
        })?;
        let start = self.pos;
        match self.out.get_mut(start..end) {
            Some(dest) => {
                self.pos = end;
                Ok(dest)
            }
            None => Err(Error::BufferTooSmall {
                needed: end,
                available,
            }),
        }
    }

    /// Writes `bytes` to the output.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.claim(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Writes a small, fixed-size array of bytes.
    pub fn write_cbytes<const N: usize>(&mut self, value: [u8; N]) -> Result<()> {
        self.write_bytes(&value)
    }

    /// Writes a single `u8` value.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_cbytes([value])
    }

    /// Writes `len` zero bytes.
    pub fn zero_fill(&mut self, len: usize) -> Result<()> {
        self.claim(len)?.fill(0);
        Ok(())
    }

    /// Writes `bytes` into a field of exactly `len` bytes, truncating `bytes` if it is longer
    /// and zero-filling the rest if it is shorter.
    pub fn write_padded(&mut self, bytes: &[u8], len: usize) -> Result<()> {
        let dest = self.claim(len)?;
        let n = bytes.len().min(len);
        dest[..n].copy_from_slice(&bytes[..n]);
        dest[n..].fill(0);
        Ok(())
    }

    /// Encodes `text` into a field of exactly `len` bytes using `strings`, zero-filling
    /// whatever the codec leaves unwritten.
    pub fn write_text<S: StringCodec + ?Sized>(
        &mut self,
        text: &str,
        len: usize,
        strings: &S,
    ) -> Result<()> {
        let dest = self.claim(len)?;
        let written = strings.encode_into(text, dest).min(len);
        dest[written..].fill(0);
        Ok(())
    }
}

/// Encodes `values` into `buffer` according to `spec`, starting at `offset`.
///
/// The argument count and the destination region are validated before any byte is written.
/// Bytes of `buffer` outside `[offset, offset + spec.size())` are never touched.
pub(crate) fn pack_fields<S: StringCodec + ?Sized>(
    spec: &FormatSpec,
    buffer: &mut [u8],
    offset: usize,
    values: &[Value],
    strings: &S,
) -> Result<()> {
    let expected = spec.value_count();
    if values.len() < expected {
        return Err(Error::InsufficientArguments {
            expected,
            got: values.len(),
        });
    }
    if values.len() > expected {
        return Err(Error::TooManyArguments {
            expected,
            got: values.len(),
        });
    }
    check_region(spec, buffer.len(), offset)?;

    if spec.is_little_endian() {
        encode_all(spec, FieldWriter::<LittleEndian>::new(buffer, offset), values, strings)
    } else {
        encode_all(spec, FieldWriter::<BigEndian>::new(buffer, offset), values, strings)
    }
}

/// Hands out the caller's values in order.
pub(crate) struct Args<'v> {
    values: &'v [Value],
    next: usize,
    expected: usize,
}

impl<'v> Args<'v> {
    pub(crate) fn next(&mut self) -> Result<&'v Value> {
        let value = self
            .values
            .get(self.next)
            .ok_or(Error::InsufficientArguments {
                expected: self.expected,
                got: self.values.len(),
            })?;
        self.next += 1;
        Ok(value)
    }
}

fn encode_all<O: ByteOrder, S: StringCodec + ?Sized>(
    spec: &FormatSpec,
    mut w: FieldWriter<'_, O>,
    values: &[Value],
    strings: &S,
) -> Result<()> {
    let mut args = Args {
        values,
        next: 0,
        expected: spec.value_count(),
    };
    for field in spec.fields() {
        field
            .code()
            .encode(&mut w, field.count(), &mut args, strings)?;
    }
    Ok(())
}
