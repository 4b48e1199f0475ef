//! Random-access views over packed storage.
//!
//! [`Reader`] gives indexed reads, [`Mutable`] adds writes and
//! serialisation. [`PackedMutable`] is the owned container returned by the
//! factories in this module; it is either a [`Packed64`] or a
//! [`Packed64SingleBlock`].
//!
//! ```rust
//! use packed_ints::{Format, Mutable, Reader, Version, get_mutable, get_reader};
//!
//! let mut ints = get_mutable(10, 5, Format::Packed).unwrap();
//! ints.set(3, 17).unwrap();
//! assert_eq!(ints.get(3).unwrap(), 17);
//!
//! let bytes = ints.to_bytes(Version::CURRENT.id()).unwrap();
//! let back = get_reader(Format::Packed, Version::CURRENT.id(), 10, 5, &bytes).unwrap();
//! assert_eq!(back.iter().collect::<Vec<_>>(), ints.iter().collect::<Vec<_>>());
//! ```

use crate::error::{PackedIntsError, Result};
use crate::format::{Format, FormatAndBits, max_value};
use crate::packed64::Packed64;
use crate::single_block::Packed64SingleBlock;
use crate::version::check_version;
use alloc::vec;
use alloc::vec::Vec;

/// Bytes of scratch space [`copy`] uses to move values in batches.
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 1024;

/// Read access to a fixed-size sequence of packed values.
pub trait Reader {
    /// Value at `index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index >= size()`.
    fn get(&self, index: usize) -> Result<u64>;

    /// Number of values.
    fn size(&self) -> usize;

    /// Reads consecutive values starting at `index` into `out` and returns
    /// how many were read: `out.len()` or whatever is left before the end.
    fn bulk_get(&self, index: usize, out: &mut [u64]) -> Result<usize> {
        check_index(index, self.size())?;
        let n = out.len().min(self.size() - index);
        for (i, slot) in out[..n].iter_mut().enumerate() {
            *slot = self.get(index + i)?;
        }
        Ok(n)
    }

    fn iter(&self) -> Iter<'_, Self>
    where
        Self: Sized,
    {
        Iter {
            reader: self,
            index: 0,
        }
    }
}

/// Read-write access to a fixed-size sequence of fixed-width values.
pub trait Mutable: Reader {
    fn bits_per_value(&self) -> u32;

    fn format(&self) -> Format;

    /// Overwrites the value at `index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` for a bad index, `ValueOutOfRange` if `value` does
    /// not fit the width. The container is unchanged on error.
    fn set(&mut self, index: usize, value: u64) -> Result<()>;

    /// Writes `values` starting at `index` and returns how many were written.
    /// Every value is checked before anything is written.
    fn bulk_set(&mut self, index: usize, values: &[u64]) -> Result<usize> {
        check_index(index, self.size())?;
        let n = values.len().min(self.size() - index);
        check_values(&values[..n], self.bits_per_value())?;
        for (i, &v) in values[..n].iter().enumerate() {
            self.set(index + i, v)?;
        }
        Ok(n)
    }

    /// Sets every value in `from..to` to `value`.
    fn fill(&mut self, from: usize, to: usize, value: u64) -> Result<()> {
        check_range(from, to, self.size())?;
        check_value(value, self.bits_per_value())?;
        for i in from..to {
            self.set(i, value)?;
        }
        Ok(())
    }

    /// Sets every value to 0.
    fn clear(&mut self);

    /// Serialises the values; the result equals
    /// [`encode`](crate::encode) of the same values with the same format,
    /// version and width.
    fn to_bytes(&self, version: i32) -> Result<Vec<u8>>;
}

/// Iterator over the values of a [`Reader`].
pub struct Iter<'a, R: ?Sized> {
    reader: &'a R,
    index: usize,
}

impl<R: Reader + ?Sized> Iterator for Iter<'_, R> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.reader.size() {
            None
        } else {
            let val = self.reader.get(self.index).ok();
            self.index += 1;
            val
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.reader.size() - self.index;
        (remaining, Some(remaining))
    }
}

impl<R: Reader + ?Sized> ExactSizeIterator for Iter<'_, R> {}

/// A packed container in one of the two layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackedMutable {
    Packed(Packed64),
    SingleBlock(Packed64SingleBlock),
}

impl PackedMutable {
    /// Allocates a zeroed container for `value_count` values.
    pub fn new(value_count: usize, format: Format, bits_per_value: u32) -> Result<Self> {
        match format {
            Format::Packed => Ok(PackedMutable::Packed(Packed64::new(
                value_count,
                bits_per_value,
            )?)),
            Format::PackedSingleBlock => Ok(PackedMutable::SingleBlock(
                Packed64SingleBlock::new(value_count, bits_per_value)?,
            )),
        }
    }
}

impl<'a> IntoIterator for &'a PackedMutable {
    type Item = u64;
    type IntoIter = Iter<'a, PackedMutable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

macro_rules! delegate {
    ($self:ident, $inner:ident => $call:expr) => {
        match $self {
            PackedMutable::Packed($inner) => $call,
            PackedMutable::SingleBlock($inner) => $call,
        }
    };
}

impl Reader for PackedMutable {
    fn get(&self, index: usize) -> Result<u64> {
        delegate!(self, m => m.get(index))
    }

    fn size(&self) -> usize {
        delegate!(self, m => m.size())
    }

    fn bulk_get(&self, index: usize, out: &mut [u64]) -> Result<usize> {
        delegate!(self, m => m.bulk_get(index, out))
    }
}

impl Mutable for PackedMutable {
    fn bits_per_value(&self) -> u32 {
        delegate!(self, m => m.bits_per_value())
    }

    fn format(&self) -> Format {
        delegate!(self, m => m.format())
    }

    fn set(&mut self, index: usize, value: u64) -> Result<()> {
        delegate!(self, m => m.set(index, value))
    }

    fn bulk_set(&mut self, index: usize, values: &[u64]) -> Result<usize> {
        delegate!(self, m => m.bulk_set(index, values))
    }

    fn fill(&mut self, from: usize, to: usize, value: u64) -> Result<()> {
        delegate!(self, m => m.fill(from, to, value))
    }

    fn clear(&mut self) {
        delegate!(self, m => m.clear())
    }

    fn to_bytes(&self, version: i32) -> Result<Vec<u8>> {
        delegate!(self, m => m.to_bytes(version))
    }
}

/// Allocates a zeroed container with exactly the given layout and width.
pub fn get_mutable(value_count: usize, bits_per_value: u32, format: Format) -> Result<PackedMutable> {
    PackedMutable::new(value_count, format, bits_per_value)
}

/// Allocates a zeroed container able to hold `bits_per_value`-bit values,
/// letting [`FormatAndBits::fastest`] pick the layout and actual width.
pub fn get_mutable_with_ratio(
    value_count: usize,
    bits_per_value: u32,
    acceptable_overhead_ratio: f32,
) -> Result<PackedMutable> {
    Format::Packed.check_bits_per_value(bits_per_value)?;
    let chosen = FormatAndBits::fastest(bits_per_value, acceptable_overhead_ratio);
    PackedMutable::new(value_count, chosen.format, chosen.bits_per_value)
}

/// Loads a container from a buffer written by [`Mutable::to_bytes`] or
/// [`encode`](crate::encode).
///
/// # Errors
///
/// `InvalidVersion`, then `InvalidBitsPerValue`, then `InsufficientBytes`
/// if `bytes` is shorter than the footprint. Extra trailing bytes are
/// ignored.
pub fn get_reader(
    format: Format,
    version: i32,
    value_count: usize,
    bits_per_value: u32,
    bytes: &[u8],
) -> Result<PackedMutable> {
    let version = check_version(version)?;
    format.check_bits_per_value(bits_per_value)?;
    tracing::trace!(
        ?format,
        ?version,
        value_count,
        bits_per_value,
        len = bytes.len(),
        "loading packed reader"
    );
    match format {
        Format::Packed => Ok(PackedMutable::Packed(Packed64::from_bytes(
            version,
            value_count,
            bits_per_value,
            bytes,
        )?)),
        Format::PackedSingleBlock => Ok(PackedMutable::SingleBlock(
            Packed64SingleBlock::from_bytes(value_count, bits_per_value, bytes)?,
        )),
    }
}

/// Copies `len` values from `src[src_pos..]` to `dest[dest_pos..]` through a
/// buffer of [`DEFAULT_COPY_BUFFER_SIZE`] bytes.
pub fn copy<S, D>(src: &S, src_pos: usize, dest: &mut D, dest_pos: usize, len: usize) -> Result<()>
where
    S: Reader + ?Sized,
    D: Mutable + ?Sized,
{
    copy_with_buffer_size(src, src_pos, dest, dest_pos, len, DEFAULT_COPY_BUFFER_SIZE)
}

/// Like [`copy`] with an explicit scratch size in bytes. Below 8 bytes the
/// values are moved one at a time.
pub fn copy_with_buffer_size<S, D>(
    src: &S,
    mut src_pos: usize,
    dest: &mut D,
    mut dest_pos: usize,
    mut len: usize,
    buffer_bytes: usize,
) -> Result<()>
where
    S: Reader + ?Sized,
    D: Mutable + ?Sized,
{
    check_range(src_pos, src_pos + len, src.size())?;
    check_range(dest_pos, dest_pos + len, dest.size())?;

    let capacity = buffer_bytes / 8;
    if capacity == 0 {
        for i in 0..len {
            dest.set(dest_pos + i, src.get(src_pos + i)?)?;
        }
        return Ok(());
    }

    let mut buf = vec![0u64; capacity.min(len)];
    while len > 0 {
        let chunk = len.min(buf.len());
        let read = src.bulk_get(src_pos, &mut buf[..chunk])?;
        let mut written = 0;
        while written < read {
            written += dest.bulk_set(dest_pos + written, &buf[written..read])?;
        }
        src_pos += read;
        dest_pos += read;
        len -= read;
    }
    Ok(())
}

#[inline]
pub(crate) fn check_index(index: usize, size: usize) -> Result<()> {
    if index < size {
        Ok(())
    } else {
        Err(PackedIntsError::IndexOutOfBounds(index, size))
    }
}

/// `from..to` must be a valid, possibly empty, range of a `size`-long
/// sequence.
#[inline]
pub(crate) fn check_range(from: usize, to: usize, size: usize) -> Result<()> {
    if to > size {
        Err(PackedIntsError::IndexOutOfBounds(to, size))
    } else if from > to {
        Err(PackedIntsError::IndexOutOfBounds(from, to))
    } else {
        Ok(())
    }
}

#[inline]
pub(crate) fn check_value(value: u64, bits_per_value: u32) -> Result<()> {
    if value <= max_value(bits_per_value) {
        Ok(())
    } else {
        Err(PackedIntsError::ValueOutOfRange {
            value,
            bits_per_value,
        })
    }
}

pub(crate) fn check_values(values: &[u64], bits_per_value: u32) -> Result<()> {
    values
        .iter()
        .try_for_each(|&v| check_value(v, bits_per_value))
}

/// Reads big-endian 64-bit blocks; a short final chunk is zero-padded.
pub(crate) fn blocks_from_be_bytes(bytes: &[u8]) -> Vec<u64> {
    bytes
        .chunks(8)
        .map(|chunk| {
            let mut be = [0u8; 8];
            be[..chunk.len()].copy_from_slice(chunk);
            u64::from_be_bytes(be)
        })
        .collect()
}

/// Serialises blocks big-endian and keeps the first `byte_count` bytes.
pub(crate) fn blocks_to_be_bytes(blocks: &[u64], byte_count: usize) -> Vec<u8> {
    let mut out: Vec<u8> = blocks.iter().flat_map(|b| b.to_be_bytes()).collect();
    out.resize(byte_count, 0);
    out
}
