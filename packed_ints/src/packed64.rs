//! Mutable container in the [`Format::Packed`] layout.

use crate::bulk::{BulkOperationPacked, PackedIntsDecoder, PackedIntsEncoder, PackedIntsMeta};
use crate::error::{PackedIntsError, Result};
use crate::format::{Format, max_value};
use crate::reader::{
    Mutable, Reader, blocks_from_be_bytes, blocks_to_be_bytes, check_index, check_range,
    check_value, check_values,
};
use crate::version::{Version, check_version};
use alloc::vec;
use alloc::vec::Vec;
use raw_bytes::Container;

/// Values stored back to back in a big-endian bit stream over 64-bit
/// blocks. A value may straddle two blocks.
///
/// # Examples
///
/// ```
/// use packed_ints::{Mutable, Packed64, Reader};
///
/// let mut ints = Packed64::new(100, 3).unwrap();
/// ints.set(21, 5).unwrap(); // bits 63..66, across the first block boundary
/// assert_eq!(ints.get(21).unwrap(), 5);
/// assert_eq!(ints.get(20).unwrap(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed64 {
    blocks: Container<u64>,
    value_count: usize,
    bits_per_value: u32,
    mask: u64,
}

impl Packed64 {
    /// Zeroed container for `value_count` values of `bits_per_value` bits.
    pub fn new(value_count: usize, bits_per_value: u32) -> Result<Self> {
        Format::Packed.check_bits_per_value(bits_per_value)?;
        let long_count = Format::Packed.long_count(Version::CURRENT, value_count, bits_per_value);
        Ok(Packed64 {
            blocks: Container::zeroed(long_count),
            value_count,
            bits_per_value,
            mask: max_value(bits_per_value),
        })
    }

    /// Loads a container from its persisted bytes.
    pub fn from_bytes(
        version: Version,
        value_count: usize,
        bits_per_value: u32,
        bytes: &[u8],
    ) -> Result<Self> {
        let mut packed = Packed64::new(value_count, bits_per_value)?;
        let byte_count = Format::Packed.byte_count(version, value_count, bits_per_value) as usize;
        if bytes.len() < byte_count {
            return Err(PackedIntsError::InsufficientBytes {
                expected: byte_count,
                found: bytes.len(),
            });
        }
        packed
            .blocks
            .copy_from_slice(&blocks_from_be_bytes(&bytes[..byte_count]))?;
        Ok(packed)
    }

    /// The backing blocks.
    pub fn blocks(&self) -> &Container<u64> {
        &self.blocks
    }

    #[inline]
    fn get_raw(&self, index: usize) -> u64 {
        let blocks = self.blocks.as_slice();
        let major = index * self.bits_per_value as usize;
        let element = major >> 6;
        let end_bits = (major & 63) as u32 + self.bits_per_value;
        if end_bits <= 64 {
            // single block
            (blocks[element] >> (64 - end_bits)) & self.mask
        } else {
            let spill = end_bits - 64;
            ((blocks[element] << spill) | (blocks[element + 1] >> (64 - spill))) & self.mask
        }
    }

    #[inline]
    fn set_raw(&mut self, index: usize, value: u64) {
        let mask = self.mask;
        let blocks = self.blocks.as_mut_slice();
        let major = index * self.bits_per_value as usize;
        let element = major >> 6;
        let end_bits = (major & 63) as u32 + self.bits_per_value;
        if end_bits <= 64 {
            let shift = 64 - end_bits;
            blocks[element] = (blocks[element] & !(mask << shift)) | (value << shift);
        } else {
            let spill = end_bits - 64;
            blocks[element] = (blocks[element] & !(mask >> spill)) | (value >> spill);
            blocks[element + 1] =
                (blocks[element + 1] & (u64::MAX >> spill)) | (value << (64 - spill));
        }
    }
}

impl Reader for Packed64 {
    fn get(&self, index: usize) -> Result<u64> {
        check_index(index, self.value_count)?;
        Ok(self.get_raw(index))
    }

    fn size(&self) -> usize {
        self.value_count
    }

    fn bulk_get(&self, mut index: usize, out: &mut [u64]) -> Result<usize> {
        check_index(index, self.value_count)?;
        let len = out.len().min(self.value_count - index);
        let op = BulkOperationPacked::new(self.bits_per_value)?;
        let unit = op.long_value_count();
        let mut pos = 0;

        // up to the next value starting on a unit boundary
        while pos < len && index % unit != 0 {
            out[pos] = self.get_raw(index);
            index += 1;
            pos += 1;
        }

        let iterations = (len - pos) / unit;
        if iterations > 0 {
            let block = index * self.bits_per_value as usize / 64;
            op.decode_blocks(&self.blocks.as_slice()[block..], &mut out[pos..], iterations);
            index += iterations * unit;
            pos += iterations * unit;
        }

        for slot in &mut out[pos..len] {
            *slot = self.get_raw(index);
            index += 1;
        }
        Ok(len)
    }
}

impl Mutable for Packed64 {
    fn bits_per_value(&self) -> u32 {
        self.bits_per_value
    }

    fn format(&self) -> Format {
        Format::Packed
    }

    fn set(&mut self, index: usize, value: u64) -> Result<()> {
        check_index(index, self.value_count)?;
        check_value(value, self.bits_per_value)?;
        self.set_raw(index, value);
        Ok(())
    }

    fn bulk_set(&mut self, mut index: usize, values: &[u64]) -> Result<usize> {
        check_index(index, self.value_count)?;
        let len = values.len().min(self.value_count - index);
        check_values(&values[..len], self.bits_per_value)?;
        let op = BulkOperationPacked::new(self.bits_per_value)?;
        let unit = op.long_value_count();
        let mut pos = 0;

        while pos < len && index % unit != 0 {
            self.set_raw(index, values[pos]);
            index += 1;
            pos += 1;
        }

        let iterations = (len - pos) / unit;
        if iterations > 0 {
            let block = index * self.bits_per_value as usize / 64;
            op.encode_blocks(
                &values[pos..],
                &mut self.blocks.as_mut_slice()[block..],
                iterations,
            );
            index += iterations * unit;
            pos += iterations * unit;
        }

        for &v in &values[pos..len] {
            self.set_raw(index, v);
            index += 1;
        }
        Ok(len)
    }

    fn fill(&mut self, mut from: usize, to: usize, value: u64) -> Result<()> {
        check_range(from, to, self.value_count)?;
        check_value(value, self.bits_per_value)?;
        let op = BulkOperationPacked::new(self.bits_per_value)?;
        let unit = op.long_value_count();

        if to - from <= 3 * unit {
            for i in from..to {
                self.set_raw(i, value);
            }
            return Ok(());
        }

        while from % unit != 0 {
            self.set_raw(from, value);
            from += 1;
        }

        // one unit of `value` repeated, as whole blocks
        let mut pattern = vec![0u64; op.long_block_count()];
        op.encode_blocks(&vec![value; unit], &mut pattern, 1);

        let bpv = self.bits_per_value as usize;
        let start_block = from * bpv / 64;
        let end_block = to * bpv / 64;
        for (i, block) in self.blocks.as_mut_slice()[start_block..end_block]
            .iter_mut()
            .enumerate()
        {
            *block = pattern[i % pattern.len()];
        }

        // values touching `end_block`, the first possibly straddling into it
        for i in (end_block * 64 / bpv)..to {
            self.set_raw(i, value);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.blocks.zero();
    }

    fn to_bytes(&self, version: i32) -> Result<Vec<u8>> {
        let version = check_version(version)?;
        let byte_count =
            Format::Packed.byte_count(version, self.value_count, self.bits_per_value) as usize;
        Ok(blocks_to_be_bytes(self.blocks.as_slice(), byte_count))
    }
}
