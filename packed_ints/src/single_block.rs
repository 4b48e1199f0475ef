//! Mutable container in the [`Format::PackedSingleBlock`] layout.

use crate::bulk::{BulkOperationPackedSingleBlock, PackedIntsDecoder, PackedIntsEncoder};
use crate::error::{PackedIntsError, Result};
use crate::format::{Format, max_value};
use crate::reader::{
    Mutable, Reader, blocks_from_be_bytes, blocks_to_be_bytes, check_index, check_range,
    check_value, check_values,
};
use crate::version::{Version, check_version};
use alloc::vec::Vec;
use raw_bytes::Container;

/// `64 / bits_per_value` values per block, the first in the lowest bits.
/// No value ever crosses a block boundary, so a get is one shift and one
/// mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed64SingleBlock {
    blocks: Container<u64>,
    value_count: usize,
    bits_per_value: u32,
    values_per_block: usize,
    mask: u64,
}

impl Packed64SingleBlock {
    /// Zeroed container; `bits_per_value` must be one of
    /// [`SINGLE_BLOCK_BITS`](crate::SINGLE_BLOCK_BITS).
    pub fn new(value_count: usize, bits_per_value: u32) -> Result<Self> {
        Format::PackedSingleBlock.check_bits_per_value(bits_per_value)?;
        let long_count =
            Format::PackedSingleBlock.long_count(Version::CURRENT, value_count, bits_per_value);
        Ok(Packed64SingleBlock {
            blocks: Container::zeroed(long_count),
            value_count,
            bits_per_value,
            values_per_block: (64 / bits_per_value) as usize,
            mask: max_value(bits_per_value),
        })
    }

    /// Loads a container from its persisted bytes. The footprint is the same
    /// under every version.
    pub fn from_bytes(value_count: usize, bits_per_value: u32, bytes: &[u8]) -> Result<Self> {
        let mut packed = Packed64SingleBlock::new(value_count, bits_per_value)?;
        let byte_count = 8 * packed.blocks.len();
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

    pub fn blocks(&self) -> &Container<u64> {
        &self.blocks
    }

    #[inline]
    fn position(&self, index: usize) -> (usize, u32) {
        let block = index / self.values_per_block;
        let slot = index % self.values_per_block;
        (block, slot as u32 * self.bits_per_value)
    }

    #[inline]
    fn get_raw(&self, index: usize) -> u64 {
        let (block, shift) = self.position(index);
        (self.blocks[block] >> shift) & self.mask
    }

    #[inline]
    fn set_raw(&mut self, index: usize, value: u64) {
        let (block, shift) = self.position(index);
        let mask = self.mask;
        let b = &mut self.blocks[block];
        *b = (*b & !(mask << shift)) | (value << shift);
    }
}

impl Reader for Packed64SingleBlock {
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
        let vpb = self.values_per_block;
        let mut pos = 0;

        while pos < len && index % vpb != 0 {
            out[pos] = self.get_raw(index);
            index += 1;
            pos += 1;
        }

        let blocks = (len - pos) / vpb;
        if blocks > 0 {
            let op = BulkOperationPackedSingleBlock::new(self.bits_per_value)?;
            op.decode_blocks(&self.blocks.as_slice()[index / vpb..], &mut out[pos..], blocks);
            index += blocks * vpb;
            pos += blocks * vpb;
        }

        for slot in &mut out[pos..len] {
            *slot = self.get_raw(index);
            index += 1;
        }
        Ok(len)
    }
}

impl Mutable for Packed64SingleBlock {
    fn bits_per_value(&self) -> u32 {
        self.bits_per_value
    }

    fn format(&self) -> Format {
        Format::PackedSingleBlock
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
        let vpb = self.values_per_block;
        let mut pos = 0;

        while pos < len && index % vpb != 0 {
            self.set_raw(index, values[pos]);
            index += 1;
            pos += 1;
        }

        let blocks = (len - pos) / vpb;
        if blocks > 0 {
            let op = BulkOperationPackedSingleBlock::new(self.bits_per_value)?;
            op.encode_blocks(
                &values[pos..],
                &mut self.blocks.as_mut_slice()[index / vpb..],
                blocks,
            );
            index += blocks * vpb;
            pos += blocks * vpb;
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
        let vpb = self.values_per_block;

        if to - from <= 2 * vpb {
            for i in from..to {
                self.set_raw(i, value);
            }
            return Ok(());
        }

        while from % vpb != 0 {
            self.set_raw(from, value);
            from += 1;
        }

        let pattern = (0..vpb).fold(0u64, |block, slot| {
            block | (value << (slot as u32 * self.bits_per_value))
        });
        let to_block = to / vpb;
        self.blocks.as_mut_slice()[from / vpb..to_block].fill(pattern);

        for i in to_block * vpb..to {
            self.set_raw(i, value);
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.blocks.zero();
    }

    fn to_bytes(&self, version: i32) -> Result<Vec<u8>> {
        let version = check_version(version)?;
        let byte_count = Format::PackedSingleBlock.byte_count(
            version,
            self.value_count,
            self.bits_per_value,
        ) as usize;
        Ok(blocks_to_be_bytes(self.blocks.as_slice(), byte_count))
    }
}
