//! Bulk codec for [`Format::PackedSingleBlock`].

use super::{PackedIntsDecoder, PackedIntsEncoder, PackedIntsMeta};
use crate::error::Result;
use crate::format::{Format, max_value};

/// Single-block codec for one width: each 64-bit block holds
/// `64 / bits_per_value` values, the first in the lowest bits.
#[derive(Debug, Clone, Copy)]
pub struct BulkOperationPackedSingleBlock {
    bits_per_value: u32,
    values_per_block: usize,
    mask: u64,
}

impl BulkOperationPackedSingleBlock {
    pub fn new(bits_per_value: u32) -> Result<Self> {
        Format::PackedSingleBlock.check_bits_per_value(bits_per_value)?;
        Ok(BulkOperationPackedSingleBlock {
            bits_per_value,
            values_per_block: (64 / bits_per_value) as usize,
            mask: max_value(bits_per_value),
        })
    }

    pub fn bits_per_value(&self) -> u32 {
        self.bits_per_value
    }

    #[inline]
    fn decode_block(&self, mut block: u64, values: &mut [u64]) {
        for v in values[..self.values_per_block].iter_mut() {
            *v = block & self.mask;
            block >>= self.bits_per_value;
        }
    }

    #[inline]
    fn encode_block(&self, values: &[u64]) -> u64 {
        values[..self.values_per_block]
            .iter()
            .enumerate()
            .fold(0u64, |block, (i, &v)| {
                block | (v << (i as u32 * self.bits_per_value))
            })
    }
}

impl PackedIntsMeta for BulkOperationPackedSingleBlock {
    fn long_block_count(&self) -> usize {
        1
    }

    fn long_value_count(&self) -> usize {
        self.values_per_block
    }

    fn byte_block_count(&self) -> usize {
        8
    }

    fn byte_value_count(&self) -> usize {
        self.values_per_block
    }
}

impl PackedIntsDecoder for BulkOperationPackedSingleBlock {
    fn decode_blocks(&self, blocks: &[u64], values: &mut [u64], iterations: usize) {
        let chunks = values.chunks_mut(self.values_per_block);
        for (&block, out) in blocks[..iterations].iter().zip(chunks) {
            self.decode_block(block, out);
        }
    }

    fn decode_bytes(&self, bytes: &[u8], values: &mut [u64], iterations: usize) {
        let chunks = values.chunks_mut(self.values_per_block);
        for (raw, out) in bytes[..8 * iterations].chunks_exact(8).zip(chunks) {
            let mut be = [0u8; 8];
            be.copy_from_slice(raw);
            self.decode_block(u64::from_be_bytes(be), out);
        }
    }
}

impl PackedIntsEncoder for BulkOperationPackedSingleBlock {
    fn encode_blocks(&self, values: &[u64], blocks: &mut [u64], iterations: usize) {
        let chunks = values.chunks(self.values_per_block);
        for (block, chunk) in blocks[..iterations].iter_mut().zip(chunks) {
            *block = self.encode_block(chunk);
        }
    }

    fn encode_bytes(&self, values: &[u64], bytes: &mut [u8], iterations: usize) {
        let chunks = values.chunks(self.values_per_block);
        for (out, chunk) in bytes[..8 * iterations].chunks_exact_mut(8).zip(chunks) {
            out.copy_from_slice(&self.encode_block(chunk).to_be_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_values_per_21_bit_block() {
        let op = BulkOperationPackedSingleBlock::new(21).unwrap();
        assert_eq!(op.byte_value_count(), 3);
        let mut blocks = [0u64; 2];
        op.encode_blocks(&[1, 2, 3, 4, 5, 6], &mut blocks, 2);
        assert_eq!(blocks[0], 1 | (2 << 21) | (3 << 42));
        // top bit of each block stays free
        assert_eq!(blocks[1] >> 63, 0);

        let mut back = [0u64; 6];
        op.decode_blocks(&blocks, &mut back, 2);
        assert_eq!(back, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn bytes_are_big_endian_blocks() {
        let op = BulkOperationPackedSingleBlock::new(32).unwrap();
        let mut bytes = [0u8; 8];
        op.encode_bytes(&[0x0102_0304, 0x0A0B_0C0D], &mut bytes, 1);
        assert_eq!(bytes, [0x0A, 0x0B, 0x0C, 0x0D, 0x01, 0x02, 0x03, 0x04]);

        let mut back = [0u64; 2];
        op.decode_bytes(&bytes, &mut back, 1);
        assert_eq!(back, [0x0102_0304, 0x0A0B_0C0D]);
    }

    #[test]
    fn rejects_widths_without_whole_blocks() {
        assert!(BulkOperationPackedSingleBlock::new(11).is_err());
        assert!(BulkOperationPackedSingleBlock::new(64).is_err());
    }
}
