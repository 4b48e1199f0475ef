//! Bulk codec for [`Format::Packed`].
//!
//! Every width from 1 to 64 gets its own monomorphised kernels so shift
//! amounts and unit sizes are compile-time constants inside the hot loops.
//! The kernels are collected into a static table indexed by width.

use super::{PackedIntsDecoder, PackedIntsEncoder, PackedIntsMeta};
use crate::error::Result;
use crate::format::{Format, max_value};

/// Sizes of the smallest run of blocks holding a whole number of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnitCounts {
    pub long_block_count: usize,
    pub long_value_count: usize,
    pub byte_block_count: usize,
    pub byte_value_count: usize,
}

pub(crate) const fn unit_counts(bits_per_value: u32) -> UnitCounts {
    let mut blocks = bits_per_value as usize;
    while blocks & 1 == 0 {
        blocks >>= 1;
    }
    let long_block_count = blocks;
    let long_value_count = 64 * long_block_count / bits_per_value as usize;
    let mut byte_block_count = 8 * long_block_count;
    let mut byte_value_count = long_value_count;
    while byte_block_count & 1 == 0 && byte_value_count & 1 == 0 {
        byte_block_count >>= 1;
        byte_value_count >>= 1;
    }
    UnitCounts {
        long_block_count,
        long_value_count,
        byte_block_count,
        byte_value_count,
    }
}

struct Kernels {
    decode_blocks: fn(&[u64], &mut [u64], usize),
    decode_bytes: fn(&[u8], &mut [u64], usize),
    encode_blocks: fn(&[u64], &mut [u64], usize),
    encode_bytes: fn(&[u64], &mut [u8], usize),
}

macro_rules! kernel_table {
    ($($bpv:literal)*) => {
        [$(Kernels {
            decode_blocks: decode_blocks::<$bpv>,
            decode_bytes: decode_bytes::<$bpv>,
            encode_blocks: encode_blocks::<$bpv>,
            encode_bytes: encode_bytes::<$bpv>,
        },)*]
    };
}

static KERNELS: [Kernels; 64] = kernel_table!(
    1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16
    17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32
    33 34 35 36 37 38 39 40 41 42 43 44 45 46 47 48
    49 50 51 52 53 54 55 56 57 58 59 60 61 62 63 64
);

fn decode_blocks<const BPV: u32>(blocks: &[u64], values: &mut [u64], iterations: usize) {
    let units = const { unit_counts(BPV) };
    let mask = const { max_value(BPV) };
    let mut block = 0;
    let mut bits_left = 64u32;
    for v in values[..units.long_value_count * iterations].iter_mut() {
        if bits_left >= BPV {
            bits_left -= BPV;
            *v = (blocks[block] >> bits_left) & mask;
            if bits_left == 0 {
                block += 1;
                bits_left = 64;
            }
        } else {
            // value straddles two blocks
            let spill = BPV - bits_left;
            *v = ((blocks[block] & max_value(bits_left)) << spill)
                | (blocks[block + 1] >> (64 - spill));
            block += 1;
            bits_left = 64 - spill;
        }
    }
}

fn encode_blocks<const BPV: u32>(values: &[u64], blocks: &mut [u64], iterations: usize) {
    let units = const { unit_counts(BPV) };
    let mut next = 0u64;
    let mut bits_left = 64u32;
    let mut block = 0;
    for &v in &values[..units.long_value_count * iterations] {
        if BPV < bits_left {
            bits_left -= BPV;
            next |= v << bits_left;
        } else if BPV == bits_left {
            blocks[block] = next | v;
            block += 1;
            next = 0;
            bits_left = 64;
        } else {
            let spill = BPV - bits_left;
            blocks[block] = next | (v >> spill);
            block += 1;
            next = v << (64 - spill);
            bits_left = 64 - spill;
        }
    }
    debug_assert_eq!(bits_left, 64);
}

fn decode_bytes<const BPV: u32>(bytes: &[u8], values: &mut [u64], iterations: usize) {
    let units = const { unit_counts(BPV) };
    let mask = const { max_value(BPV) };
    let mut next_value = 0u64;
    // bits still missing from the value being assembled
    let mut bits_left = BPV;
    let mut out = 0;
    for &byte in &bytes[..units.byte_block_count * iterations] {
        let byte = u64::from(byte);
        if bits_left > 8 {
            bits_left -= 8;
            next_value |= byte << bits_left;
        } else {
            let mut bits = 8 - bits_left;
            values[out] = next_value | (byte >> bits);
            out += 1;
            while bits >= BPV {
                bits -= BPV;
                values[out] = (byte >> bits) & mask;
                out += 1;
            }
            bits_left = BPV - bits;
            next_value = if bits == 0 {
                0
            } else {
                (byte & max_value(bits)) << bits_left
            };
        }
    }
    debug_assert_eq!(bits_left, BPV);
}

fn encode_bytes<const BPV: u32>(values: &[u64], bytes: &mut [u8], iterations: usize) {
    let units = const { unit_counts(BPV) };
    let mut next_byte = 0u64;
    // free bits in the byte being assembled
    let mut bits_left = 8u32;
    let mut out = 0;
    for &v in &values[..units.byte_value_count * iterations] {
        if BPV < bits_left {
            bits_left -= BPV;
            next_byte |= v << bits_left;
        } else {
            let mut bits = BPV - bits_left;
            bytes[out] = (next_byte | (v >> bits)) as u8;
            out += 1;
            while bits >= 8 {
                bits -= 8;
                bytes[out] = (v >> bits) as u8;
                out += 1;
            }
            bits_left = 8 - bits;
            next_byte = (v & max_value(bits)) << bits_left;
        }
    }
    debug_assert_eq!(bits_left, 8);
}

/// Packed-layout codec for one width.
#[derive(Clone, Copy)]
pub struct BulkOperationPacked {
    bits_per_value: u32,
    units: UnitCounts,
    kernels: &'static Kernels,
}

impl BulkOperationPacked {
    pub fn new(bits_per_value: u32) -> Result<Self> {
        Format::Packed.check_bits_per_value(bits_per_value)?;
        Ok(BulkOperationPacked {
            bits_per_value,
            units: unit_counts(bits_per_value),
            kernels: &KERNELS[bits_per_value as usize - 1],
        })
    }

    pub fn bits_per_value(&self) -> u32 {
        self.bits_per_value
    }
}

impl core::fmt::Debug for BulkOperationPacked {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BulkOperationPacked")
            .field("bits_per_value", &self.bits_per_value)
            .field("units", &self.units)
            .finish()
    }
}

impl PackedIntsMeta for BulkOperationPacked {
    fn long_block_count(&self) -> usize {
        self.units.long_block_count
    }

    fn long_value_count(&self) -> usize {
        self.units.long_value_count
    }

    fn byte_block_count(&self) -> usize {
        self.units.byte_block_count
    }

    fn byte_value_count(&self) -> usize {
        self.units.byte_value_count
    }
}

impl PackedIntsDecoder for BulkOperationPacked {
    fn decode_blocks(&self, blocks: &[u64], values: &mut [u64], iterations: usize) {
        (self.kernels.decode_blocks)(blocks, values, iterations)
    }

    fn decode_bytes(&self, bytes: &[u8], values: &mut [u64], iterations: usize) {
        (self.kernels.decode_bytes)(bytes, values, iterations)
    }
}

impl PackedIntsEncoder for BulkOperationPacked {
    fn encode_blocks(&self, values: &[u64], blocks: &mut [u64], iterations: usize) {
        (self.kernels.encode_blocks)(values, blocks, iterations)
    }

    fn encode_bytes(&self, values: &[u64], bytes: &mut [u8], iterations: usize) {
        (self.kernels.encode_bytes)(values, bytes, iterations)
    }
}
