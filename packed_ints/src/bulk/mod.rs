//! Bulk conversion between integer sequences and packed storage.
//!
//! An encoder/decoder works in *iterations*: one iteration consumes
//! `byte_block_count` bytes (or `long_block_count` blocks) and produces
//! `byte_value_count` (or `long_value_count`) values. [`encode`] and
//! [`decode`] wrap that for sequences of any length.
//!
//! ```rust
//! use packed_ints::{Format, Version, decode, encode};
//!
//! let values = [5u64, 0, 7, 3, 1];
//! let bytes = encode(Format::Packed, Version::CURRENT.id(), 3, &values).unwrap();
//! assert_eq!(bytes.len(), 2);
//!
//! let back = decode(Format::Packed, Version::CURRENT.id(), 3, &bytes, values.len()).unwrap();
//! assert_eq!(back, values);
//! ```

mod packed;
mod single_block;

pub use packed::BulkOperationPacked;
pub use single_block::BulkOperationPackedSingleBlock;

use crate::error::{PackedIntsError, Result};
use crate::format::{Format, max_value};
use crate::version::check_version;
use alloc::vec;
use alloc::vec::Vec;

/// Unit sizes of a bulk codec.
pub trait PackedIntsMeta {
    /// 64-bit blocks consumed or produced per iteration.
    fn long_block_count(&self) -> usize;

    /// Values per `long_block_count` blocks.
    fn long_value_count(&self) -> usize;

    /// Bytes consumed or produced per iteration.
    fn byte_block_count(&self) -> usize;

    /// Values per `byte_block_count` bytes.
    fn byte_value_count(&self) -> usize;

    /// Number of byte iterations to run at a time so that a byte buffer and
    /// its decoded values fit in `ram_budget` bytes, without asking for more
    /// iterations than `value_count` values need.
    fn compute_iterations(&self, value_count: usize, ram_budget: usize) -> usize {
        let per_iteration = self.byte_block_count() + 8 * self.byte_value_count();
        let iterations = ram_budget / per_iteration;
        if iterations == 0 {
            1
        } else if (iterations - 1) * self.byte_value_count() >= value_count {
            value_count.div_ceil(self.byte_value_count())
        } else {
            iterations
        }
    }
}

/// Unpacks values from blocks or bytes.
///
/// Kernels do not bounds-check beyond slice indexing: they panic when the
/// input holds fewer than `iterations` units or the output is too short.
pub trait PackedIntsDecoder: PackedIntsMeta + Send + Sync {
    fn decode_blocks(&self, blocks: &[u64], values: &mut [u64], iterations: usize);

    fn decode_bytes(&self, bytes: &[u8], values: &mut [u64], iterations: usize);
}

/// Packs values into blocks or bytes.
///
/// Values must fit the codec's width; larger values bleed into their
/// neighbours. Use [`encode`] for a checked variant.
pub trait PackedIntsEncoder: PackedIntsMeta + Send + Sync {
    fn encode_blocks(&self, values: &[u64], blocks: &mut [u64], iterations: usize);

    fn encode_bytes(&self, values: &[u64], bytes: &mut [u8], iterations: usize);
}

/// Bulk codec for one (format, width) pair.
#[derive(Debug, Clone, Copy)]
pub enum BulkOperation {
    Packed(BulkOperationPacked),
    PackedSingleBlock(BulkOperationPackedSingleBlock),
}

impl BulkOperation {
    /// Looks up the codec for a format and width.
    pub fn of(format: Format, bits_per_value: u32) -> Result<Self> {
        match format {
            Format::Packed => Ok(BulkOperation::Packed(BulkOperationPacked::new(
                bits_per_value,
            )?)),
            Format::PackedSingleBlock => Ok(BulkOperation::PackedSingleBlock(
                BulkOperationPackedSingleBlock::new(bits_per_value)?,
            )),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            BulkOperation::Packed(_) => Format::Packed,
            BulkOperation::PackedSingleBlock(_) => Format::PackedSingleBlock,
        }
    }

    pub fn bits_per_value(&self) -> u32 {
        match self {
            BulkOperation::Packed(op) => op.bits_per_value(),
            BulkOperation::PackedSingleBlock(op) => op.bits_per_value(),
        }
    }
}

macro_rules! delegate {
    ($self:ident, $op:ident => $call:expr) => {
        match $self {
            BulkOperation::Packed($op) => $call,
            BulkOperation::PackedSingleBlock($op) => $call,
        }
    };
}

impl PackedIntsMeta for BulkOperation {
    fn long_block_count(&self) -> usize {
        delegate!(self, op => op.long_block_count())
    }

    fn long_value_count(&self) -> usize {
        delegate!(self, op => op.long_value_count())
    }

    fn byte_block_count(&self) -> usize {
        delegate!(self, op => op.byte_block_count())
    }

    fn byte_value_count(&self) -> usize {
        delegate!(self, op => op.byte_value_count())
    }
}

impl PackedIntsDecoder for BulkOperation {
    fn decode_blocks(&self, blocks: &[u64], values: &mut [u64], iterations: usize) {
        delegate!(self, op => op.decode_blocks(blocks, values, iterations))
    }

    fn decode_bytes(&self, bytes: &[u8], values: &mut [u64], iterations: usize) {
        delegate!(self, op => op.decode_bytes(bytes, values, iterations))
    }
}

impl PackedIntsEncoder for BulkOperation {
    fn encode_blocks(&self, values: &[u64], blocks: &mut [u64], iterations: usize) {
        delegate!(self, op => op.encode_blocks(values, blocks, iterations))
    }

    fn encode_bytes(&self, values: &[u64], bytes: &mut [u8], iterations: usize) {
        delegate!(self, op => op.encode_bytes(values, bytes, iterations))
    }
}

/// Returns an encoder for `bits_per_value`-bit values in `format`.
///
/// Fails with `InvalidVersion` before anything else if `version` is not
/// supported.
pub fn get_encoder(format: Format, version: i32, bits_per_value: u32) -> Result<BulkOperation> {
    check_version(version)?;
    BulkOperation::of(format, bits_per_value)
}

/// Returns a decoder for `bits_per_value`-bit values in `format`.
pub fn get_decoder(format: Format, version: i32, bits_per_value: u32) -> Result<BulkOperation> {
    check_version(version)?;
    BulkOperation::of(format, bits_per_value)
}

/// Packs `values` into a new buffer of exactly `byte_count` bytes.
pub fn encode(format: Format, version: i32, bits_per_value: u32, values: &[u64]) -> Result<Vec<u8>> {
    let checked = check_version(version)?;
    Format::check_bits_per_value(format, bits_per_value)?;
    let byte_count = format.byte_count(checked, values.len(), bits_per_value) as usize;
    let mut out = vec![0u8; byte_count];
    encode_into(format, version, bits_per_value, values, &mut out)?;
    Ok(out)
}

/// Packs `values` into the front of `out` and returns the number of bytes
/// written, which is always `byte_count` for the sequence. Bytes past that
/// are left untouched.
///
/// # Errors
///
/// - `InvalidVersion` / `InvalidBitsPerValue` for a bad codec selection
/// - `InsufficientBytes` if `out` is shorter than the footprint
/// - `ValueOutOfRange` if a value does not fit the width; nothing is written
pub fn encode_into(
    format: Format,
    version: i32,
    bits_per_value: u32,
    values: &[u64],
    out: &mut [u8],
) -> Result<usize> {
    let version = check_version(version)?;
    let op = BulkOperation::of(format, bits_per_value)?;
    let byte_count = format.byte_count(version, values.len(), bits_per_value) as usize;
    if out.len() < byte_count {
        return Err(PackedIntsError::InsufficientBytes {
            expected: byte_count,
            found: out.len(),
        });
    }
    let max = max_value(bits_per_value);
    if let Some(&value) = values.iter().find(|&&v| v > max) {
        return Err(PackedIntsError::ValueOutOfRange {
            value,
            bits_per_value,
        });
    }

    let value_unit = op.byte_value_count();
    let byte_unit = op.byte_block_count();
    let full = values.len() / value_unit;
    op.encode_bytes(values, out, full);
    let mut written = full * byte_unit;

    let rest = &values[full * value_unit..];
    if !rest.is_empty() {
        // zero-pad the trailing unit, keep only the bytes the footprint covers
        let mut tail = vec![0u64; value_unit];
        tail[..rest.len()].copy_from_slice(rest);
        let mut scratch = vec![0u8; byte_unit];
        op.encode_bytes(&tail, &mut scratch, 1);
        let n = (byte_count - written).min(byte_unit);
        out[written..written + n].copy_from_slice(&scratch[..n]);
        written += n;
    }
    out[written..byte_count].fill(0);
    Ok(byte_count)
}

/// Unpacks `value_count` values from a buffer produced by [`encode`] with
/// the same format, version and width.
pub fn decode(
    format: Format,
    version: i32,
    bits_per_value: u32,
    bytes: &[u8],
    value_count: usize,
) -> Result<Vec<u64>> {
    let mut values = vec![0u64; value_count];
    decode_into(format, version, bits_per_value, bytes, &mut values)?;
    Ok(values)
}

/// Unpacks `values.len()` values from `bytes` into `values`.
pub fn decode_into(
    format: Format,
    version: i32,
    bits_per_value: u32,
    bytes: &[u8],
    values: &mut [u64],
) -> Result<()> {
    let version = check_version(version)?;
    let op = BulkOperation::of(format, bits_per_value)?;
    let byte_count = format.byte_count(version, values.len(), bits_per_value) as usize;
    if bytes.len() < byte_count {
        return Err(PackedIntsError::InsufficientBytes {
            expected: byte_count,
            found: bytes.len(),
        });
    }

    let value_unit = op.byte_value_count();
    let byte_unit = op.byte_block_count();
    let full = values.len() / value_unit;
    op.decode_bytes(bytes, values, full);

    let consumed = full * byte_unit;
    let rest = values.len() - full * value_unit;
    if rest > 0 {
        let available = (byte_count - consumed).min(byte_unit);
        let mut scratch = vec![0u8; byte_unit];
        scratch[..available].copy_from_slice(&bytes[consumed..consumed + available]);
        let mut tail = vec![0u64; value_unit];
        op.decode_bytes(&scratch, &mut tail, 1);
        values[full * value_unit..].copy_from_slice(&tail[..rest]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit_ops;
    use crate::version::Version;

    const CURRENT: i32 = Version::CURRENT.id();

    #[test]
    fn factories_check_version_first() {
        assert!(matches!(
            get_encoder(Format::Packed, 2, 0),
            Err(PackedIntsError::InvalidVersion { .. })
        ));
        assert!(matches!(
            get_decoder(Format::PackedSingleBlock, -1, 11),
            Err(PackedIntsError::InvalidVersion { .. })
        ));
        assert!(matches!(
            get_decoder(Format::PackedSingleBlock, CURRENT, 11),
            Err(PackedIntsError::InvalidBitsPerValue { .. })
        ));
    }

    #[test]
    fn decoder_reports_byte_value_count() {
        let dec = get_decoder(Format::Packed, CURRENT, 3).unwrap();
        assert_eq!(dec.byte_value_count(), 8);
        assert_eq!(dec.byte_block_count(), 3);
        let dec = get_decoder(Format::PackedSingleBlock, CURRENT, 21).unwrap();
        assert_eq!(dec.byte_value_count(), 3);
        assert_eq!(dec.format(), Format::PackedSingleBlock);
        assert_eq!(dec.bits_per_value(), 21);
    }

    #[test]
    fn encode_scenario_sizes() {
        let values = [1u64, 2, 3, 4, 5];
        assert_eq!(encode(Format::Packed, 1, 3, &values).unwrap().len(), 2);
        assert_eq!(encode(Format::Packed, 0, 3, &values).unwrap().len(), 8);
        let seven = [7u64; 7];
        assert_eq!(encode(Format::PackedSingleBlock, 1, 21, &seven).unwrap().len(), 24);
    }

    #[test]
    fn start_version_pads_with_zero_words() {
        let values = [0xFFu64; 3];
        let bytes = encode(Format::Packed, 0, 8, &values).unwrap();
        assert_eq!(bytes, [0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 0]);
        assert_eq!(decode(Format::Packed, 0, 8, &bytes, 3).unwrap(), values);
    }

    #[test]
    fn matches_reference_codec() {
        for (format, widths) in [
            (Format::Packed, (1..=64).collect::<Vec<u32>>()),
            (Format::PackedSingleBlock, crate::format::SINGLE_BLOCK_BITS.to_vec()),
        ] {
            for bpv in widths {
                let values: Vec<u64> = (0..77u64)
                    .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15) & max_value(bpv))
                    .collect();
                let bytes = encode(format, CURRENT, bpv, &values).unwrap();
                let mut reference = vec![0u8; bytes.len()];
                bit_ops::encode(format, bpv, &values, &mut reference);
                assert_eq!(bytes, reference, "{format:?} bpv={bpv}");
                assert_eq!(decode(format, CURRENT, bpv, &bytes, values.len()).unwrap(), values);
            }
        }
    }

    #[test]
    fn value_out_of_range_is_rejected() {
        assert_eq!(
            encode(Format::Packed, CURRENT, 4, &[3, 16]),
            Err(PackedIntsError::ValueOutOfRange {
                value: 16,
                bits_per_value: 4
            })
        );
    }

    #[test]
    fn encode_into_leaves_trailing_bytes() {
        let mut out = [0xAAu8; 4];
        let n = encode_into(Format::Packed, CURRENT, 4, &[1, 2, 3], &mut out).unwrap();
        assert_eq!(n, 2);
        assert_eq!(out, [0x12, 0x30, 0xAA, 0xAA]);
    }

    #[test]
    fn short_buffers_are_rejected() {
        assert_eq!(
            decode(Format::Packed, CURRENT, 12, &[0u8; 2], 2),
            Err(PackedIntsError::InsufficientBytes {
                expected: 3,
                found: 2
            })
        );
        let mut out = [0u8; 1];
        assert!(matches!(
            encode_into(Format::Packed, CURRENT, 12, &[1, 2], &mut out),
            Err(PackedIntsError::InsufficientBytes { .. })
        ));
    }

    #[test]
    fn empty_sequences() {
        assert!(encode(Format::Packed, CURRENT, 17, &[]).unwrap().is_empty());
        assert!(decode(Format::PackedSingleBlock, 0, 5, &[], 0).unwrap().is_empty());
    }

    #[test]
    fn iterations_respect_budget() {
        let op = BulkOperation::of(Format::Packed, 3).unwrap();
        // 3 bytes + 8 * 8 bytes of values per iteration
        assert_eq!(op.compute_iterations(1_000_000, 670), 10);
        assert_eq!(op.compute_iterations(20, 670), 3);
        assert_eq!(op.compute_iterations(20, 10), 1);
    }
}
