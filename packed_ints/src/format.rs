//! Bit layouts and the footprint arithmetic shared by every codec path.

use crate::error::{PackedIntsError, Result};
use crate::version::Version;

/// Smallest footprint, no padding at all.
pub const COMPACT: f32 = 0.0;
/// At most 25% memory overhead.
pub const DEFAULT: f32 = 0.25;
/// At most 50% memory overhead.
pub const FAST: f32 = 0.5;
/// Any width that gives the fastest random access.
pub const FASTEST: f32 = 7.0;

/// Widths accepted by [`Format::PackedSingleBlock`], ascending.
pub const SINGLE_BLOCK_BITS: [u32; 14] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 16, 21, 32];

/// How values are laid out in 64-bit blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Bit-continuous stream; a value may straddle two blocks.
    Packed,
    /// Whole values per block, high bits of a block left as padding.
    PackedSingleBlock,
}

impl Format {
    /// Reads a persisted format id.
    pub fn from_id(id: i32) -> Result<Format> {
        match id {
            0 => Ok(Format::Packed),
            1 => Ok(Format::PackedSingleBlock),
            _ => Err(PackedIntsError::InvalidFormat(id)),
        }
    }

    pub const fn id(self) -> i32 {
        match self {
            Format::Packed => 0,
            Format::PackedSingleBlock => 1,
        }
    }

    /// Number of bytes needed to store `value_count` values of
    /// `bits_per_value` bits each under `version`.
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_ints::{Format, Version};
    ///
    /// assert_eq!(Format::Packed.byte_count(Version::ByteAligned, 5, 3), 2);
    /// assert_eq!(Format::Packed.byte_count(Version::Start, 5, 3), 8);
    /// assert_eq!(Format::PackedSingleBlock.byte_count(Version::CURRENT, 7, 21), 24);
    /// ```
    pub fn byte_count(self, version: Version, value_count: usize, bits_per_value: u32) -> u64 {
        debug_assert!((1..=64).contains(&bits_per_value));
        match self {
            Format::Packed => {
                let bits = value_count as u64 * u64::from(bits_per_value);
                if version < Version::ByteAligned {
                    8 * bits.div_ceil(64)
                } else {
                    bits.div_ceil(8)
                }
            }
            // block aligned whatever the version
            Format::PackedSingleBlock => 8 * self.long_count(version, value_count, bits_per_value) as u64,
        }
    }

    /// Number of 64-bit blocks needed to hold the same values.
    pub fn long_count(self, version: Version, value_count: usize, bits_per_value: u32) -> usize {
        debug_assert!((1..=64).contains(&bits_per_value));
        match self {
            Format::Packed => {
                self.byte_count(version, value_count, bits_per_value).div_ceil(8) as usize
            }
            Format::PackedSingleBlock => {
                let values_per_block = (64 / bits_per_value) as usize;
                value_count.div_ceil(values_per_block)
            }
        }
    }

    pub fn is_supported(self, bits_per_value: u32) -> bool {
        match self {
            Format::Packed => (1..=64).contains(&bits_per_value),
            Format::PackedSingleBlock => SINGLE_BLOCK_BITS.binary_search(&bits_per_value).is_ok(),
        }
    }

    /// Fails with `InvalidBitsPerValue` unless the width is supported.
    pub fn check_bits_per_value(self, bits_per_value: u32) -> Result<()> {
        if self.is_supported(bits_per_value) {
            Ok(())
        } else {
            Err(PackedIntsError::InvalidBitsPerValue {
                format: self,
                bits_per_value,
            })
        }
    }

    /// Padding bits spent per value.
    pub fn overhead_per_value(self, bits_per_value: u32) -> f32 {
        debug_assert!(self.is_supported(bits_per_value));
        match self {
            Format::Packed => 0.0,
            Format::PackedSingleBlock => {
                let values_per_block = 64 / bits_per_value;
                let overhead = 64 % bits_per_value;
                overhead as f32 / values_per_block as f32
            }
        }
    }

    /// `overhead_per_value / bits_per_value`.
    pub fn overhead_ratio(self, bits_per_value: u32) -> f32 {
        self.overhead_per_value(bits_per_value) / bits_per_value as f32
    }
}

/// A format and width chosen for a requested width and overhead budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatAndBits {
    pub format: Format,
    pub bits_per_value: u32,
}

impl FormatAndBits {
    /// Finds the fastest-to-access layout able to hold `bits_per_value`-bit
    /// values while wasting at most `acceptable_overhead_ratio` extra bits
    /// per value bit.
    ///
    /// The ratio is clamped to [`COMPACT`]..=[`FASTEST`].
    ///
    /// # Examples
    ///
    /// ```
    /// use packed_ints::{Format, FormatAndBits, COMPACT, FAST};
    ///
    /// let exact = FormatAndBits::fastest(9, COMPACT);
    /// assert_eq!((exact.format, exact.bits_per_value), (Format::Packed, 9));
    ///
    /// let padded = FormatAndBits::fastest(7, FAST);
    /// assert_eq!((padded.format, padded.bits_per_value), (Format::Packed, 8));
    /// ```
    pub fn fastest(bits_per_value: u32, acceptable_overhead_ratio: f32) -> FormatAndBits {
        debug_assert!((1..=64).contains(&bits_per_value));
        let ratio = acceptable_overhead_ratio.clamp(COMPACT, FASTEST);
        let acceptable_overhead_per_value = ratio * bits_per_value as f32;
        let max_bits_per_value = bits_per_value + acceptable_overhead_per_value as u32;

        let aligned = [8, 16, 32, 64]
            .into_iter()
            .find(|&width| bits_per_value <= width && max_bits_per_value >= width);
        if let Some(width) = aligned {
            return FormatAndBits {
                format: Format::Packed,
                bits_per_value: width,
            };
        }

        for bpv in bits_per_value..=max_bits_per_value.min(64) {
            if Format::PackedSingleBlock.is_supported(bpv) {
                let overhead = Format::PackedSingleBlock.overhead_per_value(bpv);
                let acceptable =
                    acceptable_overhead_per_value + bits_per_value as f32 - bpv as f32;
                if overhead <= acceptable {
                    return FormatAndBits {
                        format: Format::PackedSingleBlock,
                        bits_per_value: bpv,
                    };
                }
            }
        }

        FormatAndBits {
            format: Format::Packed,
            bits_per_value,
        }
    }
}

/// Largest value representable in `bits_per_value` bits.
#[inline]
pub const fn max_value(bits_per_value: u32) -> u64 {
    if bits_per_value >= 64 {
        u64::MAX
    } else {
        (1u64 << bits_per_value) - 1
    }
}

/// Minimal width able to hold `value`; at least 1.
///
/// ```
/// use packed_ints::bits_required;
///
/// assert_eq!(bits_required(0), 1);
/// assert_eq!(bits_required(500), 9);
/// assert_eq!(bits_required(u64::MAX), 64);
/// ```
#[inline]
pub const fn bits_required(value: u64) -> u32 {
    if value == 0 { 1 } else { 64 - value.leading_zeros() }
}
