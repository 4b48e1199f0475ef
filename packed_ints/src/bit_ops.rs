//! Bit-at-a-time codec over the persisted byte stream.
//!
//! Slow but hopefully obviously correct: every layout is described only by
//! where the most significant bit of each value lands in a big-endian bit
//! stream. The specialised kernels in `bulk` are checked against it.

use crate::format::{Format, max_value};

/// Writes the low `bit_width` bits of `value` at stream position
/// `bit_offset`, most significant bit first.
pub fn set_bits(slice: &mut [u8], bit_offset: usize, bit_width: u32, value: u64) {
    let masked = value & max_value(bit_width);

    for i in 0..bit_width as usize {
        let bit = (masked >> (bit_width as usize - 1 - i)) & 1;
        let pos = bit_offset + i;
        let byte = pos / 8;
        let bit_in_byte = 7 - pos % 8;

        if bit == 1 {
            slice[byte] |= 1 << bit_in_byte;
        } else {
            slice[byte] &= !(1 << bit_in_byte);
        }
    }
}

/// Reads `bit_width` bits starting at stream position `bit_offset`.
pub fn get_bits(slice: &[u8], bit_offset: usize, bit_width: u32) -> u64 {
    let mut value = 0u64;

    for i in 0..bit_width as usize {
        let pos = bit_offset + i;
        let bit = (slice[pos / 8] >> (7 - pos % 8)) & 1;
        value = (value << 1) | u64::from(bit);
    }

    value
}

/// Stream position of the most significant bit of value `index`.
pub fn value_bit_offset(format: Format, bits_per_value: u32, index: usize) -> usize {
    let bpv = bits_per_value as usize;
    match format {
        Format::Packed => index * bpv,
        Format::PackedSingleBlock => {
            let values_per_block = 64 / bpv;
            let block = index / values_per_block;
            let slot = index % values_per_block;
            // slot 0 sits in the low bits, blocks are stored big-endian
            block * 64 + 64 - (slot + 1) * bpv
        }
    }
}

/// Packs `values` into `out`, which must already be zeroed and large
/// enough.
pub fn encode(format: Format, bits_per_value: u32, values: &[u64], out: &mut [u8]) {
    for (i, &v) in values.iter().enumerate() {
        set_bits(out, value_bit_offset(format, bits_per_value, i), bits_per_value, v);
    }
}

/// Unpacks `values.len()` values from `bytes`.
pub fn decode(format: Format, bits_per_value: u32, bytes: &[u8], values: &mut [u64]) {
    for (i, v) in values.iter_mut().enumerate() {
        *v = get_bits(bytes, value_bit_offset(format, bits_per_value, i), bits_per_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_bits() {
        let mut buf = [0u8; 8];
        set_bits(&mut buf, 3, 5, 0b10101);
        assert_eq!(get_bits(&buf, 3, 5), 0b10101);
        assert_eq!(buf[0], 0b0001_0101);
    }

    #[test]
    fn full_width_values() {
        let mut buf = [0u8; 16];
        set_bits(&mut buf, 64, 64, u64::MAX - 1);
        assert_eq!(get_bits(&buf, 64, 64), u64::MAX - 1);
        assert_eq!(&buf[..8], &[0u8; 8]);
    }

    #[test]
    fn packed_stream_is_msb_first() {
        let mut buf = [0u8; 2];
        encode(Format::Packed, 3, &[0b101, 0b011, 0b110, 0b001, 0b111], &mut buf);
        assert_eq!(buf, [0b1010_1111, 0b0001_1110]);
    }

    #[test]
    fn single_block_fills_from_low_bits() {
        let mut buf = [0u8; 8];
        encode(Format::PackedSingleBlock, 21, &[1, 2, 3], &mut buf);
        let block = u64::from_be_bytes(buf);
        assert_eq!(block, 1 | (2 << 21) | (3 << 42));
        let mut back = [0u64; 3];
        decode(Format::PackedSingleBlock, 21, &buf, &mut back);
        assert_eq!(back, [1, 2, 3]);
    }
}
