//! Property-based tests for the packed-ints codec.

use proptest::prelude::*;

use packed_ints::bit_ops;
use packed_ints::{
    Format, FormatAndBits, GrowableWriter, Mutable, Reader, SINGLE_BLOCK_BITS, Version, decode,
    encode, get_mutable, get_reader, max_value,
};

//
// -----------------------------------------------------------------------------
// Helper Functions
// -----------------------------------------------------------------------------

/// A width and a sequence of values fitting in it.
fn width_and_values(format: Format) -> impl Strategy<Value = (u32, Vec<u64>)> {
    let widths: Vec<u32> = match format {
        Format::Packed => (1..=64).collect(),
        Format::PackedSingleBlock => SINGLE_BLOCK_BITS.to_vec(),
    };
    prop::sample::select(widths).prop_flat_map(|bpv| {
        (
            Just(bpv),
            prop::collection::vec(0..=max_value(bpv), 0..300),
        )
    })
}

fn any_format() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Packed), Just(Format::PackedSingleBlock)]
}

fn any_version() -> impl Strategy<Value = Version> {
    prop_oneof![Just(Version::Start), Just(Version::ByteAligned)]
}

//
// -----------------------------------------------------------------------------
// Footprint Properties
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_byte_aligned_never_larger(n in 0usize..100_000, bpv in 1u32..=64) {
        prop_assert!(
            Format::Packed.byte_count(Version::ByteAligned, n, bpv)
                <= Format::Packed.byte_count(Version::Start, n, bpv)
        );
        prop_assert_eq!(Format::Packed.byte_count(Version::Start, n, 64), 8 * n as u64);
    }
}

proptest! {
    #[test]
    fn prop_byte_count_monotonic(
        version in any_version(),
        n in 0usize..100_000,
        bpv in 1u32..64,
    ) {
        let packed = |n, bpv| Format::Packed.byte_count(version, n, bpv);
        prop_assert!(packed(n, bpv) <= packed(n + 1, bpv));
        prop_assert!(packed(n, bpv) <= packed(n, bpv + 1));
    }
}

proptest! {
    #[test]
    fn prop_single_block_footprint_holds_values(
        version in any_version(),
        n in 0usize..100_000,
        bpv in prop::sample::select(SINGLE_BLOCK_BITS.to_vec()),
    ) {
        let bytes = Format::PackedSingleBlock.byte_count(version, n, bpv);
        prop_assert_eq!(bytes % 8, 0);
        let capacity = bytes / 8 * u64::from(64 / bpv);
        prop_assert!(capacity >= n as u64);
        // one block less would not do
        prop_assert!(capacity < n as u64 + u64::from(64 / bpv));
    }
}

proptest! {
    #[test]
    fn prop_fastest_never_narrows(bpv in 1u32..=64, ratio in 0.0f32..8.0) {
        let chosen = FormatAndBits::fastest(bpv, ratio);
        prop_assert!(chosen.bits_per_value >= bpv);
        prop_assert!(chosen.format.is_supported(chosen.bits_per_value));
    }
}

//
// -----------------------------------------------------------------------------
// Codec Properties
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_packed_roundtrip(
        version in any_version(),
        (bpv, values) in width_and_values(Format::Packed),
    ) {
        let bytes = encode(Format::Packed, version.id(), bpv, &values).unwrap();
        prop_assert_eq!(
            bytes.len() as u64,
            Format::Packed.byte_count(version, values.len(), bpv)
        );
        let back = decode(Format::Packed, version.id(), bpv, &bytes, values.len()).unwrap();
        prop_assert_eq!(back, values);
    }
}

proptest! {
    #[test]
    fn prop_single_block_roundtrip(
        version in any_version(),
        (bpv, values) in width_and_values(Format::PackedSingleBlock),
    ) {
        let bytes = encode(Format::PackedSingleBlock, version.id(), bpv, &values).unwrap();
        let back =
            decode(Format::PackedSingleBlock, version.id(), bpv, &bytes, values.len()).unwrap();
        prop_assert_eq!(back, values);
    }
}

proptest! {
    #[test]
    fn prop_kernels_match_reference(
        format in any_format(),
        seed in any::<u64>(),
        n in 0usize..200,
    ) {
        let widths: Vec<u32> = match format {
            Format::Packed => (1..=64).collect(),
            Format::PackedSingleBlock => SINGLE_BLOCK_BITS.to_vec(),
        };
        for bpv in widths {
            let values: Vec<u64> = (0..n as u64)
                .map(|i| seed.rotate_left(i as u32).wrapping_mul(i + 1) & max_value(bpv))
                .collect();
            let bytes = encode(format, Version::CURRENT.id(), bpv, &values).unwrap();

            let mut reference = vec![0u8; bytes.len()];
            bit_ops::encode(format, bpv, &values, &mut reference);
            prop_assert_eq!(&bytes, &reference);

            let mut decoded = vec![0u64; n];
            bit_ops::decode(format, bpv, &bytes, &mut decoded);
            prop_assert_eq!(decoded, values);
        }
    }
}

//
// -----------------------------------------------------------------------------
// Reader / Mutable Properties
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_mutable_bytes_equal_encode(
        format in any_format(),
        version in any_version(),
        input in any_format().prop_flat_map(width_and_values),
    ) {
        let (bpv, values) = input;
        prop_assume!(format.is_supported(bpv));
        let mut m = get_mutable(values.len(), bpv, format).unwrap();
        for (i, &v) in values.iter().enumerate() {
            m.set(i, v).unwrap();
        }
        let bytes = m.to_bytes(version.id()).unwrap();
        prop_assert_eq!(&bytes, &encode(format, version.id(), bpv, &values).unwrap());

        let back = get_reader(format, version.id(), values.len(), bpv, &bytes).unwrap();
        prop_assert_eq!(back.iter().collect::<Vec<_>>(), values);
    }
}

proptest! {
    #[test]
    fn prop_set_touches_one_slot(
        (bpv, values) in width_and_values(Format::Packed),
        index in any::<prop::sample::Index>(),
        new_val in any::<u64>(),
    ) {
        prop_assume!(!values.is_empty());
        let mut m = get_mutable(values.len(), bpv, Format::Packed).unwrap();
        m.bulk_set(0, &values).unwrap();

        let idx = index.index(values.len());
        let new_val = new_val & max_value(bpv);
        m.set(idx, new_val).unwrap();

        for (i, &expected) in values.iter().enumerate() {
            let want = if i == idx { new_val } else { expected };
            prop_assert_eq!(m.get(i).unwrap(), want);
        }
    }
}

//
// -----------------------------------------------------------------------------
// Growable Writer Properties
// -----------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_growable_keeps_prior_values(n in 1usize..200, ks in prop::collection::vec(0u32..64, 1..40)) {
        let mut w = GrowableWriter::new(1, n).unwrap();
        let mut expected = vec![0u64; n];
        let mut width = w.bits_per_value();

        for (step, k) in ks.into_iter().enumerate() {
            let index = (step * 7) % n;
            let value = 1u64 << k;
            w.set(index, value).unwrap();
            expected[index] = value;

            prop_assert!(w.bits_per_value() >= width);
            width = w.bits_per_value();
            prop_assert_eq!(w.iter().collect::<Vec<_>>(), expected.clone());
        }
    }
}
