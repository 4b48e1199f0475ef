// benches/bulk_decode.rs

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use packed_ints::{
    Format, GrowableWriter, Mutable, PackedMutable, Reader, Version, bit_ops, decode, encode,
    get_mutable, max_value,
};

const VALUE_COUNT: usize = 10_000;

fn values_for(bpv: u32) -> Vec<u64> {
    (0..VALUE_COUNT as u64)
        .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15) & max_value(bpv))
        .collect()
}

fn filled(format: Format, bpv: u32) -> PackedMutable {
    let mut m = get_mutable(VALUE_COUNT, bpv, format).unwrap();
    m.bulk_set(0, &values_for(bpv)).unwrap();
    m
}

fn bench_bulk_decode(c: &mut Criterion) {
    let widths = vec![1, 3, 8, 12, 21, 32, 47, 64];

    let mut group = c.benchmark_group("bulk_decode");
    for bpv in widths {
        let bytes = encode(Format::Packed, Version::CURRENT.id(), bpv, &values_for(bpv)).unwrap();

        group.bench_with_input(BenchmarkId::new("kernels", bpv), &bpv, |b, &bpv| {
            b.iter(|| {
                decode(
                    Format::Packed,
                    Version::CURRENT.id(),
                    bpv,
                    black_box(&bytes),
                    VALUE_COUNT,
                )
                .unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("bit_at_a_time", bpv), &bpv, |b, &bpv| {
            let mut out = vec![0u64; VALUE_COUNT];
            b.iter(|| bit_ops::decode(Format::Packed, bpv, black_box(&bytes), &mut out));
        });
    }
    group.finish();
}

fn bench_bulk_encode(c: &mut Criterion) {
    let widths = vec![1, 3, 8, 12, 21, 32, 47, 64];

    let mut group = c.benchmark_group("bulk_encode");
    for bpv in widths {
        let values = values_for(bpv);

        group.bench_with_input(BenchmarkId::from_parameter(bpv), &bpv, |b, &bpv| {
            b.iter(|| encode(Format::Packed, Version::CURRENT.id(), bpv, black_box(&values)).unwrap());
        });
    }
    group.finish();
}

fn bench_random_get(c: &mut Criterion) {
    let layouts = vec![
        (Format::Packed, 12),
        (Format::PackedSingleBlock, 12),
        (Format::Packed, 21),
        (Format::PackedSingleBlock, 21),
    ];

    let mut group = c.benchmark_group("random_get");
    for (format, bpv) in layouts {
        let m = filled(format, bpv);
        let id = format!("{format:?}/{bpv}");

        group.bench_with_input(BenchmarkId::new("get", &id), &m, |b, m| {
            b.iter(|| {
                let mut sum = 0u64;
                for i in (0..VALUE_COUNT).step_by(7) {
                    sum = sum.wrapping_add(black_box(m.get(i).unwrap()));
                }
                sum
            });
        });

        group.bench_with_input(BenchmarkId::new("bulk_get", &id), &m, |b, m| {
            let mut out = vec![0u64; VALUE_COUNT];
            b.iter(|| m.bulk_get(0, black_box(&mut out)).unwrap());
        });
    }
    group.finish();
}

fn bench_growable_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("growable_set");
    group.bench_function("doubling_values", |b| {
        b.iter(|| {
            let mut w = GrowableWriter::new(1, VALUE_COUNT).unwrap();
            for i in 0..VALUE_COUNT {
                w.set(i, black_box(i as u64)).unwrap();
            }
            w.bits_per_value()
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_bulk_decode,
    bench_bulk_encode,
    bench_random_get,
    bench_growable_set
);
criterion_main!(benches);
