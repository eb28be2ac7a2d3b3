use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use getrandom::fill;
use sealkit_codec::prelude::*;

fn bench_encrypt_decrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_decrypt");
    group.sample_size(10);

    let codec = Codec::builder().build().unwrap();
    let sizes = [("256B", 256usize), ("64KB", 64 * 1024), ("1MB", 1024 * 1024)];

    for (label, size) in sizes {
        let mut data = vec![0u8; size];
        fill(&mut data).expect("System RNG unavailable for benchmark data");

        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("seal", label), &data, |b, d| {
            b.iter(|| codec.seal(d, b"bench-password").unwrap());
        });

        let sealed = codec.seal(&data, b"bench-password").expect("seal failed");

        group.bench_with_input(BenchmarkId::new("open", label), &sealed, |b, s| {
            b.iter(|| codec.open(s, b"bench-password").unwrap());
        });
    }

    group.finish();
}

fn bench_key_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_key");
    group.sample_size(10);

    for iterations in [10_000u32, 100_000, 600_000] {
        group.bench_with_input(BenchmarkId::from_parameter(iterations), &iterations, |b, &n| {
            b.iter(|| sealkit_codec::derive_key(b"bench-password", [0u8; 16], n, 256).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encrypt_decrypt, bench_key_derivation);
criterion_main!(benches);
