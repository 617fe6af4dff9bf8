#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use mapbin::MapVec;

const ELEMENTS: usize = 1 << 20; // 8 MiB of u64 payload

fn payload() -> MapVec<u64> {
    (0..ELEMENTS as u64).collect()
}

fn bench_write(c: &mut Criterion) {
    let mut value = payload();
    let size = mapbin::measure_size(&mut value).expect("measure") as usize;
    let mut buf = vec![0u8; size];

    let mut group = c.benchmark_group("write");
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("buffer", |b| {
        b.iter(|| {
            mapbin::write_into_buffer(black_box(&mut buf), &mut value).expect("write");
        });
    });
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut value = payload();
    let size = mapbin::measure_size(&mut value).expect("measure") as usize;
    let mut buf = vec![0u8; size];
    mapbin::write_into_buffer(&mut buf, &mut value).expect("write");

    let mut group = c.benchmark_group("read");
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("copy", |b| {
        b.iter(|| {
            let v: MapVec<u64> = mapbin::read_from_buffer(black_box(&buf)).expect("read");
            black_box(v.len());
        });
    });
    group.bench_function("map", |b| {
        let shared = std::sync::Arc::new(buf.clone());
        b.iter(|| {
            let (v, _storage): (MapVec<u64>, _) =
                mapbin::read_via_map(shared.clone()).expect("map read");
            black_box(v.len());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_write, bench_read);
criterion_main!(benches);
