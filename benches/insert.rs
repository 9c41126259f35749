//! Single-owner engine benchmarks.
//!
//! # Scenarios
//!
//! 1. **By Size**: insert latency as the table grows (cache effects)
//! 2. **By Load**: insert latency on a pre-filled table; kick chains get
//!    longer as the load factor rises
//! 3. **Lookup**: hit and miss latency
//! 4. **Delete**: insert/delete pairs
//! 5. **Saturation**: cost of a rejected insert, rollback included
use cuckoocraft::{CuckooFilter, FilterConfig, Operation, Status};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

mod common;
use common::*;

fn bench_insert_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_by_size");

    for &m in TABLE_SIZES {
        let items = generate_strings(m * 2, 32);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(m), &m, |b, &m| {
            b.iter_batched(
                || CuckooFilter::new(m, 4, 16).unwrap(),
                |mut filter| {
                    for item in &items {
                        black_box(filter.insert(item.as_str()));
                    }
                    filter
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_insert_by_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_by_load");
    let m = 1 << 14;

    for &load in LOAD_FACTORS {
        let fill = (m as f64 * 4.0 * load) as usize;
        let items = generate_sequential_strings(fill);
        let mut base = CuckooFilter::new(m, 4, 16).unwrap();
        base.apply_batch(Operation::Insert, &items);

        let probes = generate_strings(256, 32);

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(load), &load, |b, _| {
            b.iter_batched(
                || base.clone(),
                |mut filter| {
                    for probe in &probes {
                        black_box(filter.insert(probe.as_str()));
                    }
                    filter
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let m = 1 << 16;
    let items = generate_sequential_strings(m * 3);
    let mut filter = CuckooFilter::new(m, 4, 16).unwrap();
    filter.apply_batch(Operation::Insert, &items);
    let misses = generate_strings(1024, 32);

    group.throughput(Throughput::Elements(1));
    group.bench_function("hit", |b| {
        let mut idx = 0;
        b.iter(|| {
            let status = filter.lookup(black_box(items[idx % items.len()].as_str()));
            idx += 1;
            status
        });
    });
    group.bench_function("miss", |b| {
        let mut idx = 0;
        b.iter(|| {
            let status = filter.lookup(black_box(misses[idx % misses.len()].as_str()));
            idx += 1;
            status
        });
    });

    group.finish();
}

fn bench_insert_delete_pair(c: &mut Criterion) {
    let mut filter = CuckooFilter::new(1 << 14, 4, 16).unwrap();
    filter.apply_batch(Operation::Insert, &generate_sequential_strings(1 << 15));
    let items = generate_strings(1024, 32);

    c.bench_function("insert_delete_pair", |b| {
        let mut idx = 0;
        b.iter(|| {
            let item = items[idx % items.len()].as_str();
            idx += 1;
            filter.insert(black_box(item));
            filter.delete(black_box(item))
        });
    });
}

fn bench_rejected_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rejected_insert");

    for max_kicks in [0u32, 50, 500] {
        let config = FilterConfig::new(256, 4, 16).with_max_kicks(max_kicks);
        let mut filter = CuckooFilter::with_config(config).unwrap();
        let mut i = 0u64;
        while filter.insert(&i.to_le_bytes()) != Status::CapacityExceeded {
            i += 1;
        }
        let probes = generate_strings(256, 16);

        group.bench_with_input(BenchmarkId::from_parameter(max_kicks), &max_kicks, |b, _| {
            let mut idx = 0;
            b.iter(|| {
                let status = filter.insert(black_box(probes[idx % probes.len()].as_str()));
                idx += 1;
                status
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_by_size,
    bench_insert_by_load,
    bench_lookup,
    bench_insert_delete_pair,
    bench_rejected_insert,
);

criterion_main!(benches);
