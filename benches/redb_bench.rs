//! Benchmarks for the Redb storage backend.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use statekv::backends::RedbStore;
use statekv::{Cursor, Store};

/// Benchmark single key-value writes.
fn bench_put_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("redb_put_single");
    group.throughput(Throughput::Elements(1));

    group.bench_function("put_single", |b| {
        b.iter_batched(
            || RedbStore::in_memory().unwrap(),
            |store| {
                store.put(b"key", b"value").unwrap();
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Benchmark sequences of writes.
fn bench_put_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("redb_put_many");

    for size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(size));
        group.bench_function(format!("put_many_{size}"), |b| {
            b.iter_batched(
                || RedbStore::in_memory().unwrap(),
                |store| {
                    for i in 0..size {
                        let key = format!("key:{i:05}");
                        let value = format!("value:{i:05}");
                        store.put(key.as_bytes(), value.as_bytes()).unwrap();
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark single key reads.
fn bench_get_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("redb_get_single");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_single", |b| {
        b.iter_batched(
            || {
                let store = RedbStore::in_memory().unwrap();
                store.put(b"key", b"value").unwrap();
                store
            },
            |store| {
                let _ = black_box(store.get(b"key").unwrap());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Benchmark random reads from a populated store.
fn bench_get_random(c: &mut Criterion) {
    const NUM_KEYS: u64 = 10000;
    let mut group = c.benchmark_group("redb_get_random");
    group.throughput(Throughput::Elements(100));

    group.bench_function("get_random_100", |b| {
        b.iter_batched(
            || {
                let store = RedbStore::in_memory().unwrap();
                for i in 0..NUM_KEYS {
                    let key = format!("key:{i:05}");
                    let value = format!("value:{i:05}");
                    store.put(key.as_bytes(), value.as_bytes()).unwrap();
                }
                store
            },
            |store| {
                for i in (0..100).map(|x| x * 97 % NUM_KEYS) {
                    let key = format!("key:{i:05}");
                    let _ = black_box(store.get(key.as_bytes()).unwrap());
                }
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Benchmark cursor iteration.
fn bench_cursor_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("redb_cursor_iterate");

    for size in [100, 1000, 10000] {
        group.throughput(Throughput::Elements(size));
        group.bench_function(format!("cursor_iterate_{size}"), |b| {
            b.iter_batched(
                || {
                    let store = RedbStore::in_memory().unwrap();
                    for i in 0..size {
                        let key = format!("key:{i:05}");
                        let value = format!("value:{i:05}");
                        store.put(key.as_bytes(), value.as_bytes()).unwrap();
                    }
                    store
                },
                |store| {
                    let mut cur = store.cursor().unwrap();
                    let mut count = 0u64;
                    while cur.next().unwrap() {
                        count += 1;
                    }
                    black_box(count);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_put_single,
    bench_put_many,
    bench_get_single,
    bench_get_random,
    bench_cursor_iterate,
);

criterion_main!(benches);
