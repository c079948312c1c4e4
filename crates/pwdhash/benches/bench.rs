use core::hint::black_box;
use core::time::Duration;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use pwdhash::{
    Entry, EntryStore, HashService, PoolConfig, ServiceConfig, WorkerPool, digest, handler_fn,
};
use std::{sync::Barrier, thread::scope, time::Instant};
use tokio::runtime::Builder;

// Number of operations per benchmark iteration (per-thread for multi-threaded).
const TOTAL_OPS: usize = 4096;

/// Benchmarks the digest over inputs of increasing length.
fn bench_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");
    for len in [8, 64, 1024] {
        let input = "x".repeat(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_function(format!("bytes/{len}"), |b| {
            b.iter(|| black_box(digest(black_box(&input))));
        });
    }
    group.finish();
}

/// Benchmarks put/attach/get round trips from many threads on one store.
fn bench_store_contended(c: &mut Criterion) {
    let num_threads = num_cpus::get();
    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Elements((TOTAL_OPS * num_threads) as u64));

    group.bench_function(format!("threads/{num_threads}/elems/{TOTAL_OPS}"), |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;
            for _ in 0..iters {
                let store = EntryStore::new(64);
                let barrier = Barrier::new(num_threads + 1);
                let start = scope(|s| {
                    for t in 0..num_threads {
                        let store = &store;
                        let barrier = &barrier;
                        s.spawn(move || {
                            barrier.wait();
                            for i in 0..TOTAL_OPS {
                                let id = (t * TOTAL_OPS + i + 1) as u64;
                                store.put(id, Entry::new("bench"));
                                store.attach_digest(id, String::from("digest"));
                                black_box(store.get(id));
                            }
                        });
                    }
                    barrier.wait();
                    Instant::now()
                });
                total += start.elapsed();
            }
            total
        });
    });
    group.finish();
}

/// Benchmarks raw pool throughput with a no-op handler.
fn bench_pool(c: &mut Criterion) {
    let rt = Builder::new_multi_thread().enable_all().build().unwrap();
    let num_workers = num_cpus::get();
    let mut group = c.benchmark_group("pool");
    group.throughput(Throughput::Elements(TOTAL_OPS as u64));

    group.bench_function(format!("workers/{num_workers}/jobs/{TOTAL_OPS}"), |b| {
        b.to_async(&rt).iter(|| async {
            let pool = WorkerPool::new(
                PoolConfig {
                    num_workers,
                    queue_capacity: 256,
                },
                handler_fn(|id| async move {
                    black_box(id);
                }),
            )
            .unwrap();
            pool.start().await;
            for id in 1..=TOTAL_OPS as u64 {
                pool.add_job(id).await.unwrap();
            }
            pool.stop().await.unwrap();
        });
    });
    group.finish();
}

/// Benchmarks end-to-end submissions with no artificial delay.
fn bench_service(c: &mut Criterion) {
    let rt = Builder::new_multi_thread().enable_all().build().unwrap();
    let mut group = c.benchmark_group("service");
    group.throughput(Throughput::Elements(TOTAL_OPS as u64));

    group.bench_function(format!("submit/{TOTAL_OPS}"), |b| {
        b.to_async(&rt).iter(|| async {
            let service = HashService::start(ServiceConfig {
                num_workers: num_cpus::get(),
                queue_capacity: 1024,
                max_input_len: 64,
                job_delay: Duration::ZERO,
            })
            .await
            .unwrap();
            for i in 0..TOTAL_OPS {
                black_box(service.submit(&i.to_string()).await.unwrap());
            }
            service.shutdown().await.unwrap();
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_digest,
    bench_store_contended,
    bench_pool,
    bench_service
);
criterion_main!(benches);
