use criterion::{black_box, criterion_group, criterion_main, Criterion};
use memokit::{Buffer, ObjectPool};
use std::thread;

fn bench_buffer_checkout(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_checkout");

    // Baseline: a fresh 1 KiB buffer per operation.
    group.bench_function("fresh_buffer", |b| {
        b.iter(|| {
            let mut buf = Buffer::new();
            buf.append(black_box(b"hello"));
            black_box(buf.len())
        });
    });

    group.bench_function("pooled_buffer", |b| {
        let pool: ObjectPool<Buffer> = ObjectPool::default();
        b.iter(|| {
            let mut buf = pool.get();
            buf.append(black_box(b"hello"));
            black_box(buf.len())
        });
    });

    group.finish();
}

fn bench_contended_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_contended");
    const THREADS: usize = 4;
    const OPS: usize = 1000;

    group.bench_function("fresh_vec", |b| {
        b.iter(|| {
            thread::scope(|s| {
                for _ in 0..THREADS {
                    s.spawn(|| {
                        for i in 0..OPS {
                            let mut v: Vec<u8> = Vec::with_capacity(1024);
                            v.push(i as u8);
                            black_box(&v);
                        }
                    });
                }
            });
        });
    });

    group.bench_function("pooled_vec", |b| {
        let pool = ObjectPool::new(|| Vec::<u8>::with_capacity(1024));
        b.iter(|| {
            thread::scope(|s| {
                for _ in 0..THREADS {
                    s.spawn(|| {
                        for i in 0..OPS {
                            let mut v = pool.get();
                            v.push(i as u8);
                            black_box(&*v);
                        }
                    });
                }
            });
        });
    });

    group.finish();
}

criterion_group!(benches, bench_buffer_checkout, bench_contended_pool);
criterion_main!(benches);
