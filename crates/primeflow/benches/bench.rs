use core::hint::black_box;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use primeflow::{Config, Context, Factorizer, Sink, factorize};
use std::{io, thread, time::Duration};

/// Discards output.
struct NullSink;

impl Sink for NullSink {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        black_box(buf);
        Ok(())
    }
}

/// Simulates a slow downstream consumer (network, disk).
struct SlowSink(Duration);

impl Sink for SlowSink {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        thread::sleep(self.0);
        black_box(buf);
        Ok(())
    }
}

fn factorizer(factorization_workers: isize, write_workers: isize) -> Factorizer {
    Config::default()
        .with_factorization_workers(factorization_workers)
        .with_write_workers(write_workers)
        .build()
        .expect("valid worker counts")
}

fn bench_factorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("factorize");

    for n in [1_000_003_isize, 1 << 30, 2_147_483_647, isize::MIN] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| factorize(black_box(n)));
        });
    }

    group.finish();
}

/// Per-call overhead of spawning and joining the pools on a tiny batch.
fn bench_small_batch(c: &mut Criterion) {
    let numbers: Vec<isize> = (0..10).collect();
    let ctx = Context::background();
    let cpus = num_cpus::get() as isize;

    let mut group = c.benchmark_group("small_batch");
    group.throughput(Throughput::Elements(numbers.len() as u64));

    for (name, f) in [
        ("default", Factorizer::try_default().expect("default config")),
        ("single", factorizer(1, 1)),
        ("cpus", factorizer(cpus, cpus)),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| f.factorize(&ctx, black_box(&numbers), &NullSink).unwrap());
        });
    }

    group.finish();
}

/// With a sink that sleeps, wall time should scale with the write pool size.
fn bench_slow_sink(c: &mut Criterion) {
    let numbers: Vec<isize> = (0..100).collect();
    let ctx = Context::background();
    let sink = SlowSink(Duration::from_millis(1));

    let mut group = c.benchmark_group("slow_sink");
    group.sample_size(10);
    group.throughput(Throughput::Elements(numbers.len() as u64));

    for write_workers in [1, 4, 16] {
        let f = factorizer(2, write_workers);
        group.bench_with_input(
            BenchmarkId::new("write_workers", write_workers),
            &f,
            |b, f| {
                b.iter(|| f.factorize(&ctx, black_box(&numbers), &sink).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_factorize, bench_small_batch, bench_slow_sink);
criterion_main!(benches);
