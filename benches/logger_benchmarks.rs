//! Criterion benchmarks for logpipe

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use logpipe::prelude::*;
use std::sync::Arc;

struct NullAdapter;

impl Adapter for NullAdapter {
    fn init(&mut self, _config: &str) -> logpipe::Result<()> {
        Ok(())
    }
    fn write_msg(&self, text: &str, _level: Level) -> logpipe::Result<()> {
        black_box(text);
        Ok(())
    }
    fn flush(&self) {}
    fn destroy(&self) {}
}

fn null_logger(queue_capacity: usize) -> Logger {
    let registry = Registry::new();
    registry.register_fn("null", || Box::new(NullAdapter));
    let logger = Logger::with_registry(queue_capacity, Arc::new(registry));
    logger.set_logger("null", "{}").unwrap();
    logger
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("new_sync", |b| {
        b.iter(|| {
            let logger = Logger::new(1000);
            black_box(logger)
        });
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_sync_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_dispatch");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(1000);

    group.bench_function("informational", |b| {
        b.iter(|| {
            logger.informational(black_box("Informational message"));
        });
    });

    group.bench_function("error", |b| {
        b.iter(|| {
            logger.error(black_box("Error message"));
        });
    });

    let marked = null_logger(1000);
    marked.mark_caller(true);
    group.bench_function("with_caller_mark", |b| {
        b.iter(|| {
            marked.informational(black_box("Annotated message"));
        });
    });

    group.finish();
}

fn bench_async_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_dispatch");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(100_000);
    logger.async_mode();

    group.bench_function("informational", |b| {
        b.iter(|| {
            logger.informational(black_box("Queued message"));
        });
    });

    group.finish();
    logger.close();
}

fn bench_filtered_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered_out");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(1000);
    logger.set_level(Level::Error);

    group.bench_function("below_threshold", |b| {
        b.iter(|| {
            logger.debug(black_box("Never dispatched"));
        });
    });

    group.finish();
}

// ============================================================================
// File Adapter Benchmarks
// ============================================================================

fn bench_file_adapter(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_adapter");
    group.throughput(Throughput::Elements(1));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.log");
    let registry = Registry::new();
    logpipe::adapters::register_builtins(&registry);
    let logger = Logger::with_registry(1000, Arc::new(registry));
    logger
        .set_logger(
            "file",
            &format!(r#"{{"filename":{:?}}}"#, path.to_str().unwrap()),
        )
        .unwrap();

    group.bench_function("write_line", |b| {
        b.iter(|| {
            logger.informational(black_box("A benchmarked log line of typical length"));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_logger_creation,
    bench_sync_dispatch,
    bench_async_dispatch,
    bench_filtered_out,
    bench_file_adapter
);
criterion_main!(benches);
