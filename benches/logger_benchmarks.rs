//! Criterion benchmarks for rust_structured_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_structured_logger::prelude::*;
use std::io;
use std::sync::Arc;
use std::thread;

fn sink_logger(level: LogLevel) -> Logger {
    Logger::new(StreamHandler::new(io::sink(), level).into_arc())
}

fn sample_entry() -> LogEntry {
    LogEntry::new(LogLevel::Info, "request served")
        .with_fields(vec![
            Field::string("method", "GET"),
            Field::string("path", "/api/v1/users"),
            Field::int("status", 200),
            Field::float64("elapsed_ms", 12.5),
            Field::bool("cached", false),
        ])
        .with_context_fields(Arc::from(vec![Field::string("service", "api")]))
}

// ============================================================================
// Event Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = sink_logger(LogLevel::Warn);

    group.bench_function("disabled_event", |b| {
        b.iter(|| {
            logger
                .debug()
                .str("user", black_box("alice"))
                .int("attempt", black_box(3))
                .msg("filtered");
        });
    });

    group.bench_function("enabled_event", |b| {
        b.iter(|| {
            logger
                .warn()
                .str("user", black_box("alice"))
                .int("attempt", black_box(3))
                .msg("written");
        });
    });

    group.bench_function("enabled_check", |b| {
        b.iter(|| black_box(logger.enabled(black_box(LogLevel::Info))));
    });

    group.finish();
}

fn bench_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("context");
    group.throughput(Throughput::Elements(1));

    let logger = sink_logger(LogLevel::Info);

    group.bench_function("derive_logger", |b| {
        b.iter(|| {
            let child = logger.with(vec![
                Field::string("request_id", black_box("req-42")),
                Field::int("shard", 7),
            ]);
            black_box(child)
        });
    });

    let child = logger.with(vec![Field::string("request_id", "req-42")]);
    group.bench_function("log_with_context", |b| {
        b.iter(|| child.info().int("status", black_box(200)).msg("served"));
    });

    group.finish();
}

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");
    group.throughput(Throughput::Elements(1));

    let entry = sample_entry();
    let text = TextFormatter::new();
    let colored = TextFormatter::new().with_colors(true);
    let json = JsonFormatter::new();

    group.bench_function("text", |b| {
        b.iter(|| black_box(text.format(black_box(&entry))));
    });

    group.bench_function("text_colored", |b| {
        b.iter(|| black_box(colored.format(black_box(&entry))));
    });

    group.bench_function("json", |b| {
        b.iter(|| black_box(json.format(black_box(&entry))));
    });

    group.finish();
}

// ============================================================================
// Handler Benchmarks
// ============================================================================

fn bench_handlers(c: &mut Criterion) {
    let mut group = c.benchmark_group("handlers");
    group.throughput(Throughput::Elements(1));

    let entry = sample_entry();
    let stream = StreamHandler::new(io::sink(), LogLevel::Info);
    let multi = MultiHandler::new(vec![
        StreamHandler::new(io::sink(), LogLevel::Info).into_arc(),
        StreamHandler::json(io::sink(), LogLevel::Info).into_arc(),
    ]);

    group.bench_function("stream", |b| {
        b.iter(|| black_box(stream.handle(black_box(&entry))));
    });

    group.bench_function("multi_two_children", |b| {
        b.iter(|| black_box(multi.handle(black_box(&entry))));
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");
    group.throughput(Throughput::Elements(400));

    let logger = sink_logger(LogLevel::Info);

    group.bench_function("multi_thread_4", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let logger = logger.clone();
                    thread::spawn(move || {
                        for i in 0..100 {
                            logger.info().int("thread", t).int("seq", i).msg("concurrent");
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_level_filtering,
    bench_context,
    bench_formatters,
    bench_handlers,
    bench_concurrent_logging,
);
criterion_main!(benches);
