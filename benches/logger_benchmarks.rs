//! Criterion benchmarks for logany

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use logany::prelude::*;
use logany::Record;
use std::io;

fn backends() -> [(&'static str, Logger); 2] {
    [
        (
            "tracing",
            tracing_backend::builder()
                .level(Severity::Info)
                .project("bench")
                .build(io::sink()),
        ),
        (
            "log",
            log_backend::builder()
                .level(Severity::Info)
                .project("bench")
                .build(io::sink()),
        ),
    ]
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("tracing", |b| {
        b.iter(|| black_box(tracing_backend::new(io::sink())));
    });

    group.bench_function("log", |b| {
        b.iter(|| black_box(log_backend::new(io::sink())));
    });

    group.finish();
}

// ============================================================================
// Emission Benchmarks
// ============================================================================

fn bench_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("emission");
    group.throughput(Throughput::Elements(1));

    for (name, logger) in backends() {
        group.bench_function(format!("{}/info", name), |b| {
            b.iter(|| logger.info(black_box("Request processed")));
        });

        group.bench_function(format!("{}/infof", name), |b| {
            b.iter(|| logger.infof(format_args!("Request {} took {}ms", black_box(42), 7)));
        });

        group.bench_function(format!("{}/filtered_debug", name), |b| {
            b.iter(|| logger.debug(black_box("never written")));
        });
    }

    group.finish();
}

// ============================================================================
// Structured Field Benchmarks
// ============================================================================

fn bench_fields(c: &mut Criterion) {
    let mut group = c.benchmark_group("fields");
    group.throughput(Throughput::Elements(1));

    for (name, logger) in backends() {
        group.bench_function(format!("{}/with_field", name), |b| {
            b.iter(|| black_box(logger.with_field("user_id", black_box(12345))));
        });

        let child = logger.with_fields([
            ("user_id", FieldValue::from(12345)),
            ("method", FieldValue::from("GET")),
            ("path", FieldValue::from("/api/v1/items")),
            ("status", FieldValue::from(200)),
        ]);
        group.bench_function(format!("{}/emit_with_4_fields", name), |b| {
            b.iter(|| child.info(black_box("Request processed")));
        });
    }

    group.finish();
}

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");
    let record = Record::new(Severity::Warn, "disk low").with_fields(
        Fields::new()
            .with_field("project", "bench")
            .with_field("free_mb", 12),
    );

    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Logfmt] {
        let formatter = LineFormatter::new(format);
        group.bench_function(format.name(), |b| {
            b.iter(|| black_box(formatter.format(black_box(&record))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_logger_creation,
    bench_emission,
    bench_fields,
    bench_formatters
);
criterion_main!(benches);
