//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - Concurrent emitters never interleave within a line
//! - No record is lost under contention
//! - Children derived concurrently from one parent stay independent

use logany::{log_backend, tracing_backend, Logger, MemoryWriter, Severity};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

fn loggers(sink: &MemoryWriter) -> [Logger; 2] {
    [
        tracing_backend::builder()
            .level(Severity::Debug)
            .project("stress")
            .build(sink.clone()),
        log_backend::builder()
            .level(Severity::Debug)
            .project("stress")
            .build(sink.clone()),
    ]
}

#[test]
fn test_no_lost_or_torn_records() {
    let sink = MemoryWriter::new();

    for logger in loggers(&sink) {
        sink.clear();
        let logger = Arc::new(logger);

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let logger = Arc::clone(&logger);
                thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        logger.debugf(format_args!("thread {} message {}", t, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("Logging thread panicked");
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), THREADS * PER_THREAD, "{}", logger.backend_name());

        let mut seen = HashSet::new();
        for line in &lines {
            let record: serde_json::Value =
                serde_json::from_str(line).expect("Every line should be a whole record");
            assert_eq!(record["project"], "stress");
            seen.insert(record["message"].as_str().unwrap_or_default().to_string());
        }
        assert_eq!(seen.len(), THREADS * PER_THREAD);
    }
}

#[test]
fn test_concurrent_children_are_independent() {
    let sink = MemoryWriter::new();

    for parent in loggers(&sink) {
        sink.clear();

        thread::scope(|scope| {
            for t in 0..THREADS {
                let parent = &parent;
                scope.spawn(move || {
                    let child = parent.with_field("worker", t);
                    for i in 0..PER_THREAD / 10 {
                        child.with_field("step", i).info("tick");
                    }
                    parent.info("parent tick");
                });
            }
        });

        for line in sink.lines() {
            let record: serde_json::Value = serde_json::from_str(&line).expect("whole record");
            match record["message"].as_str() {
                Some("parent tick") => {
                    assert!(record.get("worker").is_none());
                    assert!(record.get("step").is_none());
                }
                Some("tick") => {
                    assert!(record["worker"].is_i64());
                    assert!(record["step"].is_i64());
                }
                other => panic!("unexpected message {:?}", other),
            }
        }
        assert_eq!(sink.lines().len(), THREADS * (PER_THREAD / 10 + 1));
    }
}

#[test]
fn test_filtered_calls_under_contention_write_nothing() {
    let sink = MemoryWriter::new();
    let logger = tracing_backend::builder()
        .level(Severity::Error)
        .build(sink.clone());

    thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                for i in 0..PER_THREAD {
                    logger.trace("noise");
                    logger.warnln(&[&"noise", &i]);
                }
            });
        }
    });

    assert!(sink.is_empty());
}
