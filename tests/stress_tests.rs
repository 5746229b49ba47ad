//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - Records from many threads never interleave within a line
//! - No record is lost across file rotation under load
//! - Child loggers stay usable from many threads at once

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;
use teelog::{Field, Logger, Options};
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

fn file_only(dir: &TempDir, name: &'static str) -> Options {
    Options {
        disable_console: true,
        ..Options::default()
    }
    .with_file(dir.path().to_string_lossy().into_owned())
    .with_file_level("debug")
    .with_filename_encoder(move || name.to_string())
}

fn run_workers(logger: &Arc<Logger>) {
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(logger);
            thread::spawn(move || {
                let worker = logger.with_values([Field::uint("worker", t as u64)]);
                for i in 0..PER_THREAD {
                    worker.info_fields("tick", [Field::uint("seq", i as u64)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }
}

fn collect_records(contents: &[String]) -> HashSet<(u64, u64)> {
    let mut seen = HashSet::new();
    for content in contents {
        for line in content.lines() {
            let record: serde_json::Value =
                serde_json::from_str(line).unwrap_or_else(|e| panic!("torn line {:?}: {}", line, e));
            let worker = record["worker"].as_u64().unwrap();
            let seq = record["seq"].as_u64().unwrap();
            assert!(seen.insert((worker, seq)), "duplicate record {} {}", worker, seq);
        }
    }
    seen
}

#[test]
fn test_concurrent_file_logging_keeps_every_record() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(Logger::new(file_only(&temp_dir, "stress.log")));

    run_workers(&logger);
    logger.close().expect("Failed to close");

    let content = fs::read_to_string(temp_dir.path().join("stress.log")).unwrap();
    let seen = collect_records(&[content]);
    assert_eq!(seen.len(), THREADS * PER_THREAD);
}

#[test]
fn test_concurrent_logging_across_rotation() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let options = file_only(&temp_dir, "rolling.log").with_rotation(1, 0, 0);
    let logger = Arc::new(Logger::new(options));

    let padding = "p".repeat(1024);
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            let padding = padding.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info_fields(
                        "bulk",
                        [
                            Field::uint("worker", t as u64),
                            Field::uint("seq", i as u64),
                            Field::string("padding", padding.clone()),
                        ],
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }
    logger.close().expect("Failed to close");

    let contents: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect();
    assert!(contents.len() > 1, "expected at least one rotation");

    let seen = collect_records(&contents);
    assert_eq!(seen.len(), THREADS * PER_THREAD);
}

#[test]
fn test_concurrent_children_and_flush() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(Logger::new(file_only(&temp_dir, "children.log")));

    let flusher = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for _ in 0..50 {
                logger.flush().expect("flush failed");
            }
        })
    };
    run_workers(&logger);
    flusher.join().expect("flusher panicked");
    logger.close().expect("Failed to close");

    let content = fs::read_to_string(temp_dir.path().join("children.log")).unwrap();
    assert_eq!(content.lines().count(), THREADS * PER_THREAD);
}
