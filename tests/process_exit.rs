//! Fatal termination, observed from a child process
//!
//! The test binary re-runs itself with `LOGANY_FATAL_CHILD` set; the child
//! logs at fatal and must exit with status 1 after writing one record.

use logany::{log_backend, tracing_backend, Logger, Severity, FATAL_EXIT_CODE};
use std::process::Command;

const CHILD_ENV: &str = "LOGANY_FATAL_CHILD";
const CONTINUED: &str = "child kept running";

fn child_logger(spec: &str) -> Logger {
    let (backend, min) = spec.split_once(':').unwrap_or((spec, "info"));
    let min: Severity = min.parse().expect("child severity");
    match backend {
        "log" => log_backend::builder().level(min).build(std::io::stderr()),
        _ => tracing_backend::builder().level(min).build(std::io::stderr()),
    }
}

/// Runs only inside the child process.
#[test]
fn fatal_child() {
    let Ok(spec) = std::env::var(CHILD_ENV) else {
        return;
    };

    let logger = child_logger(&spec).with_field("phase", "shutdown");
    logger.fatalf(format_args!("cannot continue: {}", "disk gone"));
    eprintln!("{}", CONTINUED);
}

fn run_child(spec: &str) -> (Option<i32>, String) {
    let exe = std::env::current_exe().expect("test binary path");
    let output = Command::new(exe)
        .args(["fatal_child", "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, spec)
        .output()
        .expect("Failed to spawn child");
    (
        output.status.code(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn test_enabled_fatal_exits_with_status_one() {
    for backend in ["tracing", "log"] {
        let (status, stderr) = run_child(&format!("{}:info", backend));

        assert_eq!(status, Some(FATAL_EXIT_CODE), "{}: {}", backend, stderr);
        assert!(!stderr.contains(CONTINUED));

        let records: Vec<serde_json::Value> = stderr
            .lines()
            .filter(|line| line.starts_with('{'))
            .map(|line| serde_json::from_str(line).expect("JSON record"))
            .collect();
        assert_eq!(records.len(), 1, "{}: {}", backend, stderr);
        assert_eq!(records[0]["level"], "fatal");
        assert_eq!(records[0]["message"], "cannot continue: disk gone");
        assert_eq!(records[0]["phase"], "shutdown");
    }
}

#[test]
fn test_disabled_fatal_keeps_running() {
    for backend in ["tracing", "log"] {
        let (status, stderr) = run_child(&format!("{}:panic", backend));

        assert_eq!(status, Some(0), "{}: {}", backend, stderr);
        assert!(stderr.contains(CONTINUED));
        assert!(!stderr.lines().any(|line| line.starts_with('{')));
    }
}
