//! Severity mapping for the log backend

use crate::core::Severity;
use log::Level;

pub fn native_level(severity: Severity) -> Level {
    match severity {
        Severity::Trace => Level::Trace,
        Severity::Debug => Level::Debug,
        Severity::Info => Level::Info,
        Severity::Warn => Level::Warn,
        Severity::Error | Severity::Fatal | Severity::Panic => Level::Error,
    }
}

/// Severity of a record that carries no synthesized severity.
pub fn severity_of(level: Level) -> Severity {
    match level {
        Level::Trace => Severity::Trace,
        Level::Debug => Severity::Debug,
        Level::Info => Severity::Info,
        Level::Warn => Severity::Warn,
        Level::Error => Severity::Error,
    }
}

pub fn level_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Trace | Severity::Fatal | Severity::Panic => severity.as_str(),
        other => lowercase(native_level(other)),
    }
}

fn lowercase(level: Level) -> &'static str {
    match level {
        Level::Trace => "trace",
        Level::Debug => "debug",
        Level::Info => "info",
        Level::Warn => "warn",
        Level::Error => "error",
    }
}
