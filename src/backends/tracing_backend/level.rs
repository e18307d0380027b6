//! Severity mapping for the tracing backend
//!
//! `tracing` stops at `ERROR`, so fatal and panic ride on `ERROR` and keep
//! their identity in the event's `severity` field. Their default label
//! carries the offset from `ERROR` in severity codes.

use crate::core::Severity;
use std::borrow::Cow;
use tracing::Level;

/// Native level an event of `severity` is emitted at.
pub fn native_level(severity: Severity) -> Level {
    match severity {
        Severity::Trace => Level::TRACE,
        Severity::Debug => Level::DEBUG,
        Severity::Info => Level::INFO,
        Severity::Warn => Level::WARN,
        Severity::Error | Severity::Fatal | Severity::Panic => Level::ERROR,
    }
}

/// Severity of an event that did not come through the facade.
pub fn severity_of(level: &Level) -> Severity {
    match *level {
        Level::TRACE => Severity::Trace,
        Level::DEBUG => Severity::Debug,
        Level::INFO => Severity::Info,
        Level::WARN => Severity::Warn,
        Level::ERROR => Severity::Error,
    }
}

/// Label the backend renders when no level rewriter is installed.
pub fn native_label(severity: Severity) -> Cow<'static, str> {
    let base = severity_of(&native_level(severity));
    let offset = severity.code() - base.code();
    if offset > 0 {
        Cow::Owned(format!("{}+{}", base, offset))
    } else {
        Cow::Borrowed(base.as_str())
    }
}

/// Label installed by the level rewriter.
pub fn level_label(severity: Severity) -> Cow<'static, str> {
    match severity {
        Severity::Trace | Severity::Fatal | Severity::Panic => Cow::Borrowed(severity.as_str()),
        other => native_label(other),
    }
}
