//! Backend built on `tracing` and `tracing-subscriber`
//!
//! Every logger gets its own `Dispatch`; nothing is installed as the global
//! subscriber, so several loggers with different settings can live in one
//! process. Emission runs the event through that dispatch with
//! `dispatcher::with_default`, which keeps the call synchronous.
//!
//! `tracing` drops any event raised while a dispatcher callback is already
//! running on the thread. A log call made from inside a rewriter therefore
//! cannot be delivered; such calls are reported on stderr and dropped.
//! Calls made from inside a foreign subscriber's callbacks are dropped by
//! `tracing` without notice.
//!
//! ```
//! use logany::{tracing_backend, MemoryWriter, Severity};
//!
//! let sink = MemoryWriter::new();
//! let logger = tracing_backend::builder()
//!     .level(Severity::Debug)
//!     .text()
//!     .project("svc")
//!     .build(sink.clone());
//!
//! logger.with_field("attempt", 3).debugf(format_args!("retrying {}", "upload"));
//! assert!(sink.contents().contains("message=\"retrying upload\""));
//! ```

mod builder;
pub mod layer;
pub mod level;

pub use builder::Builder;
pub use layer::{level_replace_attr, source_replace_attr, AttrContext, ReplaceAttr};

use crate::core::{caller, Backend, Fields, Logger, LoggerError, Result, Severity, SharedWriter};
use std::cell::Cell;
use std::io::Write;
use std::panic::Location;
use std::sync::Arc;
use tracing::{dispatcher, Dispatch, Level};

pub(crate) const BACKEND_NAME: &str = "tracing";

thread_local! {
    /// Set while this thread is inside a tracing logger's dispatch.
    static DISPATCHING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the thread as dispatching until dropped.
struct DispatchGuard;

impl DispatchGuard {
    fn enter() -> Option<Self> {
        if DISPATCHING.with(|flag| flag.replace(true)) {
            return None;
        }
        Some(DispatchGuard)
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCHING.with(|flag| flag.set(false));
    }
}

/// Start configuring a tracing-backed logger
pub fn builder() -> Builder {
    Builder::default()
}

/// A tracing-backed logger with default settings: JSON output, minimum
/// severity `info`.
pub fn new<W: Write + Send + 'static>(writer: W) -> Logger {
    builder().build(writer)
}

pub(crate) struct TracingBackend {
    dispatch: Dispatch,
    min: Severity,
    fields: Fields,
    writer: SharedWriter,
    report_caller: bool,
}

impl TracingBackend {
    pub(crate) fn new(
        dispatch: Dispatch,
        min: Severity,
        fields: Fields,
        writer: SharedWriter,
        report_caller: bool,
    ) -> Self {
        Self {
            dispatch,
            min,
            fields,
            writer,
            report_caller,
        }
    }

    fn encoded_fields(&self) -> String {
        match serde_json::to_string(&self.fields) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("[LOGANY ERROR] Failed to encode fields: {}", e);
                String::from("{}")
            }
        }
    }
}

impl Backend for TracingBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn with_fields(&self, fields: Fields) -> Arc<dyn Backend> {
        Arc::new(TracingBackend {
            dispatch: self.dispatch.clone(),
            min: self.min,
            fields: self.fields.merged(&fields),
            writer: self.writer.clone(),
            report_caller: self.report_caller,
        })
    }

    fn enabled(&self, severity: Severity) -> bool {
        severity.passes(self.min)
    }

    fn log(&self, severity: Severity, message: &str, call_site: &'static Location<'static>) {
        if !self.enabled(severity) {
            return;
        }

        let Some(_guard) = DispatchGuard::enter() else {
            eprintln!(
                "[LOGANY ERROR] Dropped {} record logged while another record was being dispatched: {}",
                severity, message
            );
            return;
        };

        let caller = if self.report_caller {
            caller::resolve(call_site)
        } else {
            None
        };
        let (caller_file, caller_line, caller_function) = match caller {
            Some(ref frame) => (
                frame.file.as_str(),
                u64::from(frame.line),
                frame.function.as_deref().unwrap_or_default(),
            ),
            None => ("", 0, ""),
        };
        let fields = self.encoded_fields();

        dispatcher::with_default(&self.dispatch, || {
            macro_rules! emit {
                ($level:ident) => {
                    tracing::event!(
                        Level::$level,
                        severity = severity.as_str(),
                        fields = fields.as_str(),
                        caller_file = caller_file,
                        caller_line = caller_line,
                        caller_function = caller_function,
                        "{}",
                        message
                    )
                };
            }

            match severity {
                Severity::Trace => emit!(TRACE),
                Severity::Debug => emit!(DEBUG),
                Severity::Info => emit!(INFO),
                Severity::Warn => emit!(WARN),
                Severity::Error | Severity::Fatal | Severity::Panic => emit!(ERROR),
            }
        });
    }

    fn flush(&self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| LoggerError::io_operation("flush", "tracing backend writer", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldValue, MemoryWriter};

    fn json_lines(sink: &MemoryWriter) -> Vec<serde_json::Value> {
        sink.lines()
            .iter()
            .map(|l| serde_json::from_str(l).expect("valid JSON line"))
            .collect()
    }

    #[test]
    fn test_default_logger() {
        let sink = MemoryWriter::new();
        let logger = new(sink.clone());
        assert_eq!(logger.backend_name(), "tracing");

        logger.debug("hidden");
        logger.info("shown");

        let lines = json_lines(&sink);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "info");
        assert_eq!(lines[0]["message"], "shown");
        assert!(lines[0].get("project").is_none());
    }

    #[test]
    fn test_native_labels_without_level_rewriter() {
        let sink = MemoryWriter::new();
        let logger = new(sink.clone());
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| logger.panic("boom")));

        let lines = json_lines(&sink);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "error+8");
    }

    #[test]
    fn test_level_rewriter_names_synthesized_levels() {
        let sink = MemoryWriter::new();
        let logger = builder().level(Severity::Trace).build(sink.clone());
        logger.trace("t");
        logger.error("e");

        let levels: Vec<_> = json_lines(&sink).into_iter().map(|l| l["level"].clone()).collect();
        assert_eq!(levels, ["trace", "error"]);
    }

    #[test]
    fn test_fields_survive_the_event_round_trip() {
        #[derive(serde::Serialize)]
        struct Disk {
            name: &'static str,
            free_mb: u32,
        }

        let sink = MemoryWriter::new();
        let logger = builder().project("svc").build(sink.clone());
        let disk = FieldValue::from_serialize(&Disk {
            name: "sda1",
            free_mb: 12,
        });
        logger
            .with_field("disk", disk)
            .with_field("ratio", 0.5)
            .with_field("ok", false)
            .warn("disk low");

        let line = &json_lines(&sink)[0];
        assert_eq!(line["project"], "svc");
        assert_eq!(line["disk"]["name"], "sda1");
        assert_eq!(line["disk"]["free_mb"], 12);
        assert_eq!(line["ratio"], 0.5);
        assert_eq!(line["ok"], false);
    }

    #[test]
    fn test_unsigned_fields_stay_exact() {
        let sink = MemoryWriter::new();
        new(sink.clone())
            .with_field("id", u64::MAX)
            .with_field("offset", -1)
            .info("big");

        let line = &sink.lines()[0];
        assert!(line.contains("\"id\":18446744073709551615"), "{}", line);
        assert_eq!(json_lines(&sink)[0]["offset"], -1);
    }

    #[test]
    fn test_log_call_inside_rewriter_is_dropped_not_deadlocked() {
        let inner_sink = MemoryWriter::new();
        let inner = new(inner_sink.clone());
        let sink = MemoryWriter::new();
        let logger = builder()
            .replace_attr(move |_: &AttrContext<'_>, attr: crate::core::Attr| {
                inner.info("from inside a rewriter");
                attr
            })
            .build(sink.clone());

        logger.info("outer");

        assert_eq!(json_lines(&sink)[0]["message"], "outer");
        assert!(inner_sink.is_empty());

        logger.info("again");
        assert_eq!(sink.lines().len(), 2);
    }

    #[test]
    fn test_no_caller_resolution_without_source() {
        let sink = MemoryWriter::new();
        let logger = builder()
            .replace_attr(|ctx: &AttrContext<'_>, attr: crate::core::Attr| {
                assert!(ctx.caller.is_none());
                attr
            })
            .build(sink.clone());
        logger.info("x");
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_global_subscriber_is_untouched() {
        let sink = MemoryWriter::new();
        let _logger = new(sink.clone());
        tracing::info!("goes to the global default, not the sink");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_independent_instances() {
        let quiet_sink = MemoryWriter::new();
        let loud_sink = MemoryWriter::new();
        let quiet = builder().level(Severity::Error).build(quiet_sink.clone());
        let loud = builder().level(Severity::Trace).build(loud_sink.clone());

        quiet.debug("no");
        loud.debug("yes");

        assert!(quiet_sink.is_empty());
        assert_eq!(loud_sink.lines().len(), 1);
    }
}
