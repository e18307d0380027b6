//! Backend built on `log` key-values and `env_logger`
//!
//! Each logger owns an `env_logger::Logger` that is never installed with
//! `log::set_logger`; records are handed to it directly. The facade's fields,
//! the synthesized severity and the level label travel as key-values, the
//! caller as the record's file and line plus a function key-value. A format closure turns the
//! `log::Record` back into a facade [`Record`] for the configured
//! [`Formatter`].
//!
//! ```
//! use logany::{log_backend, LineFormatter, MemoryWriter, Severity};
//!
//! let sink = MemoryWriter::new();
//! let logger = log_backend::builder()
//!     .level(Severity::Warn)
//!     .formatter(LineFormatter::text())
//!     .project("svc")
//!     .build(sink.clone());
//!
//! logger.info("dropped");
//! logger.warnln(&[&"disk", &"low"]);
//! assert!(sink.contents().contains("[WARN ] disk low project=svc"));
//! ```

mod builder;
pub mod hook;
pub mod level;

pub use builder::Builder;
pub use hook::{Hook, ReportCallerHook};

use crate::core::{
    Backend, CallerFrame, FieldValue, Fields, Formatter, Logger, LoggerError, Record, Result,
    Severity, SharedWriter,
};
use level::{level_label, native_level, severity_of};
use log::kv::{self, Key, Source, Value, VisitSource};
use log::Log;
use std::io::Write;
use std::panic::Location;
use std::sync::Arc;

pub(crate) const BACKEND_NAME: &str = "log";

const TARGET: &str = "logany";
const SEVERITY_KV: &str = "logany.severity";
const LEVEL_KV: &str = "logany.level";
const FUNCTION_KV: &str = "logany.function";

/// Start configuring a log-backed logger
pub fn builder() -> Builder {
    Builder::default()
}

/// A log-backed logger with default settings: JSON output, minimum severity
/// `info`.
pub fn new<W: Write + Send + 'static>(writer: W) -> Logger {
    builder().build(writer)
}

struct Shared {
    logger: env_logger::Logger,
    min: Severity,
    hooks: Vec<Arc<dyn Hook>>,
    writer: SharedWriter,
}

pub(crate) struct LogBackend {
    shared: Arc<Shared>,
    fields: Fields,
}

impl LogBackend {
    fn new(
        logger: env_logger::Logger,
        min: Severity,
        hooks: Vec<Arc<dyn Hook>>,
        fields: Fields,
        writer: SharedWriter,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                logger,
                min,
                hooks,
                writer,
            }),
            fields,
        }
    }

    fn run_hooks(&self, record: &mut Record) {
        for hook in &self.shared.hooks {
            if !hook.levels().contains(&record.severity) {
                continue;
            }
            if let Err(e) = hook.fire(record) {
                eprintln!(
                    "[LOGANY ERROR] {}",
                    LoggerError::hook(hook.name(), e.to_string())
                );
            }
        }
    }
}

impl Backend for LogBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn with_fields(&self, fields: Fields) -> Arc<dyn Backend> {
        Arc::new(LogBackend {
            shared: Arc::clone(&self.shared),
            fields: self.fields.merged(&fields),
        })
    }

    fn enabled(&self, severity: Severity) -> bool {
        severity.passes(self.shared.min)
    }

    fn log(&self, severity: Severity, message: &str, call_site: &'static Location<'static>) {
        if !self.enabled(severity) {
            return;
        }

        let mut record = Record::new(severity, message)
            .with_level(level_label(severity))
            .with_fields(self.fields.clone())
            .with_call_site(call_site);
        self.run_hooks(&mut record);

        let payload = Payload { record: &record };
        let caller = record.caller.as_ref();
        self.shared.logger.log(
            &log::Record::builder()
                .args(format_args!("{}", record.message))
                .level(native_level(record.severity))
                .target(TARGET)
                .file(caller.map(|c| c.file.as_str()))
                .line(caller.map(|c| c.line))
                .key_values(&payload)
                .build(),
        );
    }

    fn flush(&self) -> Result<()> {
        self.shared.logger.flush();
        self.shared
            .writer
            .flush()
            .map_err(|e| LoggerError::io_operation("flush", "log backend writer", e))
    }
}

/// A facade record's key-values as seen by `log`
struct Payload<'a> {
    record: &'a Record,
}

impl Source for Payload<'_> {
    fn visit<'kvs>(&'kvs self, visitor: &mut dyn VisitSource<'kvs>) -> std::result::Result<(), kv::Error> {
        visitor.visit_pair(
            Key::from_str(SEVERITY_KV),
            Value::from(self.record.severity.as_str()),
        )?;
        visitor.visit_pair(Key::from_str(LEVEL_KV), Value::from(&*self.record.level))?;
        if let Some(function) = self.record.caller.as_ref().and_then(|c| c.function.as_deref()) {
            visitor.visit_pair(Key::from_str(FUNCTION_KV), Value::from(function))?;
        }
        for (key, value) in &self.record.fields {
            visitor.visit_pair(Key::from_str(key), kv_value(value))?;
        }
        Ok(())
    }
}

fn kv_value(value: &FieldValue) -> Value<'_> {
    match value {
        FieldValue::String(s) => Value::from(s.as_str()),
        FieldValue::Int(i) => Value::from(*i),
        FieldValue::Float(f) => Value::from(*f),
        FieldValue::Bool(b) => Value::from(*b),
        FieldValue::Null => Value::null(),
        FieldValue::Json(json) => Value::from_serde(json),
    }
}

/// Collects key-values back into facade fields
#[derive(Default)]
struct KvCollector {
    severity: Option<Severity>,
    level: Option<String>,
    function: Option<String>,
    fields: Fields,
}

impl<'kvs> VisitSource<'kvs> for KvCollector {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> std::result::Result<(), kv::Error> {
        match key.as_str() {
            SEVERITY_KV => self.severity = value.to_string().parse().ok(),
            LEVEL_KV => self.level = Some(value.to_string()),
            FUNCTION_KV => self.function = Some(value.to_string()),
            name => self.fields.insert(name, FieldValue::from_serialize(&value)),
        }
        Ok(())
    }
}

/// Rebuild the facade record inside the `env_logger` format closure.
pub(crate) fn rebuild(log_record: &log::Record<'_>) -> Record {
    let mut collector = KvCollector::default();
    if let Err(e) = log_record.key_values().visit(&mut collector) {
        eprintln!("[LOGANY ERROR] Failed to read record key-values: {}", e);
    }

    let severity = collector
        .severity
        .unwrap_or_else(|| severity_of(log_record.level()));
    let level = collector
        .level
        .unwrap_or_else(|| level_label(severity).to_string());
    let caller = match (log_record.file(), log_record.line()) {
        (Some(file), Some(line)) => {
            Some(CallerFrame::new(file, line).with_function(collector.function))
        }
        _ => None,
    };

    Record::new(severity, log_record.args().to_string())
        .with_level(level)
        .with_fields(collector.fields)
        .with_caller(caller)
}

/// Render one `log::Record` with `formatter` into the `env_logger` buffer.
pub(crate) fn write_formatted(
    formatter: &dyn Formatter,
    buf: &mut env_logger::fmt::Formatter,
    log_record: &log::Record<'_>,
) -> std::io::Result<()> {
    let record = rebuild(log_record);
    match formatter.format(&record) {
        Ok(line) => writeln!(buf, "{}", line),
        Err(e) => {
            eprintln!("[LOGANY ERROR] Failed to format record: {}", e);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LineFormatter, MemoryWriter};
    use parking_lot::Mutex;

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
        assert_eq!(logger.backend_name(), "log");

        logger.debug("hidden");
        logger.info("shown");

        let lines = json_lines(&sink);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "info");
        assert_eq!(lines[0]["message"], "shown");
    }

    #[test]
    fn test_synthesized_severity_survives_env_logger() {
        let sink = MemoryWriter::new();
        let logger = builder().level(Severity::Error).build(sink.clone());

        logger.error("plain error");
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| logger.panic("boom")));

        let levels: Vec<_> = json_lines(&sink).into_iter().map(|l| l["level"].clone()).collect();
        assert_eq!(levels, ["error", "panic"]);
    }

    #[test]
    fn test_fatal_minimum_filters_error() {
        let sink = MemoryWriter::new();
        let logger = builder().level(Severity::Fatal).build(sink.clone());
        logger.error("below fatal");
        assert!(sink.is_empty());
        assert!(logger.enabled(Severity::Panic));
    }

    #[test]
    fn test_field_types_survive_key_values() {
        let sink = MemoryWriter::new();
        let logger = new(sink.clone());
        logger
            .with_fields([
                ("count", FieldValue::from(3)),
                ("ratio", FieldValue::from(0.25)),
                ("ok", FieldValue::from(true)),
                ("none", FieldValue::Null),
                ("tags", FieldValue::from(serde_json::json!(["a", "b"]))),
            ])
            .info("typed");

        let line = &json_lines(&sink)[0];
        assert_eq!(line["count"], 3);
        assert_eq!(line["ratio"], 0.25);
        assert_eq!(line["ok"], true);
        assert!(line["none"].is_null());
        assert_eq!(line["tags"], serde_json::json!(["a", "b"]));
        assert!(line.get("logany.severity").is_none());
    }

    #[test]
    fn test_hooks_fire_in_order_for_their_levels() {
        struct Tag {
            name: &'static str,
            levels: Vec<Severity>,
            seen: Arc<Mutex<Vec<&'static str>>>,
        }

        impl Hook for Tag {
            fn name(&self) -> &str {
                self.name
            }

            fn levels(&self) -> &[Severity] {
                &self.levels
            }

            fn fire(&self, record: &mut Record) -> Result<()> {
                self.seen.lock().push(self.name);
                record.fields.insert(self.name, true);
                Ok(())
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = MemoryWriter::new();
        let logger = builder()
            .hook(Tag {
                name: "first",
                levels: Severity::ALL.to_vec(),
                seen: Arc::clone(&seen),
            })
            .hook(Tag {
                name: "errors_only",
                levels: vec![Severity::Error],
                seen: Arc::clone(&seen),
            })
            .build(sink.clone());

        logger.info("a");
        logger.error("b");

        assert_eq!(*seen.lock(), ["first", "first", "errors_only"]);
        let lines = json_lines(&sink);
        assert!(lines[0].get("errors_only").is_none());
        assert_eq!(lines[1]["errors_only"], true);
    }

    #[test]
    fn test_failing_hook_does_not_stop_emission() {
        struct Broken;
        impl Hook for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn fire(&self, _record: &mut Record) -> Result<()> {
                Err(LoggerError::other("unavailable"))
            }
        }

        let sink = MemoryWriter::new();
        let logger = builder().hook(Broken).build(sink.clone());
        logger.warn("still written");
        assert_eq!(json_lines(&sink)[0]["message"], "still written");
    }

    #[test]
    fn test_hook_can_rewrite_message_and_level() {
        let sink = MemoryWriter::new();
        let logger = builder()
            .hook(|record: &mut Record| -> Result<()> {
                record.message = format!("[redacted] {}", record.message.len());
                record.level = "WARNING".into();
                Ok(())
            })
            .build(sink.clone());
        logger.warn("secret");

        let line = &json_lines(&sink)[0];
        assert_eq!(line["message"], "[redacted] 6");
        assert_eq!(line["level"], "WARNING");
    }

    #[test]
    fn test_caller_function_survives_env_logger() {
        let sink = MemoryWriter::new();
        let logger = builder()
            .hook(|record: &mut Record| -> Result<()> {
                record.caller = Some(
                    CallerFrame::new("tests/app.rs", 3).with_function(Some("app::run".to_string())),
                );
                Ok(())
            })
            .build(sink.clone());
        logger.info("located");

        let line = &json_lines(&sink)[0];
        assert_eq!(line["source"], "tests/app.rs:3 (app::run)");
        assert!(line.get("logany.function").is_none());
    }

    #[test]
    fn test_unsigned_fields_stay_exact() {
        let sink = MemoryWriter::new();
        new(sink.clone()).with_field("id", u64::MAX).info("big");
        assert!(sink.contents().contains("\"id\":18446744073709551615"));
    }

    #[test]
    fn test_custom_formatter() {
        let sink = MemoryWriter::new();
        let logger = builder()
            .formatter(|record: &Record| -> Result<String> {
                Ok(format!("{} {}", record.level, record.message))
            })
            .build(sink.clone());
        logger.info("hello");
        assert_eq!(sink.contents(), "info hello\n");
    }

    #[test]
    fn test_failing_formatter_writes_nothing() {
        let sink = MemoryWriter::new();
        let logger = builder()
            .formatter(|_: &Record| -> Result<String> { Err(LoggerError::formatter("test", "nope")) })
            .build(sink.clone());
        logger.info("lost");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_text_formatter() {
        let sink = MemoryWriter::new();
        let logger = builder()
            .formatter(LineFormatter::text())
            .project("svc")
            .build(sink.clone());
        logger.with_field("disk", "sda1").warn("disk low");
        assert!(sink.contents().contains("[WARN ] disk low disk=sda1 project=svc"));
    }
}
