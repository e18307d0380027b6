//! The logging facade
//!
//! [`Logger`] is the one handle callers depend on. It carries an
//! `Arc<dyn Backend>`; the backend decides whether a severity is enabled and
//! performs formatting and I/O. Deriving a child with `with_field` and
//! friends never touches the parent, so a shared logger can spawn children
//! from many threads at once.

use super::{
    error::Result,
    fields::{FieldValue, Fields},
    record::ERROR_KEY,
    severity::Severity,
};
use std::fmt::{self, Display, Write as _};
use std::panic::Location;
use std::sync::Arc;

/// Exit status used when a fatal record terminates the process
pub const FATAL_EXIT_CODE: i32 = 1;

/// A logging engine behind the facade.
///
/// Implementations hold their own configuration; nothing here is global.
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    /// A new backend carrying `fields` merged over the receiver's fields.
    fn with_fields(&self, fields: Fields) -> Arc<dyn Backend>;

    /// Whether a record of `severity` would be written.
    fn enabled(&self, severity: Severity) -> bool;

    /// Emit one record. Filtered severities are a no-op.
    fn log(&self, severity: Severity, message: &str, call_site: &'static Location<'static>);

    fn flush(&self) -> Result<()>;
}

/// Cloneable logger handle
///
/// # Example
///
/// ```
/// use logany::{tracing_backend, MemoryWriter, Severity};
///
/// let sink = MemoryWriter::new();
/// let logger = tracing_backend::builder()
///     .level(Severity::Info)
///     .project("svc")
///     .build(sink.clone());
///
/// logger.with_field("disk", "/dev/sda1").warn("disk low");
/// logger.debug("filtered out");
///
/// assert_eq!(sink.lines().len(), 1);
/// ```
#[derive(Clone)]
pub struct Logger {
    backend: Arc<dyn Backend>,
}

impl Logger {
    pub fn from_backend<B: Backend + 'static>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_arc(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        self.backend.enabled(severity)
    }

    /// Derive a logger carrying `error` under the `error` key
    #[must_use]
    pub fn with_error<E>(&self, err: &E) -> Logger
    where
        E: std::error::Error + ?Sized,
    {
        self.with_field(ERROR_KEY, err.to_string())
    }

    /// Derive a logger carrying one extra field
    #[must_use]
    pub fn with_field<K, V>(&self, key: K, value: V) -> Logger
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.derive(Fields::new().with_field(key, value))
    }

    /// Derive a logger carrying extra fields; they override existing keys
    #[must_use]
    pub fn with_fields<I, K, V>(&self, fields: I) -> Logger
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.derive(fields.into_iter().collect())
    }

    fn derive(&self, fields: Fields) -> Logger {
        Logger {
            backend: self.backend.with_fields(fields),
        }
    }

    /// Log the message at `severity`
    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl Display) {
        self.emit(severity, message.to_string(), Location::caller());
    }

    /// Log pre-formatted arguments at `severity`, see [`logf!`](crate::logf)
    #[track_caller]
    pub fn logf(&self, severity: Severity, args: fmt::Arguments<'_>) {
        self.emit(severity, fmt::format(args), Location::caller());
    }

    /// Log the operands joined by single spaces at `severity`
    #[track_caller]
    pub fn logln(&self, severity: Severity, args: &[&dyn Display]) {
        self.emit(severity, join_operands(args), Location::caller());
    }

    fn emit(&self, severity: Severity, message: String, call_site: &'static Location<'static>) {
        self.backend.log(severity, &message, call_site);

        match severity {
            Severity::Fatal if self.backend.enabled(Severity::Fatal) => {
                if let Err(e) = self.backend.flush() {
                    eprintln!("[LOGANY ERROR] Failed to flush before exit: {}", e);
                }
                std::process::exit(FATAL_EXIT_CODE);
            }
            Severity::Panic if self.backend.enabled(Severity::Panic) => {
                panic!("{}", message);
            }
            _ => {}
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.backend.flush()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("backend", &self.backend.name())
            .finish()
    }
}

/// Operands separated by one space, with no trailing newline
fn join_operands(args: &[&dyn Display]) -> String {
    let mut message = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            message.push(' ');
        }
        let _ = write!(message, "{}", arg);
    }
    message
}

macro_rules! leveled_methods {
    ($($severity:ident => $plain:ident, $formatted:ident, $joined:ident;)+) => {
        impl Logger {
            $(
                #[doc = concat!("Log at `", stringify!($severity), "`.")]
                #[track_caller]
                #[inline]
                pub fn $plain(&self, message: impl Display) {
                    self.log(Severity::$severity, message);
                }

                #[doc = concat!("Log `format_args!` output at `", stringify!($severity), "`.")]
                #[track_caller]
                #[inline]
                pub fn $formatted(&self, args: fmt::Arguments<'_>) {
                    self.logf(Severity::$severity, args);
                }

                #[doc = concat!("Log space-joined operands at `", stringify!($severity), "`.")]
                #[track_caller]
                #[inline]
                pub fn $joined(&self, args: &[&dyn Display]) {
                    self.logln(Severity::$severity, args);
                }
            )+
        }
    };
}

leveled_methods! {
    Trace => trace, tracef, traceln;
    Debug => debug, debugf, debugln;
    Info => print, printf, println;
    Info => info, infof, infoln;
    Warn => warn, warnf, warnln;
    Error => error, errorf, errorln;
    Fatal => fatal, fatalf, fatalln;
    Panic => panic, panicf, panicln;
}
