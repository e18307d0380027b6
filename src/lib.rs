//! # logany
//!
//! A small logging facade: one [`Logger`] handle with leveled, formatted and
//! structured logging, backed by either `tracing` or `log`/`env_logger`.
//!
//! ## Features
//!
//! - **Leveled methods**: trace, debug, print, info, warn, error, fatal and
//!   panic, each as `x`, `xf` (`format_args!`) and `xln` (space-joined)
//! - **Structured fields**: `with_field`, `with_fields` and `with_error`
//!   derive new loggers and leave the parent untouched
//! - **Fatal and panic**: synthesized on both backends; fatal exits with
//!   status 1 and panic unwinds with the message, but only when enabled
//! - **Caller reporting**: `file:line` of the code that issued the call
//! - **Instance-local**: no global subscriber or logger is installed
//!
//! ## Example
//!
//! ```
//! use logany::{log_backend, tracing_backend, MemoryWriter, Severity};
//!
//! let sink = MemoryWriter::new();
//! let logger = tracing_backend::builder()
//!     .level(Severity::Info)
//!     .project("svc")
//!     .build(sink.clone());
//! logger.warn("disk low");
//!
//! let other = log_backend::builder().project("svc").build(sink.clone());
//! other.with_field("attempt", 2).errorf(format_args!("upload failed: {}", "timeout"));
//!
//! assert_eq!(sink.lines().len(), 2);
//! ```

pub mod backends;
pub mod core;
pub mod macros;

pub use backends::{log_backend, tracing_backend};

pub mod prelude {
    pub use crate::backends::{log_backend, tracing_backend};
    pub use crate::core::{
        Backend, FieldValue, Fields, Formatter, LineFormatter, Logger, LoggerConfig,
        LoggerError, MemoryWriter, OutputFormat, Result, Severity, TimestampFormat,
    };
}

pub use self::core::{
    Attr, Backend, BackendKind, CallerFrame, FieldValue, Fields, Formatter, LineFormatter,
    Logger, LoggerConfig, LoggerError, MemoryWriter, OutputFormat, Record, Result, Severity,
    SharedWriter, TimestampFormat, FATAL_EXIT_CODE,
};
