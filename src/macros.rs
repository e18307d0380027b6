//! Logging macros for ergonomic log message formatting.
//!
//! The `..f!` macros wrap `format_args!` for the formatted variants; the
//! `..ln!` macros build the operand list for the space-joined variants.
//! Both expand to a method call at the use site, so caller reporting points
//! at the macro invocation.
//!
//! # Examples
//!
//! ```
//! use logany::{infof, warnln, tracing_backend, MemoryWriter};
//!
//! let sink = MemoryWriter::new();
//! let logger = tracing_backend::new(sink.clone());
//!
//! let port = 8080;
//! infof!(logger, "Server listening on port {}", port);
//! warnln!(logger, "retry", 1, "of", 3);
//!
//! assert!(sink.lines()[1].contains("retry 1 of 3"));
//! ```

/// Log a formatted message at an explicit severity.
///
/// ```
/// # use logany::{tracing_backend, MemoryWriter, Severity};
/// # let logger = tracing_backend::new(MemoryWriter::new());
/// use logany::logf;
/// logf!(logger, Severity::Info, "Simple message");
/// logf!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! logf {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.logf($severity, format_args!($($arg)+))
    };
}

/// Log space-joined operands at an explicit severity.
///
/// ```
/// # use logany::{tracing_backend, MemoryWriter, Severity};
/// # let logger = tracing_backend::new(MemoryWriter::new());
/// use logany::logln;
/// logln!(logger, Severity::Warn, "queue depth", 128);
/// ```
#[macro_export]
macro_rules! logln {
    ($logger:expr, $severity:expr, $($arg:expr),+ $(,)?) => {
        $logger.logln($severity, &[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

/// Log a formatted trace-level message.
#[macro_export]
macro_rules! tracef {
    ($logger:expr, $($arg:tt)+) => {
        $logger.tracef(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(format_args!($($arg)+))
    };
}

/// Log a formatted message at info, the level `print` maps to.
#[macro_export]
macro_rules! printf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.printf(format_args!($($arg)+))
    };
}

/// Log a formatted info-level message.
///
/// ```
/// # use logany::{tracing_backend, MemoryWriter};
/// # let logger = tracing_backend::new(MemoryWriter::new());
/// use logany::infof;
/// infof!(logger, "Items: {}", 100);
/// ```
#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(format_args!($($arg)+))
    };
}

/// Log a formatted fatal-level message, then exit with status 1 if fatal is
/// enabled.
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(format_args!($($arg)+))
    };
}

/// Log a formatted panic-level message, then panic with it if panic is
/// enabled.
#[macro_export]
macro_rules! panicf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.panicf(format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! traceln {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.traceln(&[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! debugln {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.debugln(&[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! infoln {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.infoln(&[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

/// Log space-joined operands at warn.
///
/// ```
/// # use logany::{tracing_backend, MemoryWriter};
/// # let logger = tracing_backend::new(MemoryWriter::new());
/// use logany::warnln;
/// warnln!(logger, "Retry", 1, "of", 3);
/// ```
#[macro_export]
macro_rules! warnln {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.warnln(&[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! errorln {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.errorln(&[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! fatalln {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.fatalln(&[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! panicln {
    ($logger:expr, $($arg:expr),+ $(,)?) => {
        $logger.panicln(&[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}
