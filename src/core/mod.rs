//! Core facade types shared by every backend

pub mod caller;
pub mod config;
pub mod error;
pub mod fields;
pub mod logger;
pub mod output_format;
pub mod record;
pub mod severity;
pub mod timestamp;
pub mod writer;

pub use caller::CallerFrame;
pub use config::{BackendKind, LoggerConfig};
pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use logger::{Backend, Logger, FATAL_EXIT_CODE};
pub use output_format::{Formatter, LineFormatter, OutputFormat};
pub use record::{Attr, Record};
pub use severity::Severity;
pub use timestamp::TimestampFormat;
pub use writer::{MemoryWriter, SharedWriter};
