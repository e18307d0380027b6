//! Declarative logger configuration
//!
//! Lets an application pick a backend and its options from a config file
//! instead of code:
//!
//! ```
//! use logany::{LoggerConfig, MemoryWriter};
//!
//! let config = LoggerConfig::from_json(
//!     r#"{"backend":"log","level":"debug","format":"logfmt","project":"svc"}"#,
//! )
//! .unwrap();
//!
//! let sink = MemoryWriter::new();
//! let logger = config.build(sink.clone()).unwrap();
//! logger.debug("ready");
//! assert!(sink.contents().contains("project=svc"));
//! ```

use super::{
    error::{LoggerError, Result},
    logger::Logger,
    output_format::{LineFormatter, OutputFormat},
    severity::Severity,
    timestamp::TimestampFormat,
};
use crate::backends::{log_backend, tracing_backend};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Which engine a [`LoggerConfig`] builds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Tracing,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub backend: BackendKind,
    /// Minimum severity name, e.g. `"info"` or `"warning"`
    pub level: String,
    pub format: OutputFormat,
    pub project: String,
    /// Add the caller's `file:line` to every record
    pub report_caller: bool,
    pub timestamp_format: TimestampFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            level: Severity::default().as_str().to_string(),
            format: OutputFormat::default(),
            project: String::new(),
            report_caller: false,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl LoggerConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.severity()?;
        if matches!(&config.timestamp_format, TimestampFormat::Custom(f) if f.is_empty()) {
            return Err(LoggerError::config(
                "timestamp_format",
                "custom format must not be empty",
            ));
        }
        Ok(config)
    }

    pub fn severity(&self) -> Result<Severity> {
        self.level.parse()
    }

    /// Build a logger writing to `writer`.
    pub fn build<W: Write + Send + 'static>(&self, writer: W) -> Result<Logger> {
        let severity = self.severity()?;

        let logger = match self.backend {
            BackendKind::Tracing => {
                let mut builder = tracing_backend::builder()
                    .level(severity)
                    .formatter(self.format)
                    .project(&self.project)
                    .timestamp_format(self.timestamp_format.clone());
                if self.report_caller {
                    builder = builder.add_source();
                }
                builder.build(writer)
            }
            BackendKind::Log => {
                let formatter = LineFormatter::new(self.format)
                    .with_timestamp_format(self.timestamp_format.clone());
                let mut builder = log_backend::builder()
                    .level(severity)
                    .formatter(formatter)
                    .project(&self.project);
                if self.report_caller {
                    builder = builder.report_caller();
                }
                builder.build(writer)
            }
        };
        Ok(logger)
    }
}
