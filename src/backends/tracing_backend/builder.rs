use super::layer::{
    level_replace_attr, source_replace_attr, AttrContext, LayerSettings, RecordLayer, ReplaceAttr,
};
use super::TracingBackend;
use crate::core::{Attr, Fields, Logger, OutputFormat, Severity, SharedWriter, TimestampFormat};
use std::fmt;
use std::io::Write;
use std::sync::Arc;
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration for a tracing-backed [`Logger`]
///
/// Rewriters run in list order. [`level`](Builder::level) and
/// [`add_source`](Builder::add_source) put theirs at the front so user
/// rewriters added with [`replace_attr`](Builder::replace_attr) see the
/// final level label and source.
pub struct Builder {
    level: Severity,
    format: OutputFormat,
    project: String,
    add_source: bool,
    rewriters: Vec<ReplaceAttr>,
    timestamp_format: TimestampFormat,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            level: Severity::Info,
            format: OutputFormat::Json,
            project: String::new(),
            add_source: false,
            rewriters: Vec::new(),
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl Builder {
    /// Set the minimum severity and render facade level names
    pub fn level(mut self, severity: Severity) -> Self {
        self.level = severity;
        self.rewriters.insert(0, level_replace_attr());
        self
    }

    pub fn formatter(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// `key=value` output
    pub fn text(self) -> Self {
        self.formatter(OutputFormat::Logfmt)
    }

    pub fn json(self) -> Self {
        self.formatter(OutputFormat::Json)
    }

    /// Tag every record with `project`; an empty name adds nothing
    pub fn project(mut self, name: impl Into<String>) -> Self {
        self.project = name.into();
        self
    }

    /// Add the caller's `file:line` and function as `source`
    pub fn add_source(mut self) -> Self {
        self.add_source = true;
        self.rewriters.insert(0, source_replace_attr());
        self
    }

    /// Append a rewriter.
    ///
    /// Rewriters run inside this logger's dispatch. A tracing-backed log
    /// call made from a rewriter is dropped and reported on stderr.
    pub fn replace_attr<F>(mut self, rewrite: F) -> Self
    where
        F: Fn(&AttrContext<'_>, Attr) -> Attr + Send + Sync + 'static,
    {
        self.rewriters.push(Arc::new(rewrite));
        self
    }

    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn build<W: Write + Send + 'static>(self, writer: W) -> Logger {
        let writer = SharedWriter::new(writer);
        let settings = Arc::new(LayerSettings {
            min: self.level,
            format: self.format,
            timestamp_format: self.timestamp_format,
            add_source: self.add_source,
            rewriters: self.rewriters,
            writer: writer.clone(),
        });
        let dispatch = Dispatch::new(Registry::default().with(RecordLayer::new(settings)));

        let mut fields = Fields::new();
        if !self.project.is_empty() {
            fields.insert("project", self.project);
        }

        Logger::from_backend(TracingBackend::new(
            dispatch,
            self.level,
            fields,
            writer,
            self.add_source,
        ))
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("level", &self.level)
            .field("format", &self.format)
            .field("project", &self.project)
            .field("add_source", &self.add_source)
            .field("rewriters", &self.rewriters.len())
            .field("timestamp_format", &self.timestamp_format)
            .finish()
    }
}
