use super::hook::{Hook, ReportCallerHook};
use super::level::native_level;
use super::{write_formatted, LogBackend};
use crate::core::{Fields, Formatter, LineFormatter, Logger, Severity, SharedWriter};
use env_logger::{Target, WriteStyle};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Configuration for a log-backed [`Logger`]
pub struct Builder {
    level: Severity,
    formatter: Arc<dyn Formatter>,
    project: String,
    report_caller: bool,
    hooks: Vec<Arc<dyn Hook>>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            level: Severity::Info,
            formatter: Arc::new(LineFormatter::json()),
            project: String::new(),
            report_caller: false,
            hooks: Vec::new(),
        }
    }
}

impl Builder {
    pub fn level(mut self, severity: Severity) -> Self {
        self.level = severity;
        self
    }

    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Tag every record with `project`; an empty name adds nothing
    pub fn project(mut self, name: impl Into<String>) -> Self {
        self.project = name.into();
        self
    }

    /// Resolve the caller of every record into `source`
    pub fn report_caller(mut self) -> Self {
        self.report_caller = true;
        self
    }

    pub fn hook<H: Hook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn hooks<I>(mut self, hooks: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Hook>>,
    {
        self.hooks.extend(hooks);
        self
    }

    pub fn build<W: Write + Send + 'static>(self, writer: W) -> Logger {
        let writer = SharedWriter::new(writer);
        let formatter = self.formatter;

        let logger = env_logger::Builder::new()
            .target(Target::Pipe(Box::new(writer.clone())))
            .filter_level(native_level(self.level).to_level_filter())
            .write_style(WriteStyle::Never)
            .format(move |buf, record| write_formatted(formatter.as_ref(), buf, record))
            .build();

        let mut hooks: Vec<Arc<dyn Hook>> = Vec::with_capacity(self.hooks.len() + 1);
        if self.report_caller {
            hooks.push(Arc::new(ReportCallerHook));
        }
        hooks.extend(self.hooks);

        let mut fields = Fields::new();
        if !self.project.is_empty() {
            fields.insert("project", self.project);
        }

        Logger::from_backend(LogBackend::new(logger, self.level, hooks, fields, writer))
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("level", &self.level)
            .field("project", &self.project)
            .field("report_caller", &self.report_caller)
            .field(
                "hooks",
                &self.hooks.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::backends::log_backend::{builder, Hook};
    use crate::core::{MemoryWriter, Record, Result};
    use std::sync::Arc;

    #[test]
    fn test_empty_project_adds_no_field() {
        let sink = MemoryWriter::new();
        builder().project("").build(sink.clone()).info("x");
        assert!(!sink.contents().contains("project"));
    }

    #[test]
    fn test_hooks_from_iterator() {
        let tag = |record: &mut Record| -> Result<()> {
            record.fields.insert("tagged", true);
            Ok(())
        };
        let hooks: Vec<Arc<dyn Hook>> = vec![Arc::new(tag)];

        let sink = MemoryWriter::new();
        builder().hooks(hooks).build(sink.clone()).info("x");
        assert!(sink.contents().contains("\"tagged\":true"));
    }

    #[test]
    fn test_builder_debug_lists_hooks() {
        let rendered = format!("{:?}", builder().report_caller());
        assert!(rendered.contains("report_caller: true"));
    }
}
