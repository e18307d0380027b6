//! The subscriber layer that renders facade events
//!
//! Each tracing logger owns a `Dispatch` over a `Registry` with a single
//! [`RecordLayer`]. The facade emits one event per log call carrying the
//! message plus five bookkeeping fields; the layer turns that event back into
//! a [`Record`], runs the attribute rewriters and writes one line.

use super::level::{level_label, native_label, severity_of};
use crate::core::record::{LEVEL_KEY, SOURCE_KEY};
use crate::core::{Attr, CallerFrame, FieldValue, Fields, OutputFormat, Record, Severity};
use crate::core::{SharedWriter, TimestampFormat};
use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::subscriber::Interest;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

pub(crate) const SEVERITY_FIELD: &str = "severity";
pub(crate) const FIELDS_FIELD: &str = "fields";
pub(crate) const CALLER_FILE_FIELD: &str = "caller_file";
pub(crate) const CALLER_LINE_FIELD: &str = "caller_line";
pub(crate) const CALLER_FUNCTION_FIELD: &str = "caller_function";
const MESSAGE_FIELD: &str = "message";

/// What a rewriter knows about the record an attr belongs to
#[derive(Debug, Clone, Copy)]
pub struct AttrContext<'a> {
    pub severity: Severity,
    /// The resolved call site. Only resolved when source reporting is on.
    pub caller: Option<&'a CallerFrame>,
}

/// Rewrites one attribute before rendering. Returning an attr with an empty
/// key drops it.
pub type ReplaceAttr = Arc<dyn Fn(&AttrContext<'_>, Attr) -> Attr + Send + Sync>;

/// Rewriter that swaps the native level label for the facade's names.
pub fn level_replace_attr() -> ReplaceAttr {
    Arc::new(|ctx: &AttrContext<'_>, attr: Attr| {
        if attr.key == LEVEL_KEY {
            Attr::new(LEVEL_KEY, level_label(ctx.severity).into_owned())
        } else {
            attr
        }
    })
}

/// Rewriter that points `source` at the caller instead of the facade.
pub fn source_replace_attr() -> ReplaceAttr {
    Arc::new(|ctx: &AttrContext<'_>, attr: Attr| {
        if attr.key != SOURCE_KEY {
            return attr;
        }
        match ctx.caller {
            Some(frame) => Attr::new(SOURCE_KEY, frame.to_string()),
            None => Attr::new("", FieldValue::Null),
        }
    })
}

pub(crate) struct LayerSettings {
    pub min: Severity,
    pub format: OutputFormat,
    pub timestamp_format: TimestampFormat,
    pub add_source: bool,
    pub rewriters: Vec<ReplaceAttr>,
    pub writer: SharedWriter,
}

pub(crate) struct RecordLayer {
    settings: Arc<LayerSettings>,
    max_level: LevelFilter,
}

impl RecordLayer {
    pub fn new(settings: Arc<LayerSettings>) -> Self {
        let max_level = LevelFilter::from_level(super::level::native_level(settings.min));
        Self {
            settings,
            max_level,
        }
    }

    fn render(&self, record: &Record, caller: Option<&CallerFrame>) -> String {
        let ctx = AttrContext {
            severity: record.severity,
            caller,
        };
        let attrs: Vec<Attr> = record
            .attrs(&self.settings.timestamp_format)
            .into_iter()
            .map(|attr| {
                self.settings
                    .rewriters
                    .iter()
                    .fold(attr, |attr, rewrite| rewrite(&ctx, attr))
            })
            .filter(|attr| !attr.is_empty())
            .collect();
        self.settings.format.render(&attrs)
    }
}

impl<S: Subscriber> Layer<S> for RecordLayer {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        // Callsite interest is cached across every dispatcher in the process.
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(self.max_level)
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let severity = visitor
            .severity
            .as_deref()
            .and_then(|s| s.parse::<Severity>().ok())
            .unwrap_or_else(|| severity_of(metadata.level()));
        if !severity.passes(self.settings.min) {
            return;
        }

        let mut fields = match visitor.fields.as_deref() {
            Some(json) => match serde_json::from_str::<Fields>(json) {
                Ok(fields) => fields,
                Err(e) => {
                    eprintln!("[LOGANY ERROR] Failed to decode event fields: {}", e);
                    Fields::new()
                }
            },
            None => Fields::new(),
        };
        fields.extend(visitor.extra);

        let native_source = match (self.settings.add_source, metadata.file(), metadata.line()) {
            (true, Some(file), Some(line)) => Some(CallerFrame::new(file, line)),
            _ => None,
        };
        let record = Record::new(severity, visitor.message.unwrap_or_default())
            .with_level(native_label(severity))
            .with_fields(fields)
            .with_caller(native_source);

        let caller = match (visitor.caller_file, visitor.caller_line) {
            (Some(file), Some(line)) if !file.is_empty() => Some(
                CallerFrame::new(file, u32::try_from(line).unwrap_or(u32::MAX))
                    .with_function(visitor.caller_function.filter(|f| !f.is_empty())),
            ),
            _ => None,
        };

        let line = self.render(&record, caller.as_ref());
        if let Err(e) = self.settings.writer.write_line(&line) {
            eprintln!("[LOGANY ERROR] Failed to write record: {}", e);
        }
    }
}

/// Splits an event into the facade's bookkeeping fields and anything else
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    severity: Option<String>,
    fields: Option<String>,
    caller_file: Option<String>,
    caller_line: Option<u64>,
    caller_function: Option<String>,
    extra: Fields,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            MESSAGE_FIELD => self.message = Some(value.to_string()),
            SEVERITY_FIELD => self.severity = Some(value.to_string()),
            FIELDS_FIELD => self.fields = Some(value.to_string()),
            CALLER_FILE_FIELD => self.caller_file = Some(value.to_string()),
            CALLER_FUNCTION_FIELD => self.caller_function = Some(value.to_string()),
            name => self.extra.insert(name, value),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            CALLER_LINE_FIELD => self.caller_line = Some(value),
            name => self.extra.insert(name, value),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.extra.insert(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.extra.insert(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.extra.insert(field.name(), value);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            MESSAGE_FIELD => self.message = Some(format!("{:?}", value)),
            name => self.extra.insert(name, format!("{:?}", value)),
        }
    }
}
