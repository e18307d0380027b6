//! Output formats for log records
//!
//! Provides different renderings of a record's attribute list:
//! - Text: Human-readable format
//! - Json: Machine-readable JSON format (default)
//! - Logfmt: Key-value format compatible with log aggregation tools

use super::error::Result;
use super::fields::FieldValue;
use super::record::{Attr, Record, LEVEL_KEY, MESSAGE_KEY, TIMESTAMP_KEY};
use super::severity::Severity;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Turns a record into one line of output (without the trailing newline).
///
/// Implement this to plug a custom layout into the log backend.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &Record) -> Result<String>;
}

impl<F> Formatter for F
where
    F: Fn(&Record) -> Result<String> + Send + Sync,
{
    fn format(&self, record: &Record) -> Result<String> {
        self(record)
    }
}

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO ] Request processed project=svc`
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"level":"info","message":"Request processed","timestamp":"2025-01-08T10:30:45.123Z"}`
    #[default]
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=info message="Request processed"`
    Logfmt,
}

impl OutputFormat {
    /// Format a record according to this output format
    pub fn format_record(&self, record: &Record, timestamp_format: &TimestampFormat) -> String {
        self.render(&record.attrs(timestamp_format))
    }

    /// Render an attribute list; attrs with an empty key are skipped.
    pub fn render(&self, attrs: &[Attr]) -> String {
        match self {
            OutputFormat::Text => render_text(attrs, None),
            OutputFormat::Json => render_json(attrs),
            OutputFormat::Logfmt => render_logfmt(attrs),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Logfmt => "logfmt",
        }
    }
}

impl Formatter for OutputFormat {
    fn format(&self, record: &Record) -> Result<String> {
        Ok(self.format_record(record, &TimestampFormat::default()))
    }
}

/// Configurable formatter for the built-in output formats
///
/// # Example
///
/// ```
/// use logany::{LineFormatter, OutputFormat, TimestampFormat};
///
/// let formatter = LineFormatter::new(OutputFormat::Text)
///     .with_timestamp_format(TimestampFormat::Rfc3339)
///     .with_colors(false);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineFormatter {
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
    use_colors: bool,
}

impl LineFormatter {
    pub fn new(output_format: OutputFormat) -> Self {
        Self {
            output_format,
            timestamp_format: TimestampFormat::default(),
            use_colors: false,
        }
    }

    pub fn text() -> Self {
        Self::new(OutputFormat::Text)
    }

    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Colour the level in text output. Ignored by the other formats and
    /// without the `color` feature.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

impl Formatter for LineFormatter {
    fn format(&self, record: &Record) -> Result<String> {
        let attrs = record.attrs(&self.timestamp_format);
        match self.output_format {
            OutputFormat::Text if self.use_colors => Ok(render_text(&attrs, Some(record.severity))),
            other => Ok(other.render(&attrs)),
        }
    }
}

/// Sanitize a message so one record stays on one line
///
/// Replaces newlines, carriage returns, and tabs with escape sequences
/// to prevent attackers from injecting fake log entries.
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn text_value(attrs: &[Attr], key: &str) -> Option<String> {
    attrs
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.to_string())
}

/// Format as human-readable text: `[timestamp] [LEVEL] message key=value ...`
fn render_text(attrs: &[Attr], paint: Option<Severity>) -> String {
    let timestamp = text_value(attrs, TIMESTAMP_KEY).unwrap_or_default();
    let level = text_value(attrs, LEVEL_KEY)
        .unwrap_or_default()
        .to_ascii_uppercase();
    let message = text_value(attrs, MESSAGE_KEY).unwrap_or_default();

    let level = format!("{:5}", level);
    let level = match paint {
        #[cfg(feature = "color")]
        Some(severity) => {
            use colored::Colorize;
            level.color(severity.color_code()).to_string()
        }
        #[cfg(not(feature = "color"))]
        Some(_) => level,
        None => level,
    };

    let mut line = format!("[{}] [{}] {}", timestamp, level, sanitize_message(&message));

    for attr in attrs {
        if attr.is_empty() || matches!(attr.key.as_str(), TIMESTAMP_KEY | LEVEL_KEY | MESSAGE_KEY) {
            continue;
        }
        line.push(' ');
        line.push_str(&attr.key);
        line.push('=');
        line.push_str(&sanitize_message(&attr.value.to_string()));
    }
    line
}

/// Format as a single JSON object
fn render_json(attrs: &[Attr]) -> String {
    let mut json_obj = serde_json::Map::new();
    for attr in attrs.iter().filter(|a| !a.is_empty()) {
        json_obj.insert(attr.key.clone(), attr.value.to_json_value());
    }
    serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
}

/// Format as logfmt (key=value pairs)
fn render_logfmt(attrs: &[Attr]) -> String {
    attrs
        .iter()
        .filter(|a| !a.is_empty())
        .map(|attr| {
            let value = match &attr.value {
                // Message is always quoted for safety
                FieldValue::String(s) if attr.key == MESSAGE_KEY => quote_logfmt_value(s),
                FieldValue::String(s) => escape_logfmt_value(s),
                FieldValue::Json(v) => quote_logfmt_value(&v.to_string()),
                other => other.to_string(),
            };
            format!("{}={}", escape_logfmt_key(&attr.key), value)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape a logfmt key (remove spaces and special chars)
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect()
}

/// Escape a logfmt value (quote if contains spaces)
fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty()
        || value.contains(' ')
        || value.contains('"')
        || value.contains('=')
        || value.contains('\n')
    {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

/// Quote a logfmt value
fn quote_logfmt_value(value: &str) -> String {
    format!(
        "\"{}\"",
        value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    )
}
