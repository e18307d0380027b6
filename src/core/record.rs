//! Log record structure

use super::caller::CallerFrame;
use super::fields::{FieldValue, Fields};
use super::severity::Severity;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::panic::Location;

pub const TIMESTAMP_KEY: &str = "timestamp";
pub const LEVEL_KEY: &str = "level";
pub const MESSAGE_KEY: &str = "message";
pub const SOURCE_KEY: &str = "source";
pub const ERROR_KEY: &str = "error";

/// One key/value pair as it will be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: FieldValue,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// An attr with an empty key is dropped by the renderers.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

/// A single log event on its way to the writer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub severity: Severity,
    /// Level text as the backend renders it
    pub level: Cow<'static, str>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub fields: Fields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<CallerFrame>,
    /// Where the log call was issued, before caller resolution
    #[serde(skip)]
    pub call_site: Option<&'static Location<'static>>,
}

impl Record {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            level: Cow::Borrowed(severity.as_str()),
            message: message.into(),
            timestamp: Utc::now(),
            fields: Fields::new(),
            caller: None,
            call_site: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: impl Into<Cow<'static, str>>) -> Self {
        self.level = level.into();
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_call_site(mut self, call_site: &'static Location<'static>) -> Self {
        self.call_site = Some(call_site);
        self
    }

    #[must_use]
    pub fn with_caller(mut self, caller: Option<CallerFrame>) -> Self {
        self.caller = caller;
        self
    }

    /// Flatten the record into the attribute list handed to renderers.
    ///
    /// Order: timestamp, level, message, source (if any), then fields. A
    /// field that reuses a built-in key is renamed to `fields.<key>`.
    pub fn attrs(&self, timestamp_format: &TimestampFormat) -> Vec<Attr> {
        let mut attrs = Vec::with_capacity(4 + self.fields.len());
        attrs.push(Attr::new(
            TIMESTAMP_KEY,
            timestamp_format.value(&self.timestamp),
        ));
        attrs.push(Attr::new(LEVEL_KEY, &*self.level));
        attrs.push(Attr::new(MESSAGE_KEY, self.message.as_str()));
        if let Some(ref caller) = self.caller {
            attrs.push(Attr::new(SOURCE_KEY, caller.to_string()));
        }
        for (key, value) in &self.fields {
            let key = match key.as_str() {
                TIMESTAMP_KEY | LEVEL_KEY | MESSAGE_KEY | SOURCE_KEY => format!("fields.{}", key),
                _ => key.clone(),
            };
            attrs.push(Attr::new(key, value.clone()));
        }
        attrs
    }
}
