//! Severity definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered importance of a log record.
///
/// `Fatal` and `Panic` sit above every level the backends know natively;
/// their backend representation is synthesized by each backend's level
/// mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    Panic = 6,
}

impl Severity {
    /// Every severity, lowest first.
    pub const ALL: [Severity; 7] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
        Severity::Panic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Panic => "panic",
        }
    }

    /// Numeric code of the severity.
    ///
    /// Native levels are four apart so the synthesized ones can be slotted
    /// in without disturbing the order: trace −8, debug −4, info 0, warn 4,
    /// error 8, fatal 12, panic 16.
    pub const fn code(&self) -> i8 {
        match self {
            Severity::Trace => -8,
            Severity::Debug => -4,
            Severity::Info => 0,
            Severity::Warn => 4,
            Severity::Error => 8,
            Severity::Fatal => 12,
            Severity::Panic => 16,
        }
    }

    /// Whether a record of this severity passes a `min` threshold.
    #[inline]
    pub fn passes(&self, min: Severity) -> bool {
        *self >= min
    }

    #[cfg(feature = "color")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Trace => BrightBlack,
            Severity::Debug => Blue,
            Severity::Info => Green,
            Severity::Warn => Yellow,
            Severity::Error => Red,
            Severity::Fatal => BrightRed,
            Severity::Panic => Magenta,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" | "print" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "panic" => Ok(Severity::Panic),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        for pair in Severity::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should be below {}", pair[0], pair[1]);
            assert!(pair[0].code() < pair[1].code());
        }
    }

    #[test]
    fn test_passes_threshold() {
        assert!(Severity::Warn.passes(Severity::Info));
        assert!(Severity::Info.passes(Severity::Info));
        assert!(!Severity::Debug.passes(Severity::Info));
        assert!(Severity::Panic.passes(Severity::Fatal));
        assert!(!Severity::Error.passes(Severity::Fatal));
    }

    #[test]
    fn test_parse() {
        assert_eq!("WARNING".parse::<Severity>().unwrap(), Severity::Warn);
        assert_eq!("Fatal".parse::<Severity>().unwrap(), Severity::Fatal);
        assert_eq!("print".parse::<Severity>().unwrap(), Severity::Info);

        let err = "verbose".parse::<Severity>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid log level: 'verbose'");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Severity::Panic).unwrap();
        assert_eq!(json, "\"panic\"");

        let parsed: Severity = serde_json::from_str("\"trace\"").unwrap();
        assert_eq!(parsed, Severity::Trace);
    }
}
