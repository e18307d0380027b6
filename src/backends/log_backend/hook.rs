//! Record hooks
//!
//! Hooks see each record before it is handed to `env_logger` and may edit
//! it in place. A hook that fails is reported on stderr; the record is still
//! written.

use crate::core::{caller, Record, Result, Severity};

pub trait Hook: Send + Sync {
    fn name(&self) -> &str;

    /// Severities this hook fires for.
    fn levels(&self) -> &[Severity] {
        &Severity::ALL
    }

    fn fire(&self, record: &mut Record) -> Result<()>;
}

impl<F> Hook for F
where
    F: Fn(&mut Record) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        std::any::type_name::<F>()
    }

    fn fire(&self, record: &mut Record) -> Result<()> {
        self(record)
    }
}

/// Fills [`Record::caller`] from the record's call site.
///
/// Installed first when caller reporting is on, so later hooks can read the
/// caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportCallerHook;

impl Hook for ReportCallerHook {
    fn name(&self) -> &str {
        "report_caller"
    }

    fn fire(&self, record: &mut Record) -> Result<()> {
        // only facade frames may sit between the log call and the resolver
        record.caller = match record.call_site {
            Some(call_site) => caller::resolve(call_site),
            None => None,
        };
        Ok(())
    }
}
