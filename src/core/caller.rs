//! Call-site resolution for caller reporting
//!
//! The public emission methods of [`Logger`](super::Logger) are
//! `#[track_caller]`, so the location captured at the facade boundary is
//! already the first frame outside the facade. That gives file and line.
//! The calling function's name is not part of a `Location`, so it comes from
//! a bounded stack walk that skips this crate's frames.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::OnceLock;

/// Source directory of this crate, computed on first use.
static FACADE_ROOT: OnceLock<&'static Path> = OnceLock::new();

/// Frames the unwinder contributes above this module's own, counted once.
static UNWINDER_FRAMES: OnceLock<usize> = OnceLock::new();

/// Frames inspected past the unwinder's own before giving up.
pub const MAX_DEPTH: usize = 25;

const FACADE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");
const COUNTER_SYMBOL: &str = concat!(module_path!(), "::count_unwinder_frames");
const WALKER_SYMBOL: &str = concat!(module_path!(), "::caller_function");

/// Source location of the code that issued a log call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    pub file: String,
    pub line: u32,
}

impl CallerFrame {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            function: None,
            file: file.into(),
            line,
        }
    }

    #[must_use]
    pub fn with_function(mut self, function: Option<String>) -> Self {
        self.function = function;
        self
    }
}

impl From<&Location<'_>> for CallerFrame {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for CallerFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if let Some(ref function) = self.function {
            write!(f, " ({})", function)?;
        }
        Ok(())
    }
}

/// The `src/` directory this resolver was compiled from.
fn facade_root() -> &'static Path {
    FACADE_ROOT.get_or_init(|| {
        // this file lives at <root>/core/caller.rs
        let here: &'static Path = Path::new(file!());
        here.parent()
            .and_then(Path::parent)
            .unwrap_or(here)
    })
}

/// Whether `location` points into the facade's own sources.
pub fn is_internal(location: &Location<'_>) -> bool {
    Path::new(location.file()).starts_with(facade_root())
}

/// Whether a demangled symbol belongs to this crate.
///
/// Trait impls demangle as `<Type as Trait>::method`, so the leading `<` is
/// ignored and only the implementing type decides.
pub fn is_facade_symbol(name: &str) -> bool {
    name.trim_start_matches('<').starts_with(FACADE_PREFIX)
}

fn symbol_names(frame: &backtrace::Frame) -> Vec<String> {
    let mut names = Vec::new();
    // inlined callees come before the function they were inlined into
    backtrace::resolve_frame(frame, |symbol| {
        if let Some(name) = symbol.name() {
            names.push(format!("{:#}", name));
        }
    });
    names
}

/// Count the unwinder's own frames sitting above this function's frame.
#[inline(never)]
fn count_unwinder_frames() -> usize {
    let mut depth = 0;
    let mut found = None;
    backtrace::trace(|frame| {
        if symbol_names(frame).iter().any(|name| name == COUNTER_SYMBOL) {
            found = Some(depth);
            return false;
        }
        depth += 1;
        depth < MAX_DEPTH
    });
    found.unwrap_or(0)
}

/// Name of the first function outside the facade on the current stack.
///
/// Must be reached from inside the facade; frames below the facade's own are
/// the caller's. Returns `None` when symbols are unavailable or no outside
/// frame is found within [`MAX_DEPTH`] frames.
#[inline(never)]
pub fn caller_function() -> Option<String> {
    let skip = *UNWINDER_FRAMES.get_or_init(count_unwinder_frames);
    let mut depth = 0;
    let mut walker_seen = false;
    let mut found = None;

    backtrace::trace(|frame| {
        depth += 1;
        if depth <= skip {
            return true;
        }
        for name in symbol_names(frame) {
            if !walker_seen {
                walker_seen = name == WALKER_SYMBOL;
            } else if !is_facade_symbol(&name) {
                found = Some(name);
                return false;
            }
        }
        depth < skip + MAX_DEPTH
    });
    found
}

/// Resolve the caller frame for a captured location.
///
/// Returns `None` when the location lies inside the facade, in which case
/// the record is emitted without caller information.
pub fn resolve(location: &Location<'_>) -> Option<CallerFrame> {
    if is_internal(location) {
        return None;
    }
    Some(CallerFrame::from(location).with_function(caller_function()))
}
