//! How serious a diagnostic is, and which verbosity level shows it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic, ordered from `Note` (least) to `Error` (most).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Annealing progress and run summaries.
    Note,
    /// Suspicious input that the run tolerates, e.g. unknown connection ids.
    Warning,
    /// A layout that cannot be built.
    Error,
}

impl Severity {
    /// Returns whether a diagnostic of this severity is printed.
    ///
    /// Errors always are. `quiet` hides warnings and notes; notes otherwise
    /// need `verbose`.
    pub fn is_visible(self, quiet: bool, verbose: bool) -> bool {
        match self {
            Severity::Error => true,
            Severity::Warning => !quiet,
            Severity::Note => verbose && !quiet,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}
