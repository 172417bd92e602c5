//! Collector for the diagnostics of one optimization session.

use crate::diagnostic::Diagnostic;
use std::sync::Mutex;

/// Accumulates diagnostics in emission order.
///
/// Each annealing run owns its own sink; the front end merges the chosen
/// run's diagnostics into the session sink with [`extend`](Self::extend).
/// `emit` takes `&self`, so a sink can be shared by reference across threads.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.lock().push(diag);
    }

    /// Records every diagnostic of `diags`, keeping their order.
    pub fn extend(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        self.lock().extend(diags);
    }

    /// Drains the sink.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Returns a copy of everything recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
