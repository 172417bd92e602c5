//! Structured diagnostics for the stackplan floorplanner.
//!
//! Placement failures, connectivity warnings, and annealing progress are all
//! reported as [`Diagnostic`] values. A thread-safe [`DiagnosticSink`]
//! collects them while a run is in progress and [`TerminalRenderer`] formats
//! them for the command line.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
