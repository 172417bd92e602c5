//! Errors raised while building a layout.

use crate::ids::BlockId;
use stackplan_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Why a layout could not be built.
///
/// Annealing itself never fails; only construction of the starting layout does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Caller-supplied blocks or parameters are malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A block could not be placed without overlap within the attempt bound.
    #[error("unable to place block {block} without overlapping after {attempts} attempts")]
    PlacementInfeasible {
        /// The block that could not be placed.
        block: BlockId,
        /// Random placements tried before giving up.
        attempts: u32,
    },
}

impl LayoutError {
    /// Creates an [`InvalidInput`](LayoutError::InvalidInput) error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Returns the diagnostic code reported for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            LayoutError::InvalidInput(_) => DiagnosticCode::new(Category::Error, 101),
            LayoutError::PlacementInfeasible { .. } => DiagnosticCode::new(Category::Error, 102),
        }
    }

    /// Converts this error into an error diagnostic with a remediation hint.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            LayoutError::InvalidInput(_) => diag,
            LayoutError::PlacementInfeasible { attempts: 0, .. } => diag
                .with_note("the block is larger than the floorplan")
                .with_help("increase the floorplan size"),
            LayoutError::PlacementInfeasible { .. } => {
                diag.with_help("increase the floorplan size or the number of layers")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackplan_diagnostics::Severity;

    #[test]
    fn display_infeasible() {
        let err = LayoutError::PlacementInfeasible {
            block: BlockId::from_raw(7),
            attempts: 1000,
        };
        assert_eq!(
            format!("{err}"),
            "unable to place block 7 without overlapping after 1000 attempts"
        );
    }

    #[test]
    fn display_invalid() {
        let err = LayoutError::invalid("layer count must be at least 1");
        assert_eq!(format!("{err}"), "invalid input: layer count must be at least 1");
    }

    #[test]
    fn diagnostic_codes() {
        let invalid = LayoutError::invalid("x").to_diagnostic();
        assert_eq!(invalid.severity, Severity::Error);
        assert_eq!(format!("{}", invalid.code), "E101");

        let infeasible = LayoutError::PlacementInfeasible {
            block: BlockId::from_raw(1),
            attempts: 0,
        }
        .to_diagnostic();
        assert_eq!(format!("{}", infeasible.code), "E102");
        assert_eq!(infeasible.notes.len(), 1);
        assert_eq!(infeasible.help.len(), 1);
    }
}
