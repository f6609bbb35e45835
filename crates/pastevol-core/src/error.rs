//! Error and warning types for the parsing and volume pipeline.

use serde::Serialize;
use thiserror::Error;

/// Fatal errors that abort a load. No [`crate::document::BoardDocument`] is
/// produced when any of these occur; a previously loaded document stays valid.
#[derive(Debug, Error)]
pub enum GerberError {
    /// The input is empty, not valid UTF-8, or the parse options are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A command was not terminated by `*` before end of file, or a `%`
    /// parameter block was left open.
    #[error("malformed command: {0}")]
    MalformedCommand(String),

    /// A coordinate, aperture-selection, or aperture-definition command was
    /// observed before the unit/format directives.
    #[error("uninitialized format: {0}")]
    UninitializedFormat(String),

    /// A unit, format, or aperture-definition directive could not be parsed.
    #[error("invalid directive: {0}")]
    InvalidDirective(String),

    /// An operation referenced an aperture code that was never defined.
    #[error("undefined aperture D{0}")]
    UndefinedAperture(String),

    /// A draw or flash operation arrived before any aperture was selected.
    #[error("no aperture selected before {0}")]
    NoApertureSelected(String),
}

/// Non-fatal findings collected while a document is built.
///
/// Warnings never abort a parse; they are returned on the finished document
/// so the surrounding application can display or log them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParseWarning {
    /// An aperture definition used a shape this parser does not model
    /// (typically a macro reference) or carried unusable dimensions. Every
    /// flash of such an aperture is tallied as a skipped pad.
    UnsupportedAperture {
        /// Aperture D-code.
        code: String,
        /// Designator or dimension problem, verbatim.
        detail: String,
    },

    /// A draw operation was modeled as a capsule instead of a full paste
    /// deposit simulation. The resulting pad is an approximation.
    ApproximatedGeometry {
        /// Id of the pad built from the approximation.
        pad_id: u32,
        /// What was approximated.
        detail: String,
    },

    /// Geometry collapsed below a usable polygon and the pad was dropped.
    DegenerateGeometry {
        /// What degenerated.
        detail: String,
    },

    /// A recognized command was deliberately not acted on.
    IgnoredCommand {
        /// The command and why it was ignored.
        detail: String,
    },

    /// An aperture dimension was repaired (negative input, absolute value
    /// used) instead of rejecting the definition.
    NormalizedDimension {
        /// Aperture D-code.
        code: String,
        /// What was repaired.
        detail: String,
    },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedAperture { code, detail } => {
                write!(f, "unsupported aperture D{code}: {detail}")
            }
            Self::ApproximatedGeometry { pad_id, detail } => {
                write!(f, "approximated geometry for pad {pad_id}: {detail}")
            }
            Self::DegenerateGeometry { detail } => write!(f, "degenerate geometry: {detail}"),
            Self::IgnoredCommand { detail } => write!(f, "ignored command: {detail}"),
            Self::NormalizedDimension { code, detail } => {
                write!(f, "normalized dimension on D{code}: {detail}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ut_err_001_error_messages_name_the_offender() {
        let err = GerberError::UndefinedAperture("17".to_string());
        assert_eq!(err.to_string(), "undefined aperture D17");
    }

    #[test]
    fn ut_err_002_warning_display_is_human_readable() {
        let warning = ParseWarning::UnsupportedAperture {
            code: "12".to_string(),
            detail: "macro `THERMAL80`".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "unsupported aperture D12: macro `THERMAL80`"
        );
    }
}
