//! Crate error types
//!
//! Only initialization can fail. Once an encounter is running, the simulation
//! skips or clamps instead of erroring (a missed spawn window is never fatal).

use std::fmt;
use std::path::PathBuf;

/// Top-level error enum for Space Defender
#[derive(Debug)]
pub enum Error {
    /// A collaborator surface required by the frame driver was not supplied.
    MissingCollaborator {
        /// Which surface was missing ("render target", "audio sink", ...)
        surface: &'static str,
    },

    /// A tuning value is outside its safe operating range.
    InvalidTuning {
        /// Name of the field (for logging)
        field: &'static str,
        /// The value that was rejected
        value: f64,
        /// Human-readable description of the safe range
        reason: &'static str,
    },

    /// A boss or elite was requested by a name no archetype has.
    UnknownArchetype {
        /// "boss" or "elite"
        kind: &'static str,
        name: String,
    },

    /// Tuning file could not be read.
    TuningRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Tuning JSON could not be parsed.
    TuningParse(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingCollaborator { surface } => {
                write!(f, "cannot start encounter: no {} was provided", surface)
            }
            Error::InvalidTuning {
                field,
                value,
                reason,
            } => write!(f, "tuning '{}' = {} is invalid: {}", field, value, reason),
            Error::UnknownArchetype { kind, name } => write!(f, "no {} named '{}'", kind, name),
            Error::TuningRead { path, source } => {
                write!(f, "failed to read tuning file {}: {}", path.display(), source)
            }
            Error::TuningParse(e) => write!(f, "failed to parse tuning JSON: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::TuningRead { source, .. } => Some(source),
            Error::TuningParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::TuningParse(e)
    }
}

/// Convenience alias: a `Result` using the crate `Error`.
pub type Result<T> = std::result::Result<T, Error>;
