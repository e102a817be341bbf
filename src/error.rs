//! Error types for the fallible edges of the crate.
//!
//! The simulation itself never fails: every input is a pre-validated flag or
//! coordinate. Only loading a tuning table can go wrong.

use std::fmt;

/// Errors raised while reading or validating a [`crate::Tuning`] table.
#[derive(Debug)]
pub enum TuningError {
    /// The tuning file could not be read.
    Io(std::io::Error),

    /// The document is not valid JSON or has a field of the wrong type.
    Parse(serde_json::Error),

    /// A value parsed fine but is outside its usable range.
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the constraint.
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(err) => write!(f, "failed to read tuning file: {}", err),
            TuningError::Parse(err) => write!(f, "failed to parse tuning JSON: {}", err),
            TuningError::Invalid { field, reason } => {
                write!(f, "tuning value '{}' is invalid: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(err) => Some(err),
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        TuningError::Io(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}

/// Convenience alias: a `Result` using `TuningError` as the error type.
pub type TuningResult<T> = Result<T, TuningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_display_names_field() {
        let err = TuningError::Invalid {
            field: "bullet_speed",
            reason: "must be positive",
        };
        let text = err.to_string();
        assert!(text.contains("bullet_speed"));
        assert!(text.contains("must be positive"));
    }

    #[test]
    fn test_parse_error_has_source() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = TuningError::from(parse);
        assert!(std::error::Error::source(&err).is_some());
    }
}
