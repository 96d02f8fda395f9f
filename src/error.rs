//! Load-time error type
//!
//! The simulation itself never fails: degenerate physics cases are handled by
//! local guards. Errors only arise when reading stage and settings data.

use std::fmt;

/// Errors raised while loading stage or settings data
#[derive(Debug)]
pub enum Error {
    /// File could not be read
    Io(std::io::Error),
    /// File is not valid JSON for the expected schema
    Json(serde_json::Error),
    /// A brick placement names a type outside 1..=5
    UnknownBrickType {
        stage: usize,
        index: usize,
        value: u8,
    },
    /// The stage file has no stages
    NoStages,
    /// A settings value is out of range
    InvalidSetting {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::UnknownBrickType {
                stage,
                index,
                value,
            } => write!(
                f,
                "stage {}: brick {} has unknown brick_type {}",
                stage + 1,
                index,
                value
            ),
            Error::NoStages => write!(f, "stage file contains no stages"),
            Error::InvalidSetting { field, reason } => {
                write!(f, "invalid setting `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unknown_brick_type_is_one_based() {
        let err = Error::UnknownBrickType {
            stage: 0,
            index: 3,
            value: 9,
        };
        assert_eq!(err.to_string(), "stage 1: brick 3 has unknown brick_type 9");
    }

    #[test]
    fn test_json_error_has_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
