//! time::errors — failures while normalizing time arguments.
//!
//! Purpose
//! -------
//! Report time inputs that cannot be turned into GPS seconds or back into a
//! UTC timestamp. Every start, end, and epoch argument in the crate passes
//! through [`to_gps`](crate::time::to_gps), so these errors surface wherever
//! a time is accepted.
//!
//! Conventions
//! -----------
//! - Messages quote the offending input verbatim.
//! - These errors are deterministic and never retried by acquisition
//!   fallbacks.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type TimeResult<T> = Result<T, TimeError>;

/// TimeError — invalid or unrepresentable time values.
///
/// Variants
/// --------
/// - `Unparseable { input }`
///   A string matched none of the accepted numeric or calendar formats.
/// - `NonFinite { value }`
///   A numeric time was NaN or infinite.
/// - `OutOfRange { value }`
///   A GPS time falls outside the range representable as a UTC timestamp.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeError {
    Unparseable { input: String },
    NonFinite { value: f64 },
    OutOfRange { value: f64 },
}

impl std::error::Error for TimeError {}

impl std::fmt::Display for TimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeError::Unparseable { input } => {
                write!(f, "Cannot parse '{input}' as a GPS time or date")
            }
            TimeError::NonFinite { value } => {
                write!(f, "Time must be finite; got: {value}")
            }
            TimeError::OutOfRange { value } => {
                write!(f, "GPS time {value} is outside the representable UTC range")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<TimeError> for PyErr {
    fn from(err: TimeError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_quote_the_input() {
        let err = TimeError::Unparseable { input: "yesterday-ish".into() };
        assert!(err.to_string().contains("'yesterday-ish'"));
        assert!(TimeError::NonFinite { value: f64::NAN }.to_string().contains("NaN"));
    }
}
