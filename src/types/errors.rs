//! Errors for the indexed-series layer (construction, metadata checks,
//! concatenation, and foreign conversion).
//!
//! This module defines [`SeriesError`], the single error type returned by
//! [`Series`](crate::types::Series), the time-domain collections built on it,
//! and the foreign-format bridges. It implements `Display`/`Error` and, with
//! the `python-bindings` feature, converts to a Python `ValueError`.
//!
//! ## Conventions
//! - Spans are reported as `(start, end)` in the series' x-axis unit.
//! - Configuration errors (mutually exclusive arguments) are never retried
//!   by any caller; they indicate a programming error at the call site.
//! - Discontinuity errors (`Discontiguous`, `Overlapping`, `StartsBefore`)
//!   are only produced when the active gap policy does not cover the gap.
use crate::time::TimeError;
use crate::types::element::DType;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for series operations that may produce [`SeriesError`].
pub type SeriesResult<T> = Result<T, SeriesError>;

/// Unified error type for series construction and manipulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    // ---- Configuration ----
    /// Two mutually exclusive constructor arguments were both supplied.
    ConflictingArguments { first: &'static str, second: &'static str },

    /// Axis step must be finite and > 0.
    InvalidStep { value: f64 },

    /// Sample rate must be finite and > 0.
    InvalidSampleRate { value: f64 },

    // ---- Index / shape ----
    /// Explicit index length does not match the number of samples.
    IndexLengthMismatch { expected: usize, actual: usize },

    /// Explicit index must be strictly increasing.
    NonMonotonicIndex { index: usize },

    /// Operation requires a regular (origin + step) axis.
    IrregularIndex { operation: &'static str },

    /// Elementwise operands differ in length.
    LengthMismatch { left: usize, right: usize },

    /// Array reshaping or concatenation failed.
    Shape { reason: String },

    // ---- Compatibility ----
    /// Operands carry different physical units.
    IncompatibleUnits { left: String, right: String },

    /// Operands carry different axis steps.
    IncompatibleStep { left: f64, right: f64 },

    /// Operands carry different axis units.
    IncompatibleXUnits { left: String, right: String },

    // ---- Discontinuity ----
    /// Appended data does not meet the end of the existing data.
    Discontiguous { left: (f64, f64), right: (f64, f64) },

    /// Appended data starts inside the existing span.
    Overlapping { left: (f64, f64), right: (f64, f64) },

    /// Appended data starts before the existing data ends (pad policy).
    StartsBefore { left: (f64, f64), right: (f64, f64) },

    /// Padding a gap would need more filler samples than allowed.
    GapTooLarge { samples: f64, limit: usize },

    /// Gap policy string was not one of `raise|warn|ignore|pad`.
    UnknownGapPolicy { policy: String },

    // ---- Collections ----
    /// Mapping lookup for a key that is not present.
    KeyNotFound { key: String },

    // ---- Units / foreign conversion ----
    /// Unit string could not be parsed or mapped.
    InvalidUnit { unit: String, reason: String },

    /// No foreign storage class exists for this element type.
    UnsupportedDType { dtype: DType, target: &'static str },

    // ---- Time ----
    /// Epoch or time argument could not be normalized.
    Time(TimeError),
}

impl std::error::Error for SeriesError {}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::ConflictingArguments { first, second } => {
                write!(f, "give only one of {first} or {second}")
            }
            SeriesError::InvalidStep { value } => {
                write!(f, "Axis step must be finite and > 0; got: {value}")
            }
            SeriesError::InvalidSampleRate { value } => {
                write!(f, "Sample rate must be finite and > 0; got: {value}")
            }
            SeriesError::IndexLengthMismatch { expected, actual } => {
                write!(f, "Index length mismatch: expected {expected}, got {actual}")
            }
            SeriesError::NonMonotonicIndex { index } => {
                write!(f, "Index must be strictly increasing; violated at position {index}")
            }
            SeriesError::IrregularIndex { operation } => {
                write!(f, "Cannot {operation} a series with an irregular index")
            }
            SeriesError::LengthMismatch { left, right } => {
                write!(f, "Operand lengths differ: {left} vs {right}")
            }
            SeriesError::Shape { reason } => {
                write!(f, "Shape error: {reason}")
            }
            SeriesError::IncompatibleUnits { left, right } => {
                write!(f, "Series have incompatible units: '{left}' vs '{right}'")
            }
            SeriesError::IncompatibleStep { left, right } => {
                write!(f, "Series have incompatible steps: {left} vs {right}")
            }
            SeriesError::IncompatibleXUnits { left, right } => {
                write!(f, "Series have incompatible axis units: '{left}' vs '{right}'")
            }
            SeriesError::Discontiguous { left, right } => {
                write!(
                    f,
                    "Cannot append discontiguous series\n  series 1 span: [{}, {})\n  series 2 span: [{}, {})",
                    left.0, left.1, right.0, right.1
                )
            }
            SeriesError::Overlapping { left, right } => {
                write!(
                    f,
                    "Cannot append overlapping series: [{}, {}) and [{}, {})",
                    left.0, left.1, right.0, right.1
                )
            }
            SeriesError::StartsBefore { left, right } => {
                write!(
                    f,
                    "Cannot append series starting at {} that starts before this one ends ({}); spans [{}, {}) and [{}, {})",
                    right.0, left.1, left.0, left.1, right.0, right.1
                )
            }
            SeriesError::GapTooLarge { samples, limit } => {
                write!(f, "Cannot pad a gap of {samples} samples; at most {limit} are allowed")
            }
            SeriesError::UnknownGapPolicy { policy } => {
                write!(f, "Unknown gap policy '{policy}'; expected one of raise, warn, ignore, pad")
            }
            SeriesError::KeyNotFound { key } => {
                write!(f, "No entry for key '{key}'")
            }
            SeriesError::InvalidUnit { unit, reason } => {
                write!(f, "Invalid unit '{unit}': {reason}")
            }
            SeriesError::UnsupportedDType { dtype, target } => {
                write!(f, "No {target} type mapping for dtype {dtype}")
            }
            SeriesError::Time(err) => write!(f, "{err}"),
        }
    }
}

impl From<TimeError> for SeriesError {
    fn from(err: TimeError) -> SeriesError {
        SeriesError::Time(err)
    }
}

impl From<ndarray::ShapeError> for SeriesError {
    fn from(err: ndarray::ShapeError) -> SeriesError {
        SeriesError::Shape { reason: err.to_string() }
    }
}

/// Convert a [`SeriesError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<SeriesError> for PyErr {
    fn from(err: SeriesError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The configuration error names both offending arguments.
    fn conflicting_arguments_message_names_both() {
        let err = SeriesError::ConflictingArguments { first: "t0", second: "epoch" };
        assert_eq!(err.to_string(), "give only one of t0 or epoch");
    }

    #[test]
    // Purpose
    // -------
    // Discontinuity messages embed both spans so the gap can be located.
    fn discontiguous_message_embeds_spans() {
        let err = SeriesError::Discontiguous { left: (0.0, 10.0), right: (11.0, 20.0) };
        let msg = err.to_string();
        assert!(msg.contains("[0, 10)"));
        assert!(msg.contains("[11, 20)"));
    }

    #[test]
    fn shape_errors_convert_from_ndarray() {
        let err: SeriesError = ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape).into();
        assert!(matches!(err, SeriesError::Shape { .. }));
    }
}
