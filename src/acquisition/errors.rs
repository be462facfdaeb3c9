//! acquisition::errors — failures of the data-acquisition layer.
//!
//! Purpose
//! -------
//! Describe why a data source could not serve a request, and classify each
//! failure so the fallback state machines know whether to try the next host,
//! tier, or channel, or to give up immediately.
//!
//! Key behaviors
//! -------------
//! - [`AcquisitionError::kind`] maps every variant to a [`FailureKind`]:
//!   - `Import`: the backend for a tier is not available at all.
//!   - `Runtime`: the source was reachable in principle but could not
//!     deliver (connection refused, query failed, nothing found, every
//!     fallback exhausted).
//!   - `Value`: the request itself is not servable by this source (unknown
//!     channel, no frametype).
//!   - `Fatal`: deterministic local errors that no fallback can fix.
//! - `fetch` retries across hosts on `Runtime` and `Value`; `get` falls back
//!   from archive to remote on `Import`, `Runtime`, and `Value`, and from
//!   bulk to per-channel remote on `Runtime` only.
//!
//! Conventions
//! -----------
//! - Series and time errors are always `Fatal`.
//! - The message of [`AcquisitionError::Exhausted`] names the exhausted
//!   chain and points at debug-level logging for per-host details.
use crate::time::TimeError;
use crate::types::SeriesError;

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyImportError, PyRuntimeError, PyValueError},
};

pub type AcquisitionResult<T> = Result<T, AcquisitionError>;

/// Retry class of an [`AcquisitionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Import,
    Runtime,
    Value,
    Fatal,
}

/// Errors raised while locating, connecting to, or reading from a data
/// source.
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionError {
    /// No implementation was supplied for a required collaborator.
    MissingBackend { backend: &'static str },

    /// Opening a connection to a remote server failed.
    Connection { host: String, port: Option<u16>, reason: String },

    /// A remote query or file read failed after connecting.
    Query { reason: String },

    /// The frame-file index returned nothing for the interval.
    NoFrameFiles { observatory: String, frametype: String, start: f64, end: f64 },

    /// Every host, tape setting, and per-channel fallback failed.
    Exhausted,

    /// The request cannot be served as posed.
    InvalidRequest { reason: String },

    /// No frametype contains the channel.
    NoFrametype { channel: String },

    /// A source returned data without the requested channel.
    ChannelMissing { channel: String },

    /// Channel names do not carry a parseable site code.
    UnparseableObservatory { channels: Vec<String> },

    Series(SeriesError),

    Time(TimeError),
}

impl AcquisitionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AcquisitionError::MissingBackend { .. } => FailureKind::Import,
            AcquisitionError::Connection { .. }
            | AcquisitionError::Query { .. }
            | AcquisitionError::NoFrameFiles { .. }
            | AcquisitionError::Exhausted => FailureKind::Runtime,
            AcquisitionError::InvalidRequest { .. }
            | AcquisitionError::NoFrametype { .. }
            | AcquisitionError::ChannelMissing { .. } => FailureKind::Value,
            AcquisitionError::UnparseableObservatory { .. }
            | AcquisitionError::Series(_)
            | AcquisitionError::Time(_) => FailureKind::Fatal,
        }
    }
}

impl std::error::Error for AcquisitionError {}

impl std::fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquisitionError::MissingBackend { backend } => {
                write!(f, "No {backend} backend is available")
            }
            AcquisitionError::Connection { host, port, reason } => match port {
                Some(port) => write!(f, "Failed to connect to {host}:{port}: {reason}"),
                None => write!(f, "Failed to connect to {host}: {reason}"),
            },
            AcquisitionError::Query { reason } => write!(f, "Data query failed: {reason}"),
            AcquisitionError::NoFrameFiles { observatory, frametype, start, end } => {
                write!(f, "No {observatory}-{frametype} frame files found for [{start}, {end})")
            }
            AcquisitionError::Exhausted => write!(
                f,
                "Cannot find all relevant data on any known server. Enable debug-level logging to see detailed failures."
            ),
            AcquisitionError::InvalidRequest { reason } => write!(f, "Invalid request: {reason}"),
            AcquisitionError::NoFrametype { channel } => {
                write!(f, "Cannot locate a frametype containing '{channel}'")
            }
            AcquisitionError::ChannelMissing { channel } => {
                write!(f, "Source returned no data for channel '{channel}'")
            }
            AcquisitionError::UnparseableObservatory { channels } => {
                write!(f, "Cannot parse list of IFOs from channel names: {}", channels.join(", "))
            }
            AcquisitionError::Series(err) => write!(f, "{err}"),
            AcquisitionError::Time(err) => write!(f, "{err}"),
        }
    }
}

impl From<SeriesError> for AcquisitionError {
    fn from(err: SeriesError) -> AcquisitionError {
        AcquisitionError::Series(err)
    }
}

impl From<TimeError> for AcquisitionError {
    fn from(err: TimeError) -> AcquisitionError {
        AcquisitionError::Time(err)
    }
}

/// Map each failure class to the matching Python exception type.
#[cfg(feature = "python-bindings")]
impl std::convert::From<AcquisitionError> for PyErr {
    fn from(err: AcquisitionError) -> PyErr {
        match err.kind() {
            FailureKind::Import => PyImportError::new_err(err.to_string()),
            FailureKind::Runtime => PyRuntimeError::new_err(err.to_string()),
            FailureKind::Value | FailureKind::Fatal => PyValueError::new_err(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Local errors are never classified as retryable.
    fn wrapped_errors_are_fatal() {
        let err: AcquisitionError = SeriesError::KeyNotFound { key: "x".into() }.into();
        assert_eq!(err.kind(), FailureKind::Fatal);
        let err: AcquisitionError = TimeError::NonFinite { value: f64::NAN }.into();
        assert_eq!(err.kind(), FailureKind::Fatal);
    }

    #[test]
    fn availability_errors_are_retryable() {
        assert_eq!(AcquisitionError::MissingBackend { backend: "nds" }.kind(), FailureKind::Import);
        assert_eq!(AcquisitionError::Exhausted.kind(), FailureKind::Runtime);
        assert_eq!(AcquisitionError::NoFrametype { channel: "X1:Y".into() }.kind(), FailureKind::Value);
    }

    #[test]
    fn exhausted_message_points_at_logging() {
        let msg = AcquisitionError::Exhausted.to_string();
        assert!(msg.starts_with("Cannot find all relevant data on any known server."));
        assert!(msg.contains("debug-level logging"));
    }
}
