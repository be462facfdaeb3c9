//! acquisition — locating and retrieving data for channels.
//!
//! Purpose
//! -------
//! Implement the source-selection and retry state machines on top of
//! injected collaborators. No transport or file format lives here; callers
//! supply implementations of the traits in [`sources`] through
//! [`DataSources`].
//!
//! Key behaviors
//! -------------
//! - [`TimeSeriesDict::fetch`](crate::timeseries::TimeSeriesDict::fetch):
//!   remote servers with host rotation, tape escalation, and per-channel
//!   degradation.
//! - [`TimeSeriesDict::find`](crate::timeseries::TimeSeriesDict::find):
//!   local archive via frametype discovery, frame location, and bulk read.
//! - [`TimeSeriesDict::get`](crate::timeseries::TimeSeriesDict::get):
//!   archive, then remote bulk, then remote per channel.
//! - Each has a single-channel counterpart on `TimeSeries`, plus
//!   `TimeSeries::fetch_open_data` for the public archive.
//!
//! Conventions
//! -----------
//! - Start and end accept anything [`to_gps`](crate::time::to_gps) accepts.
//! - Retry decisions use [`FailureKind`], never message text.
//! - Diagnostics go through `tracing`: per-host failures at `warn`, tier
//!   transitions at `debug`.
pub mod config;
pub mod errors;
pub mod fetch;
pub mod find;
pub mod get;
pub mod open_data;
pub mod options;
pub mod resolver;
pub mod sources;

pub use self::config::{AcquisitionConfig, NdsHost, parse_nds_env};
pub use self::errors::{AcquisitionError, AcquisitionResult, FailureKind};
pub use self::open_data::{DEFAULT_OPEN_DATA_HOST, DEFAULT_OPEN_DATA_RATE};
pub use self::options::AcquireOptions;
pub use self::resolver::{DefaultHostResolver, default_host};
pub use self::sources::{
    DataSources, FrameDiscovery, FrameIndex, FrameReader, HostResolver, NdsBuffer, NdsClient, NdsConnection,
    NdsRequest, OpenDataRequest, OpenDataSource, ReadRequest,
};
