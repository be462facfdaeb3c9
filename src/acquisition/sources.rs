//! Collaborator contracts for the acquisition layer.
//!
//! Purpose
//! -------
//! Define the services the acquisition state machines call into, without
//! implementing any wire protocol or file format:
//! - [`HostResolver`]: ordered list of remote servers to try.
//! - [`NdsClient`]: authenticated connection plus bulk query against a
//!   remote data server.
//! - [`FrameDiscovery`] / [`FrameIndex`]: frametype lookup and frame-file
//!   location in the local archive.
//! - [`FrameReader`]: bulk decoding of located frame files.
//! - [`OpenDataSource`]: public open-data download.
//!
//! Key behaviors
//! -------------
//! - [`DataSources`] bundles borrowed implementations plus the
//!   [`AcquisitionConfig`]. Every backend except the resolver is optional;
//!   calling a tier whose backend is absent fails with
//!   [`AcquisitionError::MissingBackend`], the retryable "not installed"
//!   class.
//! - Implementations signal retryable failures with `Runtime`- or
//!   `Value`-kind errors (see [`FailureKind`](super::FailureKind)).
//!
//! Conventions
//! -----------
//! - Times passed to collaborators are GPS seconds. Remote queries receive
//!   whole-second bounds; archive queries receive the exact bounds.
//! - Channel lists are the names as the caller wrote them for remote
//!   queries (type suffix included) and the bare names for frame reads.
use crate::acquisition::config::{AcquisitionConfig, NdsHost};
use crate::acquisition::errors::{AcquisitionError, AcquisitionResult};
use crate::detector::Channel;
use crate::time::LigoTimeGps;
use crate::timeseries::{TimeSeries, TimeSeriesBuilder, TimeSeriesDict};
use crate::types::{DType, Element, Series, SeriesResult, Time};
use ndarray::Array1;
use regex::Regex;

/// Open connection handle returned by [`NdsClient::auth_connect`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NdsConnection {
    pub host: String,
    pub port: Option<u16>,
}

impl NdsConnection {
    pub fn new(host: impl Into<String>, port: Option<u16>) -> NdsConnection {
        NdsConnection { host: host.into(), port }
    }
}

/// Bulk remote query over `[start, end)` in whole GPS seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct NdsRequest<A> {
    pub channels: Vec<String>,
    pub start: i64,
    pub end: i64,
    pub channel_type: Option<String>,
    pub dtype: Option<DType>,
    pub pad: Option<A>,
    pub allow_tape: Option<bool>,
    pub verify: bool,
}

/// One channel's worth of data as delivered by a remote server.
#[derive(Debug, Clone, PartialEq)]
pub struct NdsBuffer<A> {
    pub channel: Channel,
    pub gps_seconds: i64,
    pub gps_nanoseconds: u32,
    pub data: Array1<A>,
}

impl<A: Element> Series<A, Time> {
    /// Time series from a server buffer: epoch from the buffer, rate and
    /// unit from its channel, name from the channel's server name.
    pub fn from_nds_buffer(buffer: NdsBuffer<A>) -> SeriesResult<TimeSeries<A>> {
        let epoch = LigoTimeGps::new(buffer.gps_seconds, buffer.gps_nanoseconds);
        let mut builder = TimeSeriesBuilder::new(buffer.data).epoch(epoch).name(buffer.channel.ndsname());
        if let Some(rate) = buffer.channel.sample_rate() {
            builder = builder.sample_rate(rate);
        }
        if let Some(unit) = buffer.channel.unit() {
            builder = builder.unit(unit.clone());
        }
        builder.channel(buffer.channel).build()
    }
}

/// Bulk frame read over `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRequest<A> {
    pub start: f64,
    pub end: f64,
    pub pad: Option<A>,
    pub dtype: Option<DType>,
    pub nproc: usize,
    pub format: String,
}

/// Open-data download for one detector.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenDataRequest {
    pub ifo: String,
    pub start: f64,
    pub end: f64,
    pub sample_rate: f64,
    pub format: Option<String>,
    pub host: String,
}

/// Orders remote servers for a site and query epoch.
pub trait HostResolver {
    fn host_resolution_order(&self, ifo: Option<&str>, epoch: f64) -> Vec<NdsHost>;
}

/// Remote data server client.
pub trait NdsClient<A: Element> {
    fn auth_connect(&self, host: &str, port: Option<u16>) -> AcquisitionResult<NdsConnection>;

    /// Buffers for `request.channels`, in request order.
    fn fetch(&self, connection: &NdsConnection, request: &NdsRequest<A>) -> AcquisitionResult<Vec<NdsBuffer<A>>>;
}

/// Connected frame-file index.
pub trait FrameIndex {
    fn find_frame_urls(
        &self, observatory: &str, frametype: &str, start: f64, end: f64, urltype: &str,
    ) -> AcquisitionResult<Vec<String>>;
}

/// Frametype discovery service for the local archive.
pub trait FrameDiscovery {
    fn find_best_frametype(
        &self, channel: &str, start: f64, end: f64, frametype_match: Option<&Regex>, allow_tape: bool,
    ) -> AcquisitionResult<String>;

    fn connect(&self) -> AcquisitionResult<Box<dyn FrameIndex + '_>>;
}

/// Bulk reader for located frame files.
pub trait FrameReader<A: Element> {
    /// Series keyed by the entries of `names`.
    fn read(&self, locations: &[String], names: &[String], request: &ReadRequest<A>)
    -> AcquisitionResult<TimeSeriesDict<A>>;
}

/// Public open-data archive.
pub trait OpenDataSource<A: Element> {
    fn fetch_open_data(&self, request: &OpenDataRequest) -> AcquisitionResult<TimeSeries<A>>;
}

/// Borrowed collaborator implementations plus environment settings.
pub struct DataSources<'a, A: Element> {
    pub config: AcquisitionConfig,
    pub resolver: &'a dyn HostResolver,
    pub nds: Option<&'a dyn NdsClient<A>>,
    pub discovery: Option<&'a dyn FrameDiscovery>,
    pub reader: Option<&'a dyn FrameReader<A>>,
    pub open_data: Option<&'a dyn OpenDataSource<A>>,
}

impl<'a, A: Element> DataSources<'a, A> {
    pub fn new(config: AcquisitionConfig, resolver: &'a dyn HostResolver) -> DataSources<'a, A> {
        DataSources { config, resolver, nds: None, discovery: None, reader: None, open_data: None }
    }

    pub fn with_nds(mut self, nds: &'a dyn NdsClient<A>) -> Self {
        self.nds = Some(nds);
        self
    }

    pub fn with_frames(mut self, discovery: &'a dyn FrameDiscovery, reader: &'a dyn FrameReader<A>) -> Self {
        self.discovery = Some(discovery);
        self.reader = Some(reader);
        self
    }

    pub fn with_open_data(mut self, open_data: &'a dyn OpenDataSource<A>) -> Self {
        self.open_data = Some(open_data);
        self
    }

    pub(crate) fn nds(&self) -> AcquisitionResult<&'a dyn NdsClient<A>> {
        self.nds.ok_or(AcquisitionError::MissingBackend { backend: "nds" })
    }

    pub(crate) fn discovery(&self) -> AcquisitionResult<&'a dyn FrameDiscovery> {
        self.discovery.ok_or(AcquisitionError::MissingBackend { backend: "frame discovery" })
    }

    pub(crate) fn reader(&self) -> AcquisitionResult<&'a dyn FrameReader<A>> {
        self.reader.ok_or(AcquisitionError::MissingBackend { backend: "frame reader" })
    }

    pub(crate) fn open_data(&self) -> AcquisitionResult<&'a dyn OpenDataSource<A>> {
        self.open_data.ok_or(AcquisitionError::MissingBackend { backend: "open data" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeseries::TimeDomain;
    use crate::types::Unit;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // A server buffer carries all the metadata a time series needs.
    fn buffer_converts_with_channel_metadata() {
        let channel = Channel::new("H1:GDS-CALIB_STRAIN,online")
            .with_sample_rate(4.0)
            .with_unit(Unit::parse("strain").unwrap());
        let buffer = NdsBuffer {
            channel,
            gps_seconds: 1_000_000_000,
            gps_nanoseconds: 500_000_000,
            data: array![1.0, 2.0, 3.0, 4.0],
        };
        let ts = Series::from_nds_buffer(buffer).unwrap();
        assert_eq!(ts.t0(), 1_000_000_000.5);
        assert_eq!(ts.dt(), 0.25);
        assert_eq!(ts.name(), Some("H1:GDS-CALIB_STRAIN,online"));
        assert_eq!(ts.unit().to_string(), "strain");
        assert_eq!(ts.channel().map(Channel::name), Some("H1:GDS-CALIB_STRAIN"));
    }

    #[test]
    fn missing_backends_are_import_failures() {
        struct NoHosts;
        impl HostResolver for NoHosts {
            fn host_resolution_order(&self, _: Option<&str>, _: f64) -> Vec<NdsHost> {
                Vec::new()
            }
        }
        let sources: DataSources<'_, f64> = DataSources::new(AcquisitionConfig::default(), &NoHosts);
        assert_eq!(sources.nds().err(), Some(AcquisitionError::MissingBackend { backend: "nds" }));
        assert!(sources.reader().is_err());
    }
}
