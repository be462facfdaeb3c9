//! Open-data download for a single detector.
use crate::acquisition::errors::{AcquisitionError, AcquisitionResult};
use crate::acquisition::sources::{DataSources, OpenDataRequest};
use crate::time::{TimeInput, to_gps};
use crate::timeseries::TimeSeries;
use crate::types::{Element, Series, Time};

pub const DEFAULT_OPEN_DATA_HOST: &str = "https://losc.ligo.org";
pub const DEFAULT_OPEN_DATA_RATE: f64 = 4096.0;

impl OpenDataRequest {
    /// Request for `ifo` (e.g. `"L1"`) over `[start, end)` at the default
    /// rate and host.
    pub fn new(
        ifo: impl Into<String>, start: impl Into<TimeInput>, end: impl Into<TimeInput>,
    ) -> AcquisitionResult<OpenDataRequest> {
        Ok(OpenDataRequest {
            ifo: ifo.into(),
            start: to_gps(start)?,
            end: to_gps(end)?,
            sample_rate: DEFAULT_OPEN_DATA_RATE,
            format: None,
            host: DEFAULT_OPEN_DATA_HOST.to_string(),
        })
    }

    pub fn sample_rate(mut self, rate: f64) -> OpenDataRequest {
        self.sample_rate = rate;
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> OpenDataRequest {
        self.format = Some(format.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> OpenDataRequest {
        self.host = host.into();
        self
    }

    fn validate(&self) -> AcquisitionResult<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(AcquisitionError::InvalidRequest {
                reason: format!("sample rate must be positive, got {}", self.sample_rate),
            });
        }
        if self.end <= self.start {
            return Err(AcquisitionError::InvalidRequest {
                reason: format!("empty interval [{}, {})", self.start, self.end),
            });
        }
        Ok(())
    }
}

impl<A: Element> Series<A, Time> {
    /// Download public data described by `request`.
    pub fn fetch_open_data(
        request: &OpenDataRequest, sources: &DataSources<'_, A>,
    ) -> AcquisitionResult<TimeSeries<A>> {
        request.validate()?;
        let source = sources.open_data()?;
        tracing::debug!(
            ifo = request.ifo.as_str(),
            host = request.host.as_str(),
            rate = request.sample_rate,
            "fetching open data"
        );
        source.fetch_open_data(request)
    }
}
