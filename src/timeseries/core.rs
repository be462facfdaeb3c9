//! timeseries::core — time-axis capability and construction rules.
//!
//! Purpose
//! -------
//! Specialize the generic indexed-series primitive to the time axis. The
//! axis origin is the GPS epoch `t0`, the axis step is the sampling interval
//! `dt`, and the sample rate is always derived as `1 / dt` rather than stored.
//!
//! Key behaviors
//! -------------
//! - [`TimeDomain`] renames the [`Indexed`] accessors (`t0`, `dt`, `times`,
//!   `span`) and adds derived properties (`sample_rate`, `duration`,
//!   `epoch`). It is implemented for `Series<A, Time>` and for
//!   [`ArrayTimeSeries`](crate::timeseries::ArrayTimeSeries).
//! - [`TimeSeriesBuilder`] enforces the two mutual exclusions (`t0` vs
//!   `epoch`, `dt` vs `sample_rate`) and applies a sample rate only after
//!   the rest of the series is built.
//!
//! Invariants & assumptions
//! ------------------------
//! - Setting a sample rate stores `dt = 1 / rate` converted to the axis unit,
//!   snapped to the nearest integer when the rounded value is at least one
//!   and lies within `isclose` tolerance (`atol = 1e-8`, `rtol = 1e-5`).
//!   Sub-unit steps are never snapped, so `rate = 16384` yields exactly
//!   `dt = 1/16384`.
//! - `epoch()` is `None` exactly when `t0` is unset (or unrepresentable);
//!   it never errors.
//!
//! Conventions
//! -----------
//! - `t0` and every epoch argument are GPS seconds after normalization by
//!   [`to_gps`](crate::time::to_gps).
//! - `sample_rate` is in Hz; `dt` and `duration` are in the axis unit
//!   (seconds unless overridden).
//!
//! Testing notes
//! -------------
//! - Unit tests cover the exclusivity errors, reciprocal rate/step
//!   bookkeeping with snapping, explicit `times`, and epoch round trips.
use crate::detector::Channel;
use crate::time::{TimeInput, gps_to_utc, to_gps};
use crate::types::{
    Element, Indexed, Series, SeriesError, SeriesResult, Time, Unit, XIndex,
};
use chrono::{DateTime, Utc};
use ndarray::Array1;
use std::borrow::Cow;
use std::sync::Arc;

const SNAP_ATOL: f64 = 1e-8;
const SNAP_RTOL: f64 = 1e-5;

/// `numpy.isclose` semantics: `|a - b| <= atol + rtol * |b|`.
fn isclose(a: f64, b: f64) -> bool {
    (a - b).abs() <= SNAP_ATOL + SNAP_RTOL * b.abs()
}

/// Step for `rate` Hz on an axis measured in `xunit`, integer-snapped.
pub(crate) fn step_for_rate(rate: f64, xunit: &Unit) -> SeriesResult<f64> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(SeriesError::InvalidSampleRate { value: rate });
    }
    let factor = xunit.conversion_factor(&Unit::second()).ok_or_else(|| {
        SeriesError::IncompatibleXUnits { left: xunit.to_string(), right: Unit::second().to_string() }
    })?;
    let dt = 1.0 / rate / factor;
    let rounded = dt.round();
    Ok(if rounded >= 1.0 && isclose(dt, rounded) { rounded } else { dt })
}

/// Time-axis view of an indexed value.
pub trait TimeDomain: Indexed {
    /// GPS start time (axis origin); `0` when unset.
    fn t0(&self) -> f64 {
        self.x0()
    }

    fn set_t0(&mut self, t0: Option<f64>) {
        self.xindex_mut().set_origin(t0);
    }

    /// Sampling interval (axis step) in the axis unit; `1` when unset.
    fn dt(&self) -> f64 {
        self.dx()
    }

    fn set_dt(&mut self, dt: Option<f64>) -> SeriesResult<()> {
        self.xindex_mut().set_step(dt)
    }

    /// Samples per second, `1 / dt` expressed in Hz.
    fn sample_rate(&self) -> f64 {
        let factor = self.xunit().conversion_factor(&Unit::second()).unwrap_or(1.0);
        1.0 / (self.dt() * factor)
    }

    /// Set `dt` from a rate in Hz, or clear it with `None`.
    fn set_sample_rate(&mut self, rate: Option<f64>) -> SeriesResult<()> {
        match rate {
            None => self.set_dt(None),
            Some(rate) => {
                let dt = step_for_rate(rate, self.xunit())?;
                self.set_dt(Some(dt))
            }
        }
    }

    /// Sample times, derived from `t0 + dt·k` unless explicitly given.
    fn times(&self) -> Cow<'_, Array1<f64>> {
        self.xvalues()
    }

    /// Half-open `[start, end)` covered by the samples.
    fn span(&self) -> (f64, f64) {
        self.xspan()
    }

    fn duration(&self) -> f64 {
        let (start, end) = self.span();
        end - start
    }

    /// UTC timestamp of `t0`, or `None` when `t0` is unset.
    fn epoch(&self) -> Option<DateTime<Utc>> {
        let t0 = self.xindex().origin()?;
        gps_to_utc(t0).ok()
    }

    /// Set `t0` from any time representation, or clear it with `None`.
    fn set_epoch(&mut self, epoch: Option<TimeInput>) -> SeriesResult<()> {
        let t0 = epoch.map(to_gps).transpose()?;
        self.set_t0(t0);
        Ok(())
    }
}

impl<A: Element> TimeDomain for Series<A, Time> {}

/// Builder for time series that validates the construction arguments.
///
/// Only one of `t0` / `epoch` and one of `dt` / `sample_rate` may be given;
/// `times` may be combined with either and wins.
#[derive(Debug, Clone)]
pub struct TimeSeriesBuilder<A> {
    value: Arc<Array1<A>>,
    copy: bool,
    unit: Option<Unit>,
    t0: Option<TimeInput>,
    epoch: Option<TimeInput>,
    dt: Option<f64>,
    sample_rate: Option<f64>,
    times: Option<Array1<f64>>,
    channel: Option<Channel>,
    name: Option<String>,
    xunit: Option<Unit>,
}

impl<A: Element> TimeSeriesBuilder<A> {
    pub fn new(value: Array1<A>) -> TimeSeriesBuilder<A> {
        TimeSeriesBuilder::from_shared(Arc::new(value))
    }

    /// Start from a shared buffer; the built series views it unless
    /// [`copy`](TimeSeriesBuilder::copy) is requested.
    pub fn from_shared(value: Arc<Array1<A>>) -> TimeSeriesBuilder<A> {
        TimeSeriesBuilder {
            value,
            copy: false,
            unit: None,
            t0: None,
            epoch: None,
            dt: None,
            sample_rate: None,
            times: None,
            channel: None,
            name: None,
            xunit: None,
        }
    }

    pub fn copy(mut self, copy: bool) -> Self {
        self.copy = copy;
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn t0(mut self, t0: impl Into<TimeInput>) -> Self {
        self.t0 = Some(t0.into());
        self
    }

    pub fn epoch(mut self, epoch: impl Into<TimeInput>) -> Self {
        self.epoch = Some(epoch.into());
        self
    }

    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = Some(rate);
        self
    }

    pub fn times(mut self, times: Array1<f64>) -> Self {
        self.times = Some(times);
        self
    }

    pub fn channel(mut self, channel: impl Into<Channel>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn xunit(mut self, xunit: Unit) -> Self {
        self.xunit = Some(xunit);
        self
    }

    /// Validate the arguments and build the series.
    ///
    /// Errors
    /// ------
    /// - `ConflictingArguments` when both members of an exclusive pair are set.
    /// - `InvalidStep` / `InvalidSampleRate` for non-positive spacing.
    /// - `IndexLengthMismatch` / `NonMonotonicIndex` for bad `times`.
    /// - `Time` when `t0` or `epoch` cannot be normalized.
    pub fn build(self) -> SeriesResult<Series<A, Time>> {
        if self.epoch.is_some() && self.t0.is_some() {
            return Err(SeriesError::ConflictingArguments { first: "epoch", second: "t0" });
        }
        if self.sample_rate.is_some() && self.dt.is_some() {
            return Err(SeriesError::ConflictingArguments { first: "sample_rate", second: "dt" });
        }
        let t0 = self.t0.or(self.epoch).map(to_gps).transpose()?;

        let value = if self.copy { Arc::new(self.value.as_ref().clone()) } else { self.value };
        let len = value.len();
        let mut series = Series::<A, Time>::from_shared(value);
        if let Some(xunit) = self.xunit {
            series = series.with_xunit(xunit);
        }
        if let Some(unit) = self.unit {
            series = series.with_unit(unit);
        }
        if let Some(t0) = t0 {
            series = series.with_x0(t0);
        }
        if let Some(dt) = self.dt {
            series = series.with_dx(dt)?;
        }
        if let Some(name) = self.name.or_else(|| self.channel.as_ref().map(Channel::ndsname)) {
            series = series.with_name(name);
        }
        if let Some(channel) = self.channel {
            series = series.with_channel(channel);
        }
        if let Some(rate) = self.sample_rate {
            series.set_sample_rate(Some(rate))?;
        }
        if let Some(times) = self.times {
            series = series.with_xindex(XIndex::explicit(times, len)?)?;
        }
        Ok(series)
    }
}
