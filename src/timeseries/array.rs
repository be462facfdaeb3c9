//! ArrayTimeSeries — two-dimensional values indexed by time along axis 0.
//!
//! Each row is one time sample; axis 1 is a second, non-time axis with its
//! own descriptor and unit (for example frequency bins or sensor index).
//! This type is deprecated in favour of per-column [`TimeSeries`] values and
//! logs a warning whenever one is built.
//!
//! [`TimeSeries`]: crate::timeseries::TimeSeries
use crate::detector::Channel;
use crate::time::{TimeInput, to_gps};
use crate::timeseries::core::{TimeDomain, step_for_rate};
use crate::types::{
    Element, Generic, Indexed, Series, SeriesError, SeriesResult, Time, Unit, XIndex,
};
use ndarray::{Array2, Axis};
use std::sync::Arc;

/// Time-by-y array with unit, name, and channel metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayTimeSeries<A> {
    value: Arc<Array2<A>>,
    unit: Unit,
    name: Option<String>,
    channel: Option<Channel>,
    xindex: XIndex,
    xunit: Unit,
    yindex: XIndex,
    yunit: Unit,
}

impl<A: Element> ArrayTimeSeries<A> {
    pub fn builder(value: Array2<A>) -> ArrayTimeSeriesBuilder<A> {
        ArrayTimeSeriesBuilder {
            value,
            times: None,
            epoch: None,
            channel: None,
            unit: None,
            sample_rate: None,
            name: None,
        }
    }

    pub fn value(&self) -> &Array2<A> {
        &self.value
    }

    /// `(n_times, n_y)`.
    pub fn shape(&self) -> (usize, usize) {
        self.value.dim()
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    pub fn yindex(&self) -> &XIndex {
        &self.yindex
    }

    pub fn yunit(&self) -> &Unit {
        &self.yunit
    }

    pub fn y0(&self) -> f64 {
        self.yindex.origin_or_default()
    }

    pub fn dy(&self) -> f64 {
        self.yindex.step_or_default()
    }

    /// Replace the y-axis descriptor; explicit indices must match `n_y`.
    pub fn with_yindex(mut self, yindex: XIndex, yunit: Unit) -> SeriesResult<ArrayTimeSeries<A>> {
        let n_y = self.shape().1;
        if let XIndex::Explicit(values) = &yindex {
            if values.len() != n_y {
                return Err(SeriesError::IndexLengthMismatch { expected: n_y, actual: values.len() });
            }
        }
        self.yindex = yindex;
        self.yunit = yunit;
        Ok(self)
    }

    /// Time series of column `j` (one y bin over time).
    pub fn column(&self, j: usize) -> Option<Series<A, Time>> {
        if j >= self.shape().1 {
            return None;
        }
        let mut out = Series::<A, Time>::new(self.value.index_axis(Axis(1), j).to_owned())
            .with_unit(self.unit.clone())
            .with_xunit(self.xunit.clone());
        out.set_xindex(self.xindex.clone());
        out.set_name(self.name.clone());
        out.set_channel(self.channel.clone());
        Some(out)
    }

    /// Series of row `i` (one time sample across y).
    pub fn row(&self, i: usize) -> Option<Series<A, Generic>> {
        if i >= self.shape().0 {
            return None;
        }
        let mut out = Series::<A, Generic>::new(self.value.index_axis(Axis(0), i).to_owned())
            .with_unit(self.unit.clone())
            .with_xunit(self.yunit.clone());
        out.set_xindex(self.yindex.clone());
        out.set_name(self.name.clone());
        Some(out)
    }
}

impl<A: Element> Indexed for ArrayTimeSeries<A> {
    fn xindex(&self) -> &XIndex {
        &self.xindex
    }

    fn xindex_mut(&mut self) -> &mut XIndex {
        &mut self.xindex
    }

    fn xunit(&self) -> &Unit {
        &self.xunit
    }

    fn x_len(&self) -> usize {
        self.shape().0
    }
}

impl<A: Element> TimeDomain for ArrayTimeSeries<A> {}

/// Builder for [`ArrayTimeSeries`]. Name, unit, and sample rate fall back to
/// the channel's when not given.
#[derive(Debug, Clone)]
pub struct ArrayTimeSeriesBuilder<A> {
    value: Array2<A>,
    times: Option<ndarray::Array1<f64>>,
    epoch: Option<TimeInput>,
    channel: Option<Channel>,
    unit: Option<Unit>,
    sample_rate: Option<f64>,
    name: Option<String>,
}

impl<A: Element> ArrayTimeSeriesBuilder<A> {
    pub fn times(mut self, times: ndarray::Array1<f64>) -> Self {
        self.times = Some(times);
        self
    }

    pub fn epoch(mut self, epoch: impl Into<TimeInput>) -> Self {
        self.epoch = Some(epoch.into());
        self
    }

    pub fn channel(mut self, channel: impl Into<Channel>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = Some(rate);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> SeriesResult<ArrayTimeSeries<A>> {
        tracing::warn!("ArrayTimeSeries is deprecated; use one TimeSeries per column instead");
        let channel = self.channel;
        let name = self.name.or_else(|| channel.as_ref().map(|c| c.name().to_string()));
        let unit = self.unit.or_else(|| channel.as_ref().and_then(|c| c.unit().cloned()));
        let sample_rate = self.sample_rate.or_else(|| channel.as_ref().and_then(Channel::sample_rate));
        let n_times = self.value.dim().0;
        let xunit = Unit::second();

        let xindex = match self.times {
            Some(times) => XIndex::explicit(times, n_times)?,
            None => {
                let t0 = self.epoch.map(to_gps).transpose()?;
                let dt = sample_rate.map(|rate| step_for_rate(rate, &xunit)).transpose()?;
                XIndex::Regular { origin: t0, step: dt }
            }
        };
        Ok(ArrayTimeSeries {
            value: Arc::new(self.value),
            unit: unit.unwrap_or_default(),
            name,
            channel,
            xindex,
            xunit,
            yindex: XIndex::default(),
            yunit: Unit::dimensionless(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Channel metadata fills in name, unit, and rate when not given.
    //
    // Given
    // -----
    // - A 3x2 array and a channel at 4 Hz in metres.
    //
    // Expect
    // ------
    // - dt = 0.25, t0 from the epoch, name and unit from the channel.
    fn channel_supplies_defaults() {
        let channel = Channel::new("H1:PEM-SEIS")
            .with_sample_rate(4.0)
            .with_unit(Unit::parse("m").unwrap());
        let arr = ArrayTimeSeries::builder(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]])
            .channel(channel)
            .epoch(1_000_000_000.0)
            .build()
            .unwrap();
        assert_eq!(arr.shape(), (3, 2));
        assert_eq!(arr.dt(), 0.25);
        assert_eq!(arr.t0(), 1_000_000_000.0);
        assert_eq!(arr.span(), (1_000_000_000.0, 1_000_000_000.75));
        assert_eq!(arr.name(), Some("H1:PEM-SEIS"));
        assert_eq!(arr.unit().to_string(), "m");
    }

    #[test]
    fn columns_and_rows_carry_their_axes() {
        let arr = ArrayTimeSeries::builder(array![[1.0, 2.0], [3.0, 4.0]])
            .sample_rate(2.0)
            .name("X1:ARR")
            .build()
            .unwrap()
            .with_yindex(XIndex::regular(10.0, 5.0).unwrap(), Unit::hertz())
            .unwrap();
        let column = arr.column(1).unwrap();
        assert_eq!(column.value(), &array![2.0, 4.0]);
        assert_eq!(column.dt(), 0.5);
        assert_eq!(column.name(), Some("X1:ARR"));

        let row = arr.row(1).unwrap();
        assert_eq!(row.value(), &array![3.0, 4.0]);
        assert_eq!(row.xvalues().into_owned(), array![10.0, 15.0]);
        assert!(arr.column(2).is_none());
    }

    #[test]
    fn y_index_length_is_checked() {
        let arr = ArrayTimeSeries::builder(array![[1.0, 2.0]]).build().unwrap();
        let bad = XIndex::explicit(array![0.0, 1.0, 2.0], 3).unwrap();
        assert!(matches!(
            arr.with_yindex(bad, Unit::hertz()),
            Err(SeriesError::IndexLengthMismatch { expected: 2, actual: 3 })
        ));
    }
}
