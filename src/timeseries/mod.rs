//! timeseries — the time-domain layer over the indexed-series primitive.
//!
//! Purpose
//! -------
//! Give [`Series`] its time-axis meaning and provide the collections used to
//! accumulate and combine time series.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries`] is `Series<A, Time>`; [`StateTimeSeries`] is the boolean
//!   variant produced by comparisons and logical operations.
//! - [`TimeDomain`] supplies `t0`, `dt`, `sample_rate`, `times`, `span`,
//!   `duration`, and `epoch`; [`TimeSeriesBuilder`] validates construction.
//! - [`TimeSeriesList`] coalesces and joins segments of one channel;
//!   [`TimeSeriesDict`] applies the series algebra across many channels.
//! - [`ArrayTimeSeries`] is the deprecated 2-D variant.
//!
//! Downstream usage
//! ----------------
//! - Most callers only need `use rust_gwseries::timeseries::prelude::*;`.
pub mod array;
pub mod core;
pub mod dict;
pub mod frequency;
pub mod list;
pub mod resample;

pub use self::array::{ArrayTimeSeries, ArrayTimeSeriesBuilder};
pub use self::core::{TimeDomain, TimeSeriesBuilder};
pub use self::dict::{Rate, TimeSeriesDict};
pub use self::frequency::FrequencyDomain;
pub use self::list::TimeSeriesList;

use crate::types::{Frequency, Series, Time};

/// Time series with element type `A`.
pub type TimeSeries<A = f64> = Series<A, Time>;

/// Boolean time series, e.g. the result of a comparison.
pub type StateTimeSeries = Series<bool, Time>;

/// Frequency-indexed series with element type `A`.
pub type FrequencySeries<A = f64> = Series<A, Frequency>;

pub mod prelude {
    pub use super::{
        ArrayTimeSeries, FrequencyDomain, FrequencySeries, Rate, StateTimeSeries, TimeDomain, TimeSeries,
        TimeSeriesBuilder, TimeSeriesDict, TimeSeriesList,
    };
    pub use crate::types::{AppendOptions, Comparison, GapPolicy, Indexed, Logical, Unit};
}
