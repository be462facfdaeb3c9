//! interop — conversions to and from foreign time-series layouts.
//!
//! - [`lal`]: LAL structures (typed vectors, split epoch, rational units).
//! - [`pycbc`]: PyCBC structures (typed vectors, split epoch, no unit).
//!
//! Both are explicit, copying conversions exposed as `to_*` / `from_*`
//! methods on [`TimeSeries`](crate::timeseries::TimeSeries).
pub mod lal;
pub mod pycbc;

pub use self::lal::{LAL_BASE_UNITS, LalTimeSeries, LalType, LalUnit};
pub use self::pycbc::PycbcTimeSeries;
