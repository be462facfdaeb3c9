//! Frequency-axis counterpart of [`TimeDomain`](crate::timeseries::TimeDomain).
//!
//! A frequency series indexes its samples by `f0 + df·k` in hertz. The
//! accessors mirror the time axis so spectra and time series share the same
//! slicing, contiguity, and append machinery.
use crate::types::{Element, Frequency, Indexed, Series, SeriesResult};
use ndarray::Array1;
use std::borrow::Cow;

pub trait FrequencyDomain: Indexed {
    /// Lowest frequency (axis origin); `0` when unset.
    fn f0(&self) -> f64 {
        self.x0()
    }

    fn set_f0(&mut self, f0: Option<f64>) {
        self.xindex_mut().set_origin(f0);
    }

    /// Frequency resolution (axis step); `1` when unset.
    fn df(&self) -> f64 {
        self.dx()
    }

    fn set_df(&mut self, df: Option<f64>) -> SeriesResult<()> {
        self.xindex_mut().set_step(df)
    }

    fn frequencies(&self) -> Cow<'_, Array1<f64>> {
        self.xvalues()
    }
}

impl<A: Element> FrequencyDomain for Series<A, Frequency> {}
