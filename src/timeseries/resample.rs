//! Rate conversion for regularly sampled time series.
//!
//! Two strategies are used:
//! - When the current rate is an integer multiple `q` of the target rate the
//!   series is decimated by averaging consecutive blocks of `q` samples
//!   (trailing samples that do not fill a block are dropped).
//! - Otherwise the samples are linearly interpolated onto the new grid
//!   `t0 + k / rate`, holding the final sample past the last input time.
//!
//! `t0` is preserved in both cases and the new step follows the same
//! snapping rule as [`TimeDomain::set_sample_rate`].
use crate::timeseries::core::TimeDomain;
use crate::types::{Element, Indexed, Series, SeriesError, SeriesResult, Time};
use ndarray::Array1;
use num_traits::Float;

const RATE_RTOL: f64 = 1e-9;

impl<A: Element + Float> Series<A, Time> {
    /// New series sampled at `rate` Hz.
    ///
    /// Errors
    /// ------
    /// - `InvalidSampleRate` for a non-finite or non-positive rate.
    /// - `IrregularIndex` for series with explicit times.
    pub fn resample(&self, rate: f64) -> SeriesResult<Series<A, Time>> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(SeriesError::InvalidSampleRate { value: rate });
        }
        if !self.xindex().is_regular() {
            return Err(SeriesError::IrregularIndex { operation: "resample" });
        }
        let current = self.sample_rate();
        if (rate - current).abs() <= RATE_RTOL * current {
            return Ok(self.copy());
        }

        let factor = current / rate;
        let blocks = factor.round();
        let values = if rate < current && (factor - blocks).abs() <= RATE_RTOL * factor {
            tracing::debug!(from = current, to = rate, factor = blocks, "decimating by block mean");
            block_mean(self.value(), blocks as usize)?
        } else {
            tracing::debug!(from = current, to = rate, "resampling by linear interpolation");
            interpolate(self.value(), factor)?
        };

        let mut out = self.with_values(values);
        out.set_sample_rate(Some(rate))?;
        Ok(out)
    }
}

fn cast<A: Float>(value: f64) -> SeriesResult<A> {
    <A as num_traits::NumCast>::from(value)
        .ok_or_else(|| SeriesError::Shape { reason: format!("{value} is not representable") })
}

fn block_mean<A: Float>(values: &Array1<A>, q: usize) -> SeriesResult<Array1<A>> {
    let n_out = values.len() / q;
    let scale: A = cast(q as f64)?;
    let out = (0..n_out)
        .map(|k| {
            let block = values.slice(ndarray::s![k * q..(k + 1) * q]);
            block.iter().fold(A::zero(), |acc, &v| acc + v) / scale
        })
        .collect::<Vec<_>>();
    Ok(Array1::from_vec(out))
}

/// Linear interpolation where output sample `k` sits at input position
/// `k · step`.
fn interpolate<A: Float>(values: &Array1<A>, step: f64) -> SeriesResult<Array1<A>> {
    let n = values.len();
    if n == 0 {
        return Ok(Array1::from_vec(Vec::new()));
    }
    let n_out = ((n as f64) / step + RATE_RTOL).floor() as usize;
    let mut out = Vec::with_capacity(n_out);
    for k in 0..n_out {
        let pos = k as f64 * step;
        let lower = pos.floor() as usize;
        if lower + 1 >= n {
            out.push(values[n - 1]);
            continue;
        }
        let frac: A = cast(pos - lower as f64)?;
        out.push(values[lower] + (values[lower + 1] - values[lower]) * frac);
    }
    Ok(Array1::from_vec(out))
}
