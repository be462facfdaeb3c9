//! Axis descriptors for indexed series.
//!
//! Purpose
//! -------
//! Describe the sample positions of a series along its indexed axis, either
//! implicitly by an origin and a step (regular sampling) or explicitly by a
//! strictly increasing array of positions (irregular sampling).
//!
//! Key behaviors
//! -------------
//! - [`XIndex`] holds exactly one of the two descriptor modes at a time.
//! - Regular descriptors keep `origin` and `step` optional so that either can
//!   be unset independently; unset values read back as the defaults `0` and
//!   `1` through [`XIndex::origin_or_default`] / [`XIndex::step_or_default`].
//! - [`AxisKind`] marks a series as time-, frequency-, or generically-indexed
//!   at compile time and supplies the default axis unit.
//! - [`Indexed`] is the shared capability implemented by every indexed value
//!   (1-D series, 2-D time arrays); axis-specific capabilities such as
//!   [`TimeDomain`](crate::timeseries::TimeDomain) build on it.
//!
//! Invariants & assumptions
//! ------------------------
//! - A present step is finite and strictly positive.
//! - An explicit index is strictly increasing and has one entry per sample.
//!
//! Conventions
//! -----------
//! - `span = (x0, x0 + n·dx)` for regular axes. For explicit axes the end is
//!   extrapolated by the final spacing, i.e. `last + (last - second_last)`,
//!   and equals `last` when fewer than two samples are present.
use crate::types::{
    errors::{SeriesError, SeriesResult},
    units::Unit,
};
use ndarray::Array1;
use std::borrow::Cow;
use std::sync::Arc;

/// Sample positions along an indexed axis.
#[derive(Debug, Clone, PartialEq)]
pub enum XIndex {
    /// Positions `origin + step·k`, each part optional.
    Regular { origin: Option<f64>, step: Option<f64> },
    /// Explicit, strictly increasing positions.
    Explicit(Arc<Array1<f64>>),
}

impl Default for XIndex {
    fn default() -> XIndex {
        XIndex::Regular { origin: None, step: None }
    }
}

impl XIndex {
    /// Regular descriptor with both parts set, validating the step.
    pub fn regular(origin: f64, step: f64) -> SeriesResult<XIndex> {
        validate_step(step)?;
        Ok(XIndex::Regular { origin: Some(origin), step: Some(step) })
    }

    /// Explicit descriptor for `len` samples, validating length and order.
    pub fn explicit(values: Array1<f64>, len: usize) -> SeriesResult<XIndex> {
        if values.len() != len {
            return Err(SeriesError::IndexLengthMismatch { expected: len, actual: values.len() });
        }
        for (k, pair) in values.windows(2).into_iter().enumerate() {
            if !(pair[1] > pair[0]) {
                return Err(SeriesError::NonMonotonicIndex { index: k + 1 });
            }
        }
        Ok(XIndex::Explicit(Arc::new(values)))
    }

    pub fn is_regular(&self) -> bool {
        matches!(self, XIndex::Regular { .. })
    }

    /// The stored origin, or the first explicit position.
    pub fn origin(&self) -> Option<f64> {
        match self {
            XIndex::Regular { origin, .. } => *origin,
            XIndex::Explicit(values) => values.first().copied(),
        }
    }

    pub fn origin_or_default(&self) -> f64 {
        self.origin().unwrap_or(0.0)
    }

    /// The stored step, or the spacing of a uniformly spaced explicit index.
    pub fn step(&self) -> Option<f64> {
        match self {
            XIndex::Regular { step, .. } => *step,
            XIndex::Explicit(values) => uniform_spacing(values),
        }
    }

    pub fn step_or_default(&self) -> f64 {
        self.step().unwrap_or(1.0)
    }

    /// Set or clear the origin. An explicit index is replaced by a regular
    /// descriptor that keeps its uniform spacing, if it had one.
    pub fn set_origin(&mut self, value: Option<f64>) {
        match self {
            XIndex::Regular { origin, .. } => *origin = value,
            XIndex::Explicit(_) => {
                *self = XIndex::Regular { origin: value, step: self.step() };
            }
        }
    }

    /// Set or clear the step; explicit indices become regular.
    pub fn set_step(&mut self, value: Option<f64>) -> SeriesResult<()> {
        if let Some(step) = value {
            validate_step(step)?;
        }
        match self {
            XIndex::Regular { step, .. } => *step = value,
            XIndex::Explicit(_) => {
                *self = XIndex::Regular { origin: self.origin(), step: value };
            }
        }
        Ok(())
    }

    /// Positions of `len` samples; borrowed when explicit, derived otherwise.
    pub fn values(&self, len: usize) -> Cow<'_, Array1<f64>> {
        match self {
            XIndex::Explicit(values) => Cow::Borrowed(values.as_ref()),
            XIndex::Regular { .. } => {
                let x0 = self.origin_or_default();
                let dx = self.step_or_default();
                Cow::Owned(Array1::from_iter((0..len).map(|k| x0 + dx * k as f64)))
            }
        }
    }

    /// Half-open extent `(start, end)` covered by `len` samples.
    pub fn span(&self, len: usize) -> (f64, f64) {
        match self {
            XIndex::Regular { .. } => {
                let x0 = self.origin_or_default();
                (x0, x0 + len as f64 * self.step_or_default())
            }
            XIndex::Explicit(values) => match values.len() {
                0 => (0.0, 0.0),
                1 => (values[0], values[0]),
                n => (values[0], 2.0 * values[n - 1] - values[n - 2]),
            },
        }
    }

    /// Descriptor for the sub-range `start..end` of the samples.
    pub fn slice(&self, start: usize, end: usize) -> XIndex {
        match self {
            XIndex::Regular { origin, step } => XIndex::Regular {
                origin: Some(origin.unwrap_or(0.0) + start as f64 * step.unwrap_or(1.0)),
                step: *step,
            },
            XIndex::Explicit(values) => {
                XIndex::Explicit(Arc::new(values.slice(ndarray::s![start..end]).to_owned()))
            }
        }
    }
}

fn validate_step(step: f64) -> SeriesResult<()> {
    if step.is_finite() && step > 0.0 { Ok(()) } else { Err(SeriesError::InvalidStep { value: step }) }
}

fn uniform_spacing(values: &Array1<f64>) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let step = values[1] - values[0];
    let tol = 1e-9 * step.abs().max(1.0);
    values.windows(2).into_iter().all(|w| ((w[1] - w[0]) - step).abs() <= tol).then_some(step)
}

/// Compile-time marker for what an axis measures.
pub trait AxisKind: Copy + Default + std::fmt::Debug + Send + Sync + 'static {
    /// Unit assigned to the axis when none is given.
    fn default_unit() -> Unit;
}

/// Time axis (seconds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Time;

/// Frequency axis (hertz).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frequency;

/// Axis without a physical interpretation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generic;

impl AxisKind for Time {
    fn default_unit() -> Unit {
        Unit::second()
    }
}

impl AxisKind for Frequency {
    fn default_unit() -> Unit {
        Unit::hertz()
    }
}

impl AxisKind for Generic {
    fn default_unit() -> Unit {
        Unit::dimensionless()
    }
}

/// Shared capability of values indexed along their first axis.
pub trait Indexed {
    fn xindex(&self) -> &XIndex;

    fn xindex_mut(&mut self) -> &mut XIndex;

    fn xunit(&self) -> &Unit;

    /// Number of samples along the indexed axis.
    fn x_len(&self) -> usize;

    fn x0(&self) -> f64 {
        self.xindex().origin_or_default()
    }

    fn dx(&self) -> f64 {
        self.xindex().step_or_default()
    }

    fn xspan(&self) -> (f64, f64) {
        self.xindex().span(self.x_len())
    }

    fn xvalues(&self) -> Cow<'_, Array1<f64>> {
        self.xindex().values(self.x_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Regular positions are `x0 + dx·k` for every sample, including none.
    fn regular_values_follow_origin_and_step() {
        let index = XIndex::regular(10.0, 0.5).unwrap();
        assert_eq!(index.values(4).into_owned(), array![10.0, 10.5, 11.0, 11.5]);
        assert_eq!(index.values(0).len(), 0);
        assert_eq!(index.span(4), (10.0, 12.0));
    }

    #[test]
    // Purpose
    // -------
    // Unset origin and step fall back to 0 and 1.
    fn unset_parts_read_as_defaults() {
        let index = XIndex::default();
        assert_eq!(index.origin(), None);
        assert_eq!(index.origin_or_default(), 0.0);
        assert_eq!(index.step_or_default(), 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Explicit descriptors are validated for length and strict ordering.
    fn explicit_index_is_validated() {
        assert_eq!(
            XIndex::explicit(array![0.0, 1.0], 3),
            Err(SeriesError::IndexLengthMismatch { expected: 3, actual: 2 })
        );
        assert_eq!(
            XIndex::explicit(array![0.0, 2.0, 2.0], 3),
            Err(SeriesError::NonMonotonicIndex { index: 2 })
        );
        let ok = XIndex::explicit(array![0.0, 0.25, 0.5], 3).unwrap();
        assert_eq!(ok.step(), Some(0.25));
        assert_eq!(ok.span(3), (0.0, 0.75));
    }

    #[test]
    fn non_positive_step_is_rejected() {
        assert_eq!(XIndex::regular(0.0, 0.0), Err(SeriesError::InvalidStep { value: 0.0 }));
        let mut index = XIndex::default();
        assert!(index.set_step(Some(-1.0)).is_err());
        assert!(index.set_step(None).is_ok());
    }

    #[test]
    fn slice_shifts_regular_origin() {
        let index = XIndex::regular(100.0, 2.0).unwrap();
        assert_eq!(index.slice(3, 5), XIndex::regular(106.0, 2.0).unwrap());
    }
}
