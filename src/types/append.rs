//! Concatenation and cropping of series along the indexed axis.
//!
//! Purpose
//! -------
//! Grow a series by appending (or prepending) another compatible series,
//! resolving any discontinuity according to a [`GapPolicy`], and cut a series
//! down to a sub-interval of its axis.
//!
//! Key behaviors
//! -------------
//! - [`Series::append`] mutates in place; the buffer grows without a copy
//!   when the series uniquely owns it and is copied first otherwise.
//! - [`Series::appended`] is the copy-then-append form.
//! - With `resize = false` the series keeps its length: the oldest samples
//!   are dropped and the origin advances (rolling buffer).
//! - [`Series::crop`] ignores (with a warning) bounds outside the span.
//!
//! Conventions
//! -----------
//! - If no gap policy is given it resolves to `Pad` when a pad value is given
//!   and to `Raise` otherwise.
//! - `Pad` inserts `round((start_other - end_self) / dx)` filler samples and
//!   fails with `StartsBefore` when that count is below one, or with
//!   `GapTooLarge` when it exceeds [`MAX_PAD_SAMPLES`].
//! - `Warn` logs the discontinuity and splices the data as if contiguous;
//!   `Ignore` splices silently.
use crate::types::{
    element::Element,
    errors::{SeriesError, SeriesResult},
    index::{AxisKind, Indexed, XIndex},
    series::{Contiguity, Series},
};
use ndarray::{Array1, Axis, concatenate, s};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Largest number of filler samples a single `Pad` append may insert.
pub const MAX_PAD_SAMPLES: usize = 1 << 31;

/// What to do when appended data does not meet the existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPolicy {
    /// Fail with a discontinuity error.
    Raise,
    /// Log a warning and splice the data as if contiguous.
    Warn,
    /// Splice the data silently; the index spacing may be corrupted.
    Ignore,
    /// Fill the gap with pad-valued samples.
    Pad,
}

impl GapPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            GapPolicy::Raise => "raise",
            GapPolicy::Warn => "warn",
            GapPolicy::Ignore => "ignore",
            GapPolicy::Pad => "pad",
        }
    }
}

impl Default for GapPolicy {
    fn default() -> GapPolicy {
        GapPolicy::Raise
    }
}

impl fmt::Display for GapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GapPolicy {
    type Err = SeriesError;

    fn from_str(s: &str) -> SeriesResult<GapPolicy> {
        match s {
            "raise" => Ok(GapPolicy::Raise),
            "warn" => Ok(GapPolicy::Warn),
            "ignore" => Ok(GapPolicy::Ignore),
            "pad" => Ok(GapPolicy::Pad),
            other => Err(SeriesError::UnknownGapPolicy { policy: other.to_string() }),
        }
    }
}

/// Options for [`Series::append`] and [`Series::prepend`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppendOptions<A> {
    /// Gap policy; `None` resolves from `pad` (see module docs).
    pub gap: Option<GapPolicy>,
    /// Filler value for `GapPolicy::Pad`; defaults to `A::zero()`.
    pub pad: Option<A>,
    /// Grow the series (`true`) or keep its length as a rolling buffer.
    pub resize: bool,
}

impl<A: Element> Default for AppendOptions<A> {
    fn default() -> AppendOptions<A> {
        AppendOptions { gap: None, pad: None, resize: true }
    }
}

impl<A: Element> AppendOptions<A> {
    pub fn new() -> AppendOptions<A> {
        AppendOptions::default()
    }

    pub fn gap(mut self, gap: GapPolicy) -> AppendOptions<A> {
        self.gap = Some(gap);
        self
    }

    pub fn pad(mut self, pad: A) -> AppendOptions<A> {
        self.pad = Some(pad);
        self
    }

    pub fn resize(mut self, resize: bool) -> AppendOptions<A> {
        self.resize = resize;
        self
    }

    /// The policy actually applied.
    pub fn resolved_gap(&self) -> GapPolicy {
        self.gap.unwrap_or(if self.pad.is_some() { GapPolicy::Pad } else { GapPolicy::Raise })
    }
}

impl<A: Element, K: AxisKind> Series<A, K> {
    /// Append `other` to the end of this series, in place.
    ///
    /// Parameters
    /// ----------
    /// - `other`: compatible series (same unit, axis unit, and step).
    /// - `opts`: gap policy, pad value, and resize behavior.
    ///
    /// Errors
    /// ------
    /// - Compatibility errors from [`Series::is_compatible`].
    /// - `Discontiguous` / `Overlapping` under `GapPolicy::Raise`.
    /// - `StartsBefore` under `GapPolicy::Pad` when `other` does not start
    ///   at least one step after this series ends.
    /// - `GapTooLarge` under `GapPolicy::Pad` when the gap needs more than
    ///   [`MAX_PAD_SAMPLES`] filler samples.
    /// - `IrregularIndex` when padding an explicitly indexed series.
    /// - `Overlapping` when splicing would break an explicit index's order.
    ///
    /// Notes
    /// -----
    /// - On error the series is left unchanged.
    /// - An empty series adopts the axis origin of `other`.
    pub fn append(&mut self, other: &Series<A, K>, opts: &AppendOptions<A>) -> SeriesResult<()> {
        self.is_compatible(other)?;
        if self.is_empty() {
            return self.adopt(other);
        }

        let gap = opts.resolved_gap();
        let mut n_pad = 0usize;
        if self.is_contiguous(other) != Contiguity::Follows {
            let (left, right) = (self.xspan(), other.xspan());
            match gap {
                GapPolicy::Pad => {
                    if !self.xindex().is_regular() {
                        return Err(SeriesError::IrregularIndex { operation: "pad" });
                    }
                    let n_gap = ((right.0 - left.1) / self.dx() + 0.5).floor();
                    if n_gap < 1.0 {
                        return Err(SeriesError::StartsBefore { left, right });
                    }
                    if n_gap.is_nan() || n_gap > MAX_PAD_SAMPLES as f64 {
                        return Err(SeriesError::GapTooLarge { samples: n_gap, limit: MAX_PAD_SAMPLES });
                    }
                    n_pad = n_gap as usize;
                }
                GapPolicy::Ignore => {}
                GapPolicy::Warn => {
                    tracing::warn!(
                        name = self.name().unwrap_or_default(),
                        left = ?left,
                        right = ?right,
                        "appending discontiguous series"
                    );
                }
                GapPolicy::Raise => {
                    return Err(if left.0 < right.0 && right.0 < left.1 {
                        SeriesError::Overlapping { left, right }
                    } else {
                        SeriesError::Discontiguous { left, right }
                    });
                }
            }
        }
        if other.is_empty() && n_pad == 0 {
            return Ok(());
        }

        let new_index = match self.xindex() {
            XIndex::Explicit(values) => {
                let joined = concatenate(Axis(0), &[values.view(), other.xvalues().view()])?;
                Some(XIndex::explicit(joined, self.len() + other.len()).map_err(|_| {
                    SeriesError::Overlapping { left: self.xspan(), right: other.xspan() }
                })?)
            }
            XIndex::Regular { .. } => None,
        };

        let incoming = if n_pad > 0 {
            let pad = opts.pad.unwrap_or_else(A::zero);
            let filler = Array1::from_elem(n_pad, pad);
            concatenate(Axis(0), &[filler.view(), other.value().view()])?
        } else {
            other.value().clone()
        };

        if opts.resize {
            self.buffer_mut().append(Axis(0), incoming.view())?;
            if let Some(index) = new_index {
                self.set_xindex(index);
            }
        } else {
            self.roll_forward(incoming, new_index)?;
        }
        Ok(())
    }

    /// Copy this series and append `other` to the copy.
    pub fn appended(&self, other: &Series<A, K>, opts: &AppendOptions<A>) -> SeriesResult<Series<A, K>> {
        let mut out = self.copy();
        out.append(other, opts)?;
        Ok(out)
    }

    /// Prepend `other` to the start of this series, in place.
    ///
    /// The combined samples are `other` followed by `self` (with any gap
    /// handled as in [`Series::append`]); this series keeps its own name,
    /// unit, and channel. With `resize = false` the earliest `len()` samples
    /// are retained.
    pub fn prepend(&mut self, other: &Series<A, K>, opts: &AppendOptions<A>) -> SeriesResult<()> {
        let n = self.len();
        let mut combined = other.copy();
        combined.append(self, &AppendOptions { resize: true, ..opts.clone() })?;
        let combined = if opts.resize { combined } else { combined.slice(0..n) };
        self.set_xindex(combined.xindex().clone());
        self.replace_buffer(combined.value().clone());
        Ok(())
    }

    /// Samples whose positions fall in `[start, end)`.
    ///
    /// Bounds outside the current span are ignored with a warning. When the
    /// crop keeps every sample and `copy` is false the result shares this
    /// series' buffer; otherwise it owns new memory.
    pub fn crop(&self, start: Option<f64>, end: Option<f64>, copy: bool) -> Series<A, K> {
        let (x0, x1) = self.xspan();
        let start = match start {
            Some(t) if t < x0 => {
                tracing::warn!(start = t, series_start = x0, "crop start before series start; ignoring");
                None
            }
            t => t,
        };
        let end = match end {
            Some(t) if t > x1 => {
                tracing::warn!(end = t, series_end = x1, "crop end after series end; ignoring");
                None
            }
            t => t,
        };
        let n = self.len();
        let first = start.map_or(0, |t| self.position_of(t));
        let last = end.map_or(n, |t| self.position_of(t)).max(first);
        if first == 0 && last == n {
            return if copy { self.copy() } else { self.clone() };
        }
        self.slice(first..last)
    }

    /// Index of the first sample at or after `t`, clamped to `[0, len]`.
    fn position_of(&self, t: f64) -> usize {
        let n = self.len();
        match self.xindex() {
            XIndex::Regular { .. } => {
                let raw = ((t - self.x0()) / self.dx() - 1e-9).ceil();
                if raw <= 0.0 { 0 } else { (raw as usize).min(n) }
            }
            XIndex::Explicit(values) => values.iter().take_while(|&&x| x < t).count(),
        }
    }

    fn adopt(&mut self, other: &Series<A, K>) -> SeriesResult<()> {
        let xindex = match other.xindex() {
            XIndex::Explicit(values) => XIndex::Explicit(Arc::new(values.as_ref().clone())),
            XIndex::Regular { origin, .. } => {
                let mut index = self.xindex().clone();
                index.set_origin(*origin);
                index
            }
        };
        self.replace_buffer(other.value().clone());
        self.set_xindex(xindex);
        Ok(())
    }

    fn roll_forward(&mut self, incoming: Array1<A>, new_index: Option<XIndex>) -> SeriesResult<()> {
        let n = self.len();
        let k = incoming.len();
        let joined = concatenate(Axis(0), &[self.value().view(), incoming.view()])?;
        let kept = joined.slice(s![k..]).to_owned();
        match new_index {
            Some(XIndex::Explicit(values)) => {
                let tail = values.slice(s![values.len() - n..]).to_owned();
                self.set_xindex(XIndex::Explicit(Arc::new(tail)));
            }
            _ => {
                let origin = self.x0() + k as f64 * self.dx();
                self.xindex_mut().set_origin(Some(origin));
            }
        }
        self.replace_buffer(kept);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::index::Time;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn series(values: Array1<f64>, x0: f64) -> Series<f64, Time> {
        Series::new(values).with_x0(x0).with_dx(1.0).unwrap().with_name("X1:TEST")
    }

    #[test]
    // Purpose
    // -------
    // Contiguous data is appended without gaps.
    //
    // Given
    // -----
    // - `a = [0, 1, 2]` at x0 = 10 and `b = [3, 4]` at x0 = 13.
    //
    // Expect
    // ------
    // - `a` becomes `[0, 1, 2, 3, 4]` spanning [10, 15).
    fn append_contiguous_grows_in_place() {
        let mut a = series(array![0.0, 1.0, 2.0], 10.0);
        let b = series(array![3.0, 4.0], 13.0);
        a.append(&b, &AppendOptions::new()).unwrap();
        assert_eq!(a.value(), &array![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.xspan(), (10.0, 15.0));
    }

    #[test]
    // Purpose
    // -------
    // Under the default policy a gap is an error and the series is unchanged.
    fn append_gap_raises_by_default() {
        let mut a = series(array![0.0, 1.0], 0.0);
        let b = series(array![5.0], 3.0);
        let err = a.append(&b, &AppendOptions::new()).unwrap_err();
        assert_eq!(err, SeriesError::Discontiguous { left: (0.0, 2.0), right: (3.0, 4.0) });
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn append_overlap_raises_overlapping() {
        let mut a = series(array![0.0, 1.0, 2.0], 0.0);
        let b = series(array![9.0, 9.0], 1.0);
        assert!(matches!(
            a.append(&b, &AppendOptions::new().gap(GapPolicy::Raise)),
            Err(SeriesError::Overlapping { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // The pad policy fills the gap with the pad value.
    //
    // Given
    // -----
    // - `a` spans [0, 2), `b` starts at 4: two samples are missing.
    //
    // Expect
    // ------
    // - Result is `[0, 1, -1, -1, 4]` with no remaining gap.
    fn append_pad_fills_gap() {
        let mut a = series(array![0.0, 1.0], 0.0);
        let b = series(array![4.0], 4.0);
        a.append(&b, &AppendOptions::new().pad(-1.0)).unwrap();
        assert_eq!(a.value(), &array![0.0, 1.0, -1.0, -1.0, 4.0]);
        assert_eq!(a.xspan(), (0.0, 5.0));
    }

    #[test]
    fn append_pad_rejects_earlier_start() {
        let mut a = series(array![0.0, 1.0, 2.0], 0.0);
        let b = series(array![4.0], 1.0);
        assert!(matches!(
            a.append(&b, &AppendOptions::new().gap(GapPolicy::Pad)),
            Err(SeriesError::StartsBefore { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A gap too large to fill is refused before any filler is allocated.
    //
    // Given
    // -----
    // - `a` spans [0, 2) at 1 Hz and `b` starts 1e18 seconds later.
    //
    // Expect
    // ------
    // - `GapTooLarge` and `a` unchanged.
    fn append_pad_refuses_huge_gap() {
        let mut a = series(array![0.0, 1.0], 0.0);
        let b = series(array![4.0], 1e18);
        let err = a.append(&b, &AppendOptions::new().pad(0.0)).unwrap_err();
        assert!(matches!(err, SeriesError::GapTooLarge { limit: MAX_PAD_SAMPLES, .. }), "{err}");
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn append_ignore_and_warn_splice() {
        let b = series(array![7.0], 9.0);
        for gap in [GapPolicy::Ignore, GapPolicy::Warn] {
            let mut a = series(array![0.0, 1.0], 0.0);
            a.append(&b, &AppendOptions::new().gap(gap)).unwrap();
            assert_eq!(a.value(), &array![0.0, 1.0, 7.0]);
        }
    }

    #[test]
    // Purpose
    // -------
    // Appending through a shared handle copies first and never mutates the
    // other holder of the buffer.
    fn append_on_shared_buffer_copies() {
        let original = series(array![0.0, 1.0], 0.0);
        let mut view = original.clone();
        view.append(&series(array![2.0], 2.0), &AppendOptions::new()).unwrap();
        assert_eq!(original.len(), 2);
        assert_eq!(view.len(), 3);
        assert!(!view.shares_memory(&original));
    }

    #[test]
    // Purpose
    // -------
    // With `resize = false` the series keeps its length and advances.
    fn append_without_resize_rolls() {
        let mut a = series(array![0.0, 1.0, 2.0, 3.0], 0.0);
        a.append(&series(array![4.0, 5.0], 4.0), &AppendOptions::new().resize(false)).unwrap();
        assert_eq!(a.value(), &array![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(a.x0(), 2.0);
    }

    #[test]
    fn prepend_places_other_first_and_keeps_name() {
        let mut a = series(array![2.0, 3.0], 2.0);
        let b = series(array![0.0, 1.0], 0.0).with_name("other");
        a.prepend(&b, &AppendOptions::new()).unwrap();
        assert_eq!(a.value(), &array![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(a.x0(), 0.0);
        assert_eq!(a.name(), Some("X1:TEST"));
    }

    #[test]
    fn explicit_index_is_extended() {
        let a: Series<f64, Time> = Series::new(array![1.0, 2.0])
            .with_xindex(XIndex::explicit(array![0.0, 0.5], 2).unwrap())
            .unwrap();
        let b: Series<f64, Time> = Series::new(array![3.0])
            .with_xindex(XIndex::explicit(array![1.0], 1).unwrap())
            .unwrap();
        let mut joined = a.clone();
        joined.append(&b, &AppendOptions::new()).unwrap();
        assert_eq!(joined.xvalues().into_owned(), array![0.0, 0.5, 1.0]);
    }

    #[test]
    // Purpose
    // -------
    // Crop keeps samples in [start, end) and ignores out-of-span bounds.
    fn crop_selects_interval() {
        let s = Series::<f64, Time>::new(Array1::from_iter((0..10).map(f64::from)))
            .with_x0(100.0)
            .with_dx(0.5)
            .unwrap();
        let cropped = s.crop(Some(101.0), Some(103.0), false);
        assert_eq!(cropped.value(), &array![2.0, 3.0, 4.0, 5.0]);
        assert_relative_eq!(cropped.x0(), 101.0);

        let whole = s.crop(Some(0.0), Some(1e9), false);
        assert!(whole.shares_memory(&s));
        let whole_copy = s.crop(None, None, true);
        assert!(!whole_copy.shares_memory(&s));
    }

    #[test]
    fn gap_policy_parses_from_str() {
        assert_eq!("pad".parse::<GapPolicy>(), Ok(GapPolicy::Pad));
        assert!(matches!("fill".parse::<GapPolicy>(), Err(SeriesError::UnknownGapPolicy { .. })));
    }
}
