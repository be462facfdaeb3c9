//! Integration tests for segment lists and the series algebra they use.
//!
//! Purpose
//! -------
//! - Validate coalescing and joining of time-series segments through the
//!   public API only, the way a caller assembling data from several reads
//!   would use them.
//!
//! Coverage
//! --------
//! - `TimeSeriesList::coalesce`: contiguous merge, non-contiguous sort,
//!   shared-buffer segments that must be copied before growth.
//! - `TimeSeriesList::join`: `raise` vs `pad` gap policies.
//! - Boolean results of comparisons on joined data.
//!
//! Exclusions
//! ----------
//! - Low-level index and unit arithmetic; covered by unit tests.
use approx::assert_relative_eq;
use ndarray::{Array1, array};
use rust_gwseries::timeseries::prelude::*;
use rust_gwseries::types::{Contiguity, SeriesError};

/// Segment of `n` samples at `rate` Hz starting at `t0`, valued `t0 + k`.
fn segment(t0: f64, rate: f64, n: usize) -> TimeSeries {
    TimeSeriesBuilder::new(Array1::from_iter((0..n).map(|k| t0 + k as f64)))
        .t0(t0)
        .sample_rate(rate)
        .unit(Unit::parse("m").unwrap())
        .name("X1:TEST")
        .build()
        .unwrap()
}

#[test]
// Purpose
// -------
// Three contiguous equal-length segments, given out of order, coalesce
// into one element spanning all three.
//
// Given
// -----
// - Segments [0, 4), [4, 8), [8, 12) at 1 Hz, inserted as 2, 0, 1.
//
// Expect
// ------
// - One element, span (0, 12), values in time order.
fn coalesce_merges_contiguous_segments() {
    let mut list: TimeSeriesList =
        vec![segment(8.0, 1.0, 4), segment(0.0, 1.0, 4), segment(4.0, 1.0, 4)].into();
    list.coalesce().unwrap();

    assert_eq!(list.len(), 1);
    assert_eq!(list[0].span(), (0.0, 12.0));
    assert_eq!(list[0].value(), &Array1::from_iter((0..12).map(f64::from)));
    assert_eq!(list[0].name(), Some("X1:TEST"));
}

#[test]
// Purpose
// -------
// Non-contiguous segments stay separate but end up sorted by start time.
fn coalesce_keeps_gapped_segments_sorted() {
    let late = segment(10.0, 1.0, 2);
    let early = segment(0.0, 1.0, 2);
    let mut list: TimeSeriesList = vec![late.clone(), early.clone()].into();
    list.coalesce().unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list.segments(), vec![(0.0, 2.0), (10.0, 12.0)]);
    assert_eq!(list[0], early);
    assert_eq!(list[1], late);
}

#[test]
// Purpose
// -------
// Growing a segment that shares its buffer must not disturb the other
// holder of that buffer.
//
// Given
// -----
// - A segment whose view is also held by the caller.
//
// Expect
// ------
// - Coalescing grows the list element; the caller's view is unchanged.
fn coalesce_copies_shared_buffers_before_growing() {
    let first = segment(0.0, 2.0, 4);
    let held = first.clone();
    assert!(held.shares_memory(&first));

    let mut list: TimeSeriesList = vec![first, segment(2.0, 2.0, 4)].into();
    list.coalesce().unwrap();

    assert_eq!(list.len(), 1);
    assert_eq!(list[0].len(), 8);
    assert_eq!(held.len(), 4);
    assert!(!held.shares_memory(&list[0]));
}

#[test]
// Purpose
// -------
// One missing sample between two segments is fatal under `raise` and
// filled under `pad`.
//
// Given
// -----
// - [0, 4) and [5, 9) at 1 Hz.
//
// Expect
// ------
// - `raise` fails with `Discontiguous`.
// - `pad` yields 9 samples with no gap and the pad value at t = 4.
fn join_raises_or_pads_single_sample_gap() {
    let mut list: TimeSeriesList = vec![segment(5.0, 1.0, 4), segment(0.0, 1.0, 4)].into();
    assert!(matches!(list.join(0.0, GapPolicy::Raise), Err(SeriesError::Discontiguous { .. })));

    let joined = list.join(-1.0, GapPolicy::Pad).unwrap();
    assert_eq!(joined.len(), 9);
    assert_eq!(joined.span(), (0.0, 9.0));
    assert_eq!(joined.value(), &array![0.0, 1.0, 2.0, 3.0, -1.0, 5.0, 6.0, 7.0, 8.0]);

    let mut pieces: TimeSeriesList = vec![joined.slice(0..4), joined.slice(4..9)].into();
    pieces.coalesce().unwrap();
    assert_eq!(pieces.len(), 1);
}

#[test]
// Purpose
// -------
// Joining leaves the input segments untouched and tolerates an empty list.
fn join_does_not_alias_inputs() {
    let a = segment(0.0, 4.0, 4);
    let b = segment(1.0, 4.0, 4);
    let mut list: TimeSeriesList = vec![a.clone(), b].into();
    let joined = list.join(0.0, GapPolicy::Raise).unwrap();

    assert_eq!(joined.len(), 8);
    assert_relative_eq!(joined.duration(), 2.0);
    assert!(!joined.shares_memory(&a));
    assert_eq!(list[0].len(), 4);

    let mut empty = TimeSeriesList::<f64>::new();
    assert!(empty.join(0.0, GapPolicy::Raise).unwrap().is_empty());
}

#[test]
// Purpose
// -------
// A comparison on joined data is a dimensionless boolean series named
// after the operator, which can be reduced to a sample count.
fn comparison_after_join_names_operator() {
    let mut list: TimeSeriesList = vec![segment(0.0, 1.0, 4), segment(4.0, 1.0, 4)].into();
    let mut joined = list.join(0.0, GapPolicy::Raise).unwrap();
    joined.set_name(Some("H1:STRAIN".into()));

    let above = joined.gt(3.0);
    assert_eq!(above.name(), Some("H1:STRAIN > 3"));
    assert!(above.unit().is_dimensionless());
    assert_eq!(above.count_true(), 4);
    assert_eq!(above.t0(), joined.t0());
    assert_eq!(joined.is_contiguous(&segment(8.0, 1.0, 1)), Contiguity::Follows);
}
