//! TimeSeriesList — segments of one channel across disjoint spans.
//!
//! Purpose
//! -------
//! Collect time series that were acquired piecewise (for example one per
//! science segment) and reduce them to fewer, longer series.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeriesList::coalesce`] sorts by `t0` and merges every run of
//!   mutually contiguous segments in place, in one forward pass.
//! - [`TimeSeriesList::join`] sorts by `t0` and folds every segment into a
//!   copy of the first one, resolving gaps with a [`GapPolicy`].
//! - Element typing is enforced statically: a list holds only
//!   `Series<A, Time>` for one element type `A`.
//!
//! Invariants & assumptions
//! ------------------------
//! - After `coalesce`, the list is sorted by start time and holds exactly
//!   one element per maximal run of segments where each next segment
//!   [`Follows`](crate::types::Contiguity::Follows) the accumulated one.
//! - Merging grows the accumulated segment in place only when it uniquely
//!   owns its buffer; a segment viewed elsewhere is copied before growing,
//!   so other holders never observe the merge.
//!
//! Conventions
//! -----------
//! - Sorting uses `f64::total_cmp` on `t0` and is stable, so equal start
//!   times keep their insertion order.
//! - An error while merging (incompatible units or steps between touching
//!   segments) is returned immediately; the list is then left sorted but
//!   only partially merged and should be discarded.
//!
//! Testing notes
//! -------------
//! - Scenario tests for coalesce/join live in `tests/list_coalesce_join.rs`.
use crate::timeseries::core::TimeDomain;
use crate::types::{AppendOptions, Contiguity, Element, GapPolicy, Series, SeriesResult, Time};
use std::ops::{Index, Range};

/// Ordered segments of time series sharing one element type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeriesList<A: Element = f64> {
    items: Vec<Series<A, Time>>,
}

impl<A: Element> TimeSeriesList<A> {
    pub fn new() -> TimeSeriesList<A> {
        TimeSeriesList { items: Vec::new() }
    }

    pub fn push(&mut self, item: Series<A, Time>) -> &mut Self {
        self.items.push(item);
        self
    }

    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = Series<A, Time>>,
    {
        self.items.extend(items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Series<A, Time>> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Series<A, Time>> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Series<A, Time>> {
        self.items.iter_mut()
    }

    pub fn into_vec(self) -> Vec<Series<A, Time>> {
        self.items
    }

    /// `[start, end)` of every element, in list order.
    pub fn segments(&self) -> Vec<(f64, f64)> {
        self.items.iter().map(|ts| ts.span()).collect()
    }

    /// New list whose elements are copied to new memory.
    pub fn copy(&self) -> TimeSeriesList<A> {
        self.items.iter().map(Series::copy).collect()
    }

    /// New list over `range`; elements share memory with this list.
    pub fn slice(&self, range: Range<usize>) -> TimeSeriesList<A> {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        self.items[start..end].iter().cloned().collect()
    }

    fn sort_by_t0(&mut self) {
        self.items.sort_by(|a, b| a.t0().total_cmp(&b.t0()));
    }

    /// Merge contiguous elements in place; sorts and possibly shortens the
    /// list.
    ///
    /// Two cursors walk the sorted list: `i` is the next output slot and `j`
    /// the next unread element. Each run starts by moving element `j` into
    /// slot `i` and then appends following elements while they continue the
    /// run. Slots between `i` and `j` hold already-merged elements and are
    /// dropped by the final truncation.
    pub fn coalesce(&mut self) -> SeriesResult<&mut Self> {
        self.sort_by_t0();
        let n = self.items.len();
        let (mut i, mut j) = (0usize, 0usize);
        let opts = AppendOptions::default();
        while j < n {
            self.items.swap(i, j);
            j += 1;
            while j < n && self.items[i].is_contiguous(&self.items[j]) == Contiguity::Follows {
                let (head, tail) = self.items.split_at_mut(j);
                head[i].append(&tail[0], &opts)?;
                j += 1;
            }
            i += 1;
        }
        if i < n {
            tracing::debug!(before = n, after = i, "coalesced contiguous segments");
        }
        self.items.truncate(i);
        Ok(self)
    }

    /// Concatenate every element into one series.
    ///
    /// The list is sorted by `t0`; the first element is copied and each
    /// following element appended with `gap` and `pad`. An empty list gives
    /// an empty series.
    ///
    /// Errors
    /// ------
    /// - Discontinuity errors when `gap` is [`GapPolicy::Raise`], or
    ///   `StartsBefore` for overlaps under [`GapPolicy::Pad`].
    /// - Compatibility errors for mismatched units or steps.
    pub fn join(&mut self, pad: A, gap: GapPolicy) -> SeriesResult<Series<A, Time>> {
        if self.items.is_empty() {
            return Ok(Series::empty());
        }
        self.sort_by_t0();
        let opts = AppendOptions::new().gap(gap).pad(pad);
        let mut out = self.items[0].copy();
        for ts in &self.items[1..] {
            out.append(ts, &opts)?;
        }
        Ok(out)
    }
}

impl<A: Element> FromIterator<Series<A, Time>> for TimeSeriesList<A> {
    fn from_iter<I: IntoIterator<Item = Series<A, Time>>>(iter: I) -> TimeSeriesList<A> {
        TimeSeriesList { items: iter.into_iter().collect() }
    }
}

impl<A: Element> From<Vec<Series<A, Time>>> for TimeSeriesList<A> {
    fn from(items: Vec<Series<A, Time>>) -> TimeSeriesList<A> {
        TimeSeriesList { items }
    }
}

impl<A: Element> Index<usize> for TimeSeriesList<A> {
    type Output = Series<A, Time>;

    fn index(&self, index: usize) -> &Series<A, Time> {
        &self.items[index]
    }
}

impl<A: Element> IntoIterator for TimeSeriesList<A> {
    type Item = Series<A, Time>;
    type IntoIter = std::vec::IntoIter<Series<A, Time>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, A: Element> IntoIterator for &'a TimeSeriesList<A> {
    type Item = &'a Series<A, Time>;
    type IntoIter = std::slice::Iter<'a, Series<A, Time>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeseries::core::TimeSeriesBuilder;
    use ndarray::{Array1, array};

    fn segment(t0: f64, values: Array1<f64>) -> Series<f64, Time> {
        TimeSeriesBuilder::new(values).t0(t0).dt(1.0).build().unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Unsorted contiguous segments collapse into one sorted element.
    fn coalesce_sorts_and_merges() {
        let mut list: TimeSeriesList = vec![
            segment(4.0, array![4.0, 5.0]),
            segment(0.0, array![0.0, 1.0]),
            segment(2.0, array![2.0, 3.0]),
        ]
        .into();
        list.coalesce().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].value(), &array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(list.segments(), vec![(0.0, 6.0)]);
    }

    #[test]
    // Purpose
    // -------
    // Merging never mutates a buffer seen through another handle.
    fn coalesce_copies_shared_segments() {
        let first = segment(0.0, array![0.0, 1.0]);
        let mut list: TimeSeriesList = vec![first.clone(), segment(2.0, array![2.0])].into();
        list.coalesce().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(list[0].len(), 3);
    }

    #[test]
    fn slice_shares_and_copy_detaches() {
        let list: TimeSeriesList =
            vec![segment(0.0, array![0.0]), segment(5.0, array![1.0]), segment(9.0, array![2.0])].into();
        let part = list.slice(1..3);
        assert_eq!(part.len(), 2);
        assert!(part[0].shares_memory(&list[1]));
        let deep = list.copy();
        assert!(!deep[0].shares_memory(&list[0]));
        assert_eq!(deep, list);
    }

    #[test]
    fn join_of_empty_list_is_empty_series() {
        let mut list: TimeSeriesList<i32> = TimeSeriesList::new();
        let joined = list.join(0, GapPolicy::Raise).unwrap();
        assert!(joined.is_empty());
    }
}
