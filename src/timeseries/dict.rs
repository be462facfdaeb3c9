//! TimeSeriesDict — insertion-ordered `channel → series` mapping.
//!
//! Purpose
//! -------
//! Hold data for many channels over one time span and apply the series
//! algebra (append, prepend, crop, resample) uniformly across them. The
//! acquisition entry points in [`crate::acquisition`] return this type.
//!
//! Key behaviors
//! -------------
//! - Keys are unique channel identifiers; iteration follows insertion order.
//! - `append` / `prepend` merge per key: existing entries grow through
//!   [`Series::append`] / [`Series::prepend`], missing keys are inserted as
//!   a copy or (with `copy = false`) a view of the incoming series.
//! - Bulk operations are not atomic: an error on one key leaves earlier keys
//!   already updated.
use crate::time::{TimeInput, to_gps};
use crate::timeseries::core::TimeDomain;
use crate::types::{AppendOptions, Element, Series, SeriesError, SeriesResult, Time};
use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter, IterMut, Keys, Values};
use num_traits::Float;
use std::ops::Index;

/// Target rate for [`TimeSeriesDict::resample`].
#[derive(Debug, Clone, PartialEq)]
pub enum Rate {
    /// One rate for every entry.
    All(f64),
    /// Rate per key; entries not named are left untouched.
    PerChannel(IndexMap<String, f64>),
}

impl From<f64> for Rate {
    fn from(rate: f64) -> Rate {
        Rate::All(rate)
    }
}

impl From<IndexMap<String, f64>> for Rate {
    fn from(rates: IndexMap<String, f64>) -> Rate {
        Rate::PerChannel(rates)
    }
}

/// Ordered mapping from channel identifier to time series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeriesDict<A: Element = f64> {
    entries: IndexMap<String, Series<A, Time>>,
}

impl<A: Element> TimeSeriesDict<A> {
    pub fn new() -> TimeSeriesDict<A> {
        TimeSeriesDict { entries: IndexMap::new() }
    }

    /// Insert or replace the entry for `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, series: Series<A, Time>) -> Option<Series<A, Time>> {
        self.entries.insert(key.into(), series)
    }

    /// Entry for `key`. Named apart from the acquisition entry point
    /// [`TimeSeriesDict::get`].
    pub fn series(&self, key: &str) -> Option<&Series<A, Time>> {
        self.entries.get(key)
    }

    pub fn series_mut(&mut self, key: &str) -> Option<&mut Series<A, Time>> {
        self.entries.get_mut(key)
    }

    /// Entry for `key`, or `KeyNotFound`.
    pub fn require(&self, key: &str) -> SeriesResult<&Series<A, Time>> {
        self.series(key).ok_or_else(|| SeriesError::KeyNotFound { key: key.to_string() })
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Series<A, Time>> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Keys<'_, String, Series<A, Time>> {
        self.entries.keys()
    }

    pub fn values(&self) -> Values<'_, String, Series<A, Time>> {
        self.entries.values()
    }

    pub fn iter(&self) -> Iter<'_, String, Series<A, Time>> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, String, Series<A, Time>> {
        self.entries.iter_mut()
    }

    /// New dict whose entries are copied to new memory.
    pub fn copy(&self) -> TimeSeriesDict<A> {
        self.entries.iter().map(|(key, ts)| (key.clone(), ts.copy())).collect()
    }

    /// Append every entry of `other` to the matching entry of this dict.
    ///
    /// Keys missing here are inserted: as a copy when `copy` is true, else
    /// as a view sharing memory with `other`.
    pub fn append(
        &mut self, other: &TimeSeriesDict<A>, copy: bool, opts: &AppendOptions<A>,
    ) -> SeriesResult<&mut Self> {
        for (key, ts) in other.iter() {
            match self.entries.get_mut(key) {
                Some(existing) => existing.append(ts, opts)?,
                None => {
                    let entry = if copy { ts.copy() } else { ts.clone() };
                    self.entries.insert(key.clone(), entry);
                }
            }
        }
        Ok(self)
    }

    /// Prepend every entry of `other` to the matching entry of this dict.
    ///
    /// Missing keys are handled as in [`TimeSeriesDict::append`].
    pub fn prepend(
        &mut self, other: &TimeSeriesDict<A>, copy: bool, opts: &AppendOptions<A>,
    ) -> SeriesResult<&mut Self> {
        for (key, ts) in other.iter() {
            match self.entries.get_mut(key) {
                Some(existing) => existing.prepend(ts, opts)?,
                None => {
                    let entry = if copy { ts.copy() } else { ts.clone() };
                    self.entries.insert(key.clone(), entry);
                }
            }
        }
        Ok(self)
    }

    /// Replace every entry with its crop to `[start, end)`.
    ///
    /// Bounds accept any [`TimeInput`] and are normalized to GPS seconds
    /// before any entry is touched.
    pub fn crop(&mut self, start: Option<TimeInput>, end: Option<TimeInput>, copy: bool) -> SeriesResult<&mut Self> {
        let start = start.map(to_gps).transpose()?;
        let end = end.map(to_gps).transpose()?;
        for ts in self.entries.values_mut() {
            *ts = ts.crop(start, end, copy);
        }
        Ok(self)
    }

    /// `[start, end)` of every entry, in key order.
    pub fn spans(&self) -> Vec<(&str, (f64, f64))> {
        self.entries.iter().map(|(key, ts)| (key.as_str(), ts.span())).collect()
    }
}

impl<A: Element + Float> TimeSeriesDict<A> {
    /// Replace entries with resampled versions.
    ///
    /// Errors
    /// ------
    /// - `KeyNotFound` when a per-channel rate names a missing key.
    /// - Any error from [`Series::resample`].
    pub fn resample(&mut self, rate: impl Into<Rate>) -> SeriesResult<&mut Self> {
        let rates: Vec<(String, f64)> = match rate.into() {
            Rate::All(rate) => self.entries.keys().map(|key| (key.clone(), rate)).collect(),
            Rate::PerChannel(rates) => rates.into_iter().collect(),
        };
        for (key, rate) in rates {
            let entry = self
                .entries
                .get_mut(&key)
                .ok_or_else(|| SeriesError::KeyNotFound { key: key.clone() })?;
            *entry = entry.resample(rate)?;
        }
        Ok(self)
    }
}

impl<A: Element> FromIterator<(String, Series<A, Time>)> for TimeSeriesDict<A> {
    fn from_iter<I: IntoIterator<Item = (String, Series<A, Time>)>>(iter: I) -> TimeSeriesDict<A> {
        TimeSeriesDict { entries: iter.into_iter().collect() }
    }
}

impl<A: Element> Index<&str> for TimeSeriesDict<A> {
    type Output = Series<A, Time>;

    fn index(&self, key: &str) -> &Series<A, Time> {
        &self.entries[key]
    }
}

impl<A: Element> IntoIterator for TimeSeriesDict<A> {
    type Item = (String, Series<A, Time>);
    type IntoIter = IntoIter<String, Series<A, Time>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, A: Element> IntoIterator for &'a TimeSeriesDict<A> {
    type Item = (&'a String, &'a Series<A, Time>);
    type IntoIter = Iter<'a, String, Series<A, Time>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::LigoTimeGps;
    use crate::timeseries::core::TimeSeriesBuilder;
    use crate::types::GapPolicy;
    use ndarray::{Array1, array};

    fn series(t0: f64, rate: f64, values: Array1<f64>) -> Series<f64, Time> {
        TimeSeriesBuilder::new(values).t0(t0).sample_rate(rate).build().unwrap()
    }

    fn two_channels() -> TimeSeriesDict {
        let mut dict = TimeSeriesDict::new();
        dict.insert("H1:A", series(0.0, 4.0, Array1::from_iter((0..8).map(f64::from))));
        dict.insert("L1:B", series(0.0, 4.0, Array1::from_iter((0..8).map(f64::from))));
        dict
    }

    #[test]
    // Purpose
    // -------
    // Append grows matching keys and inserts missing ones, copied or shared.
    fn append_merges_per_key() {
        let mut dict = two_channels();
        let mut other = TimeSeriesDict::new();
        other.insert("H1:A", series(2.0, 4.0, array![8.0, 9.0]));
        other.insert("V1:C", series(2.0, 4.0, array![1.0]));

        dict.append(&other, false, &AppendOptions::default()).unwrap();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict["H1:A"].len(), 10);
        assert!(dict["V1:C"].shares_memory(&other["V1:C"]));
        assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["H1:A", "L1:B", "V1:C"]);

        let mut copied = two_channels();
        copied.append(&other, true, &AppendOptions::default()).unwrap();
        assert!(!copied["V1:C"].shares_memory(&other["V1:C"]));
    }

    #[test]
    // Purpose
    // -------
    // A failure on one key leaves earlier keys updated.
    fn append_is_per_key_not_atomic() {
        let mut dict = two_channels();
        let mut other = TimeSeriesDict::new();
        other.insert("H1:A", series(2.0, 4.0, array![8.0]));
        other.insert("L1:B", series(5.0, 4.0, array![8.0]));
        let err = dict.append(&other, true, &AppendOptions::new().gap(GapPolicy::Raise));
        assert!(matches!(err, Err(SeriesError::Discontiguous { .. })));
        assert_eq!(dict["H1:A"].len(), 9);
        assert_eq!(dict["L1:B"].len(), 8);
    }

    #[test]
    fn prepend_places_other_first() {
        let mut dict = two_channels();
        let mut earlier = TimeSeriesDict::new();
        earlier.insert("L1:B", series(-1.0, 4.0, array![-4.0, -3.0, -2.0, -1.0]));
        dict.prepend(&earlier, true, &AppendOptions::default()).unwrap();
        assert_eq!(dict["L1:B"].t0(), -1.0);
        assert_eq!(dict["L1:B"].len(), 12);
    }

    #[test]
    fn crop_replaces_every_entry() {
        let mut dict = two_channels();
        dict.crop(Some(0.5.into()), Some(1.5.into()), false).unwrap();
        for (_, ts) in &dict {
            assert_eq!(ts.value(), &array![2.0, 3.0, 4.0, 5.0]);
            assert_eq!(ts.span(), (0.5, 1.5));
        }
    }

    #[test]
    // Purpose
    // -------
    // Crop bounds may be any time representation, and a bad bound leaves
    // every entry untouched.
    //
    // Given
    // -----
    // - A numeric string start and a split-second GPS end.
    //
    // Expect
    // ------
    // - Same result as cropping with the equivalent floats.
    // - An unparseable bound fails with a time error before any entry changes.
    fn crop_normalizes_time_inputs() {
        let mut dict = two_channels();
        dict.crop(Some("0.5".into()), Some(LigoTimeGps::new(1, 500_000_000).into()), false).unwrap();
        for (_, ts) in &dict {
            assert_eq!(ts.span(), (0.5, 1.5));
        }

        let mut untouched = two_channels();
        let before = untouched.clone();
        let err = untouched.crop(Some("not a time".into()), None, false).unwrap_err();
        assert!(matches!(err, SeriesError::Time(_)), "{err}");
        assert_eq!(untouched, before);
    }

    #[test]
    // Purpose
    // -------
    // A scalar rate changes every entry's dt and keeps the key set.
    fn resample_scalar_and_per_channel() {
        let mut dict = two_channels();
        dict.resample(2.0).unwrap();
        assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["H1:A", "L1:B"]);
        assert!(dict.values().all(|ts| ts.dt() == 0.5));

        let mut rates = IndexMap::new();
        rates.insert("L1:B".to_string(), 1.0);
        dict.resample(rates).unwrap();
        assert_eq!(dict["H1:A"].dt(), 0.5);
        assert_eq!(dict["L1:B"].dt(), 1.0);

        let mut missing = IndexMap::new();
        missing.insert("X1:NOPE".to_string(), 1.0);
        assert_eq!(
            dict.resample(missing).unwrap_err(),
            SeriesError::KeyNotFound { key: "X1:NOPE".into() }
        );
    }

    #[test]
    fn copy_detaches_every_entry() {
        let dict = two_channels();
        let deep = dict.copy();
        assert_eq!(deep, dict);
        assert!(deep.iter().all(|(key, ts)| !ts.shares_memory(&dict[key.as_str()])));
    }
}
