//! rust_gwseries — gravitational-wave style time series with units, GPS
//! epochs, gap-aware joining, and multi-source acquisition.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the core series types to Python as the `rust_gwseries`
//! extension module of the same name (feature `python-bindings`).
//!
//! Key behaviors
//! -------------
//! - Re-export the domain modules:
//!   - [`types`]: the indexed-series primitive and its algebra.
//!   - [`time`]: GPS normalization.
//!   - [`detector`]: channel identifiers.
//!   - [`timeseries`]: time-axis series, lists, and dicts.
//!   - [`acquisition`]: archive and remote data retrieval.
//!   - [`interop`]: foreign layout bridges.
//! - Define `#[pyclass]` wrappers for `TimeSeries` (f64) and
//!   `TimeSeriesList`, and the `#[pymodule]` initializer.
//!
//! Invariants & assumptions
//! ------------------------
//! - All series logic lives in the inner modules; this file performs only
//!   FFI glue, argument conversion, and error mapping.
//! - Python-visible classes hold their Rust counterparts by value; a
//!   `TimeSeries` passed into a list is copied as a shared view, matching
//!   Rust `clone` semantics.
//!
//! Conventions
//! -----------
//! - Times are GPS seconds; `start`/`end` keyword arguments accept floats.
//! - Errors are rich Rust enums internally and become `ValueError`
//!   (series), `ImportError`/`RuntimeError`/`ValueError` (acquisition) at the
//!   PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should usually `use rust_gwseries::timeseries::prelude::*`
//!   and ignore the items guarded by `python-bindings`.
//!
//! Testing notes
//! -------------
//! - Behavior is covered by unit tests in the inner modules and by the
//!   integration tests under `tests/`; the bindings add no logic of their own.

pub mod acquisition;
pub mod detector;
pub mod interop;
pub mod time;
pub mod timeseries;
pub mod types;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyIndexError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    timeseries::{TimeDomain, TimeSeries as RsTimeSeries, TimeSeriesBuilder, TimeSeriesList as RsTimeSeriesList},
    types::Unit,
    utils::{extract_append_options, extract_f64_array, parse_gap_policy},
};

/// TimeSeries — Python-facing wrapper for a `f64` time series.
///
/// Constructed from Python via
/// `TimeSeries(data, t0=None, dt=None, sample_rate=None, unit=None, name=None, channel=None)`;
/// `dt` and `sample_rate` are mutually exclusive.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_gwseries", name = "TimeSeries")]
#[derive(Clone)]
pub struct PyTimeSeries {
    inner: RsTimeSeries<f64>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyTimeSeries {
    #[new]
    #[pyo3(signature = (data, t0 = None, dt = None, sample_rate = None, unit = None, name = None, channel = None))]
    pub fn new(
        data: &Bound<'_, PyAny>, t0: Option<f64>, dt: Option<f64>, sample_rate: Option<f64>, unit: Option<&str>,
        name: Option<String>, channel: Option<String>,
    ) -> PyResult<PyTimeSeries> {
        let mut builder = TimeSeriesBuilder::new(extract_f64_array(data)?);
        if let Some(t0) = t0 {
            builder = builder.t0(t0);
        }
        if let Some(dt) = dt {
            builder = builder.dt(dt);
        }
        if let Some(rate) = sample_rate {
            builder = builder.sample_rate(rate);
        }
        if let Some(unit) = unit {
            builder = builder.unit(Unit::parse(unit)?);
        }
        if let Some(name) = name {
            builder = builder.name(name);
        }
        if let Some(channel) = channel {
            builder = builder.channel(channel);
        }
        Ok(PyTimeSeries { inner: builder.build()? })
    }

    #[getter]
    pub fn t0(&self) -> f64 {
        self.inner.t0()
    }

    #[getter]
    pub fn dt(&self) -> f64 {
        self.inner.dt()
    }

    #[getter]
    pub fn sample_rate(&self) -> f64 {
        self.inner.sample_rate()
    }

    #[getter]
    pub fn duration(&self) -> f64 {
        self.inner.duration()
    }

    #[getter]
    pub fn span(&self) -> (f64, f64) {
        self.inner.span()
    }

    #[getter]
    pub fn name(&self) -> Option<String> {
        self.inner.name().map(str::to_string)
    }

    #[getter]
    pub fn unit(&self) -> String {
        self.inner.unit().to_string()
    }

    #[getter]
    pub fn value<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.value().clone().into_pyarray(py)
    }

    #[getter]
    pub fn times<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.times().into_owned().into_pyarray(py)
    }

    #[pyo3(signature = (start = None, end = None, copy = false))]
    pub fn crop(&self, start: Option<f64>, end: Option<f64>, copy: bool) -> PyTimeSeries {
        PyTimeSeries { inner: self.inner.crop(start, end, copy) }
    }

    /// Append `other` in place.
    #[pyo3(signature = (other, gap = None, pad = None, resize = true))]
    pub fn append(&mut self, other: &PyTimeSeries, gap: Option<&str>, pad: Option<f64>, resize: bool) -> PyResult<()> {
        let opts = extract_append_options(gap, pad, resize)?;
        self.inner.append(&other.inner, &opts)?;
        Ok(())
    }

    /// Prepend `other` in place.
    #[pyo3(signature = (other, gap = None, pad = None, resize = true))]
    pub fn prepend(&mut self, other: &PyTimeSeries, gap: Option<&str>, pad: Option<f64>, resize: bool) -> PyResult<()> {
        let opts = extract_append_options(gap, pad, resize)?;
        self.inner.prepend(&other.inner, &opts)?;
        Ok(())
    }

    pub fn resample(&self, rate: f64) -> PyResult<PyTimeSeries> {
        Ok(PyTimeSeries { inner: self.inner.resample(rate)? })
    }

    pub fn copy(&self) -> PyTimeSeries {
        PyTimeSeries { inner: self.inner.copy() }
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn __repr__(&self) -> String {
        format!(
            "<TimeSeries name={:?} unit='{}' t0={} dt={} len={}>",
            self.inner.name().unwrap_or(""),
            self.inner.unit(),
            self.inner.t0(),
            self.inner.dt(),
            self.inner.len()
        )
    }
}

/// TimeSeriesList — Python-facing wrapper for a list of `f64` segments.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_gwseries", name = "TimeSeriesList")]
#[derive(Default)]
pub struct PyTimeSeriesList {
    inner: RsTimeSeriesList<f64>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyTimeSeriesList {
    #[new]
    #[pyo3(signature = (*items))]
    pub fn new(items: Vec<PyTimeSeries>) -> PyTimeSeriesList {
        PyTimeSeriesList { inner: items.into_iter().map(|ts| ts.inner).collect() }
    }

    pub fn append(&mut self, item: &PyTimeSeries) {
        self.inner.push(item.inner.clone());
    }

    /// Merge contiguous segments in place; returns the segment spans.
    pub fn coalesce(&mut self) -> PyResult<Vec<(f64, f64)>> {
        Ok(self.inner.coalesce()?.segments())
    }

    #[pyo3(signature = (pad = 0.0, gap = None))]
    pub fn join(&mut self, pad: f64, gap: Option<&str>) -> PyResult<PyTimeSeries> {
        let gap = parse_gap_policy(gap)?;
        Ok(PyTimeSeries { inner: self.inner.join(pad, gap)? })
    }

    pub fn segments(&self) -> Vec<(f64, f64)> {
        self.inner.segments()
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn __getitem__(&self, index: usize) -> PyResult<PyTimeSeries> {
        self.inner
            .get(index)
            .map(|ts| PyTimeSeries { inner: ts.clone() })
            .ok_or_else(|| PyIndexError::new_err("list index out of range"))
    }
}

/// rust_gwseries — PyO3 module initializer for the Python extension.
///
/// Registers `TimeSeries` and `TimeSeriesList` on the top-level module.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn rust_gwseries<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PyTimeSeries>()?;
    m.add_class::<PyTimeSeriesList>()?;
    Ok(())
}
