//! Argument conversion helpers for the Python bindings.
//!
//! Only the keyword parsing is available without `python-bindings`.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::PyReadonlyArray1;

#[cfg(feature = "python-bindings")]
use crate::types::AppendOptions;
use crate::types::{GapPolicy, SeriesResult};

/// Copy a 1-D array-like (ndarray, pandas Series, or sequence of floats)
/// into an owned `f64` array.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array<'py>(raw_data: &Bound<'py, PyAny>) -> PyResult<Array1<f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr_ro.as_array().to_owned());
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series_ro.as_array().to_owned());
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(Array1::from(vec))
}

/// Append options from the Python keyword arguments `gap`, `pad`, `resize`.
#[cfg(feature = "python-bindings")]
pub fn extract_append_options(
    gap: Option<&str>, pad: Option<f64>, resize: bool,
) -> PyResult<AppendOptions<f64>> {
    let mut opts = AppendOptions::new().resize(resize);
    if let Some(gap) = gap {
        opts = opts.gap(parse_gap_policy(Some(gap))?);
    }
    if let Some(pad) = pad {
        opts = opts.pad(pad);
    }
    Ok(opts)
}

/// Gap policy from an optional Python keyword; absent means `raise`.
pub fn parse_gap_policy(gap: Option<&str>) -> SeriesResult<GapPolicy> {
    gap.map_or(Ok(GapPolicy::default()), str::parse)
}
