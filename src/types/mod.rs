//! Indexed-series primitive: element types, units, axis descriptors, the
//! [`Series`] container, and its concatenation and arithmetic algebra.
//!
//! Everything time-specific lives in [`crate::timeseries`]; this module is
//! axis-agnostic and parameterized by an [`AxisKind`] marker.
pub mod append;
pub mod element;
pub mod errors;
pub mod index;
pub mod ops;
pub mod series;
pub mod units;

pub use append::{AppendOptions, GapPolicy, MAX_PAD_SAMPLES};
pub use element::{DType, Element};
pub use errors::{SeriesError, SeriesResult};
pub use index::{AxisKind, Frequency, Generic, Indexed, Time, XIndex};
pub use ops::{Comparison, Logical};
pub use series::{CONTIGUITY_TOL, Contiguity, Series};
pub use units::{BaseUnit, N_BASE, Unit};
