//! Element-wise arithmetic and boolean-result operations on series.
//!
//! Purpose
//! -------
//! Provide the algebra that turns series into new series: scalar arithmetic
//! through the standard operator traits, fallible series-by-series arithmetic
//! with unit bookkeeping, and comparisons / logical combinations whose boolean
//! output is promoted to a labelled `Series<bool, K>`.
//!
//! Key behaviors
//! -------------
//! - Scalar `+ - * /` keep every piece of metadata, including the unit.
//! - [`Series::try_add`] / [`Series::try_sub`] require equal units;
//!   [`Series::try_mul`] / [`Series::try_div`] combine them.
//! - Every boolean result is dimensionless and named
//!   `"{lhs name} {operator} {rhs}"`. Operators with a conventional symbol
//!   use it (`<`, `<=`, `==`, `>=`, `>`); all others use their own name
//!   (`not_equal`, `logical_and`, ...). When the left operand has no name the
//!   leading part is omitted.
//!
//! Invariants & assumptions
//! ------------------------
//! - Series operands must have equal length and compatible axes
//!   ([`Series::is_compatible`] minus the unit check for `*` and `/`).
use crate::types::{
    element::Element,
    errors::{SeriesError, SeriesResult},
    index::AxisKind,
    series::Series,
    units::Unit,
};
use ndarray::{Array1, Zip};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Closed set of element-wise comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Less,
    LessEqual,
    Equal,
    NotEqual,
    GreaterEqual,
    Greater,
}

impl Comparison {
    /// Conventional symbol, if the operator has one.
    pub fn symbol(self) -> Option<&'static str> {
        match self {
            Comparison::Less => Some("<"),
            Comparison::LessEqual => Some("<="),
            Comparison::Equal => Some("=="),
            Comparison::GreaterEqual => Some(">="),
            Comparison::Greater => Some(">"),
            Comparison::NotEqual => None,
        }
    }

    /// Operator name, e.g. `"greater_equal"`.
    pub fn op_name(self) -> &'static str {
        match self {
            Comparison::Less => "less",
            Comparison::LessEqual => "less_equal",
            Comparison::Equal => "equal",
            Comparison::NotEqual => "not_equal",
            Comparison::GreaterEqual => "greater_equal",
            Comparison::Greater => "greater",
        }
    }

    /// Label used in result names: the symbol, else the operator name.
    pub fn label(self) -> &'static str {
        self.symbol().unwrap_or(self.op_name())
    }

    pub fn apply<T: PartialOrd>(self, a: &T, b: &T) -> bool {
        match self {
            Comparison::Less => a < b,
            Comparison::LessEqual => a <= b,
            Comparison::Equal => a == b,
            Comparison::NotEqual => a != b,
            Comparison::GreaterEqual => a >= b,
            Comparison::Greater => a > b,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Element-wise logical operators between boolean series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logical {
    And,
    Or,
    Xor,
}

impl Logical {
    pub fn op_name(self) -> &'static str {
        match self {
            Logical::And => "logical_and",
            Logical::Or => "logical_or",
            Logical::Xor => "logical_xor",
        }
    }

    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            Logical::And => a && b,
            Logical::Or => a || b,
            Logical::Xor => a ^ b,
        }
    }
}

impl fmt::Display for Logical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.op_name())
    }
}

fn result_name(lhs: Option<&str>, op: &str, rhs: &str) -> String {
    match lhs {
        Some(name) => format!("{name} {op} {rhs}"),
        None => format!("{op} {rhs}"),
    }
}

fn operand_label<A, K>(series: &Series<A, K>) -> &str
where
    A: Element,
    K: AxisKind,
{
    series.name().unwrap_or("<unnamed>")
}

impl<A: Element, K: AxisKind> Series<A, K> {
    /// Re-tag boolean `values` as a state series derived from `self`.
    fn promote_bool(&self, values: Array1<bool>, name: String) -> Series<bool, K> {
        let mut out = self.with_values(values);
        out.override_unit(Unit::dimensionless());
        out.set_name(Some(name));
        out
    }

    fn check_operand(&self, other: &Series<A, K>, check_unit: bool) -> SeriesResult<()> {
        if self.len() != other.len() {
            return Err(SeriesError::LengthMismatch { left: self.len(), right: other.len() });
        }
        match self.is_compatible(other) {
            Err(SeriesError::IncompatibleUnits { .. }) if !check_unit => Ok(()),
            result => result,
        }
    }

    fn zip_with<F>(&self, other: &Series<A, K>, f: F) -> Array1<A>
    where
        F: Fn(A, A) -> A,
    {
        Zip::from(self.value()).and(other.value()).map_collect(|&a, &b| f(a, b))
    }

    /// Compare every sample against `rhs`.
    pub fn compare(&self, op: Comparison, rhs: A) -> Series<bool, K>
    where
        A: PartialOrd,
    {
        let values = self.value().mapv(|v| op.apply(&v, &rhs));
        self.promote_bool(values, result_name(self.name(), op.label(), &rhs.to_string()))
    }

    /// Compare sample-by-sample against another series.
    pub fn compare_series(&self, op: Comparison, rhs: &Series<A, K>) -> SeriesResult<Series<bool, K>>
    where
        A: PartialOrd,
    {
        self.check_operand(rhs, true)?;
        let values = Zip::from(self.value()).and(rhs.value()).map_collect(|a, b| op.apply(a, b));
        Ok(self.promote_bool(values, result_name(self.name(), op.label(), operand_label(rhs))))
    }

    pub fn lt(&self, rhs: A) -> Series<bool, K>
    where
        A: PartialOrd,
    {
        self.compare(Comparison::Less, rhs)
    }

    pub fn le(&self, rhs: A) -> Series<bool, K>
    where
        A: PartialOrd,
    {
        self.compare(Comparison::LessEqual, rhs)
    }

    pub fn gt(&self, rhs: A) -> Series<bool, K>
    where
        A: PartialOrd,
    {
        self.compare(Comparison::Greater, rhs)
    }

    pub fn ge(&self, rhs: A) -> Series<bool, K>
    where
        A: PartialOrd,
    {
        self.compare(Comparison::GreaterEqual, rhs)
    }

    pub fn equal(&self, rhs: A) -> Series<bool, K>
    where
        A: PartialOrd,
    {
        self.compare(Comparison::Equal, rhs)
    }

    pub fn not_equal(&self, rhs: A) -> Series<bool, K>
    where
        A: PartialOrd,
    {
        self.compare(Comparison::NotEqual, rhs)
    }

    /// Sample-wise sum; units must match.
    pub fn try_add(&self, other: &Series<A, K>) -> SeriesResult<Series<A, K>>
    where
        A: Add<Output = A>,
    {
        self.check_operand(other, true)?;
        Ok(self.with_values(self.zip_with(other, |a, b| a + b)))
    }

    /// Sample-wise difference; units must match.
    pub fn try_sub(&self, other: &Series<A, K>) -> SeriesResult<Series<A, K>>
    where
        A: Sub<Output = A>,
    {
        self.check_operand(other, true)?;
        Ok(self.with_values(self.zip_with(other, |a, b| a - b)))
    }

    /// Sample-wise product; the result unit is the product of the units.
    pub fn try_mul(&self, other: &Series<A, K>) -> SeriesResult<Series<A, K>>
    where
        A: Mul<Output = A>,
    {
        self.check_operand(other, false)?;
        let mut out = self.with_values(self.zip_with(other, |a, b| a * b));
        out.override_unit(self.unit() * other.unit());
        Ok(out)
    }

    /// Sample-wise quotient; the result unit is the quotient of the units.
    pub fn try_div(&self, other: &Series<A, K>) -> SeriesResult<Series<A, K>>
    where
        A: Div<Output = A>,
    {
        self.check_operand(other, false)?;
        let mut out = self.with_values(self.zip_with(other, |a, b| a / b));
        out.override_unit(self.unit() / other.unit());
        Ok(out)
    }
}

impl<K: AxisKind> Series<bool, K> {
    /// Combine two boolean series sample by sample.
    pub fn logical(&self, op: Logical, other: &Series<bool, K>) -> SeriesResult<Series<bool, K>> {
        self.check_operand(other, false)?;
        let values = Zip::from(self.value()).and(other.value()).map_collect(|&a, &b| op.apply(a, b));
        Ok(self.promote_bool(values, result_name(self.name(), op.op_name(), operand_label(other))))
    }

    pub fn logical_and(&self, other: &Series<bool, K>) -> SeriesResult<Series<bool, K>> {
        self.logical(Logical::And, other)
    }

    pub fn logical_or(&self, other: &Series<bool, K>) -> SeriesResult<Series<bool, K>> {
        self.logical(Logical::Or, other)
    }

    pub fn logical_xor(&self, other: &Series<bool, K>) -> SeriesResult<Series<bool, K>> {
        self.logical(Logical::Xor, other)
    }

    /// Number of `true` samples.
    pub fn count_true(&self) -> usize {
        self.value().iter().filter(|&&v| v).count()
    }
}

macro_rules! impl_scalar_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<A, K> $trait<A> for &Series<A, K>
        where
            A: Element + $trait<Output = A>,
            K: AxisKind,
        {
            type Output = Series<A, K>;

            fn $method(self, rhs: A) -> Series<A, K> {
                self.with_values(self.value().mapv(|v| v $op rhs))
            }
        }

        impl<A, K> $trait<A> for Series<A, K>
        where
            A: Element + $trait<Output = A>,
            K: AxisKind,
        {
            type Output = Series<A, K>;

            fn $method(self, rhs: A) -> Series<A, K> {
                (&self).$method(rhs)
            }
        }
    };
}

impl_scalar_op!(Add, add, +);
impl_scalar_op!(Sub, sub, -);
impl_scalar_op!(Mul, mul, *);
impl_scalar_op!(Div, div, /);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::index::{Indexed, Time};
    use ndarray::array;

    fn strain() -> Series<f64, Time> {
        Series::new(array![1.0, 4.0, 2.0, 5.0])
            .with_name("H1:STRAIN")
            .with_unit(Unit::parse("strain").unwrap())
            .with_x0(100.0)
            .with_dx(0.25)
            .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // A scalar comparison yields a dimensionless, labelled boolean series.
    //
    // Given
    // -----
    // - `H1:STRAIN = [1, 4, 2, 5]` in strain units.
    //
    // Expect
    // ------
    // - `> 3` gives `[false, true, false, true]` named `"H1:STRAIN > 3"`,
    //   dimensionless, on the same time axis.
    fn comparison_promotes_to_labelled_bool() {
        let s = strain();
        let mask = s.gt(3.0);
        assert_eq!(mask.value(), &array![false, true, false, true]);
        assert_eq!(mask.name(), Some("H1:STRAIN > 3"));
        assert!(mask.unit().is_dimensionless());
        assert_eq!(mask.x0(), 100.0);
        assert_eq!(mask.dx(), 0.25);
        assert_eq!(mask.count_true(), 2);
    }

    #[test]
    fn every_symbol_is_used_and_not_equal_falls_back_to_name() {
        let s = strain();
        assert_eq!(s.lt(2.0).name(), Some("H1:STRAIN < 2"));
        assert_eq!(s.le(2.0).name(), Some("H1:STRAIN <= 2"));
        assert_eq!(s.equal(2.0).name(), Some("H1:STRAIN == 2"));
        assert_eq!(s.ge(2.0).name(), Some("H1:STRAIN >= 2"));
        assert_eq!(s.not_equal(2.0).name(), Some("H1:STRAIN not_equal 2"));
    }

    #[test]
    fn unnamed_operand_omits_leading_name() {
        let s: Series<i32, Time> = Series::new(array![1, 2]);
        assert_eq!(s.gt(1).name(), Some("> 1"));
    }

    #[test]
    // Purpose
    // -------
    // Logical combinations of boolean series are labelled by operator name.
    fn logical_ops_combine_masks() {
        let s = strain();
        let high = s.gt(1.5);
        let low = s.lt(4.5);
        let both = high.logical_and(&low).unwrap();
        assert_eq!(both.value(), &array![false, true, true, false]);
        assert_eq!(both.name(), Some("H1:STRAIN > 1.5 logical_and H1:STRAIN < 4.5"));
        let either = high.logical_xor(&low).unwrap();
        assert_eq!(either.value(), &array![true, false, false, true]);
    }

    #[test]
    fn scalar_arithmetic_keeps_metadata() {
        let s = strain();
        let scaled = &s * 2.0;
        assert_eq!(scaled.value(), &array![2.0, 8.0, 4.0, 10.0]);
        assert_eq!(scaled.unit(), s.unit());
        assert_eq!(scaled.name(), Some("H1:STRAIN"));
        let shifted = s - 1.0;
        assert_eq!(shifted.value(), &array![0.0, 3.0, 1.0, 4.0]);
    }

    #[test]
    // Purpose
    // -------
    // Series-by-series arithmetic enforces lengths and units.
    fn series_arithmetic_checks_operands() {
        let s = strain();
        let doubled = s.try_add(&s).unwrap();
        assert_eq!(doubled.value(), &array![2.0, 8.0, 4.0, 10.0]);

        let volts = s.copy().with_unit(Unit::parse("V").unwrap());
        assert!(matches!(s.try_add(&volts), Err(SeriesError::IncompatibleUnits { .. })));
        let product = s.try_mul(&volts).unwrap();
        assert_eq!(product.unit(), &Unit::parse("strain V").unwrap());
        let ratio = volts.try_div(&volts).unwrap();
        assert!(ratio.unit().is_dimensionless());

        let short = s.slice(0..2);
        assert_eq!(s.try_sub(&short), Err(SeriesError::LengthMismatch { left: 4, right: 2 }));
    }
}
