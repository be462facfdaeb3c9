//! Physical units for series values and axes.
//!
//! Purpose
//! -------
//! Give every series a physical unit for its values and for its index axis,
//! with enough algebra to derive `1/dt` as a frequency, combine units under
//! multiplication and division, and map units onto foreign unit systems.
//!
//! Key behaviors
//! -------------
//! - [`Unit`] stores a scale factor relative to SI plus rational powers of
//!   nine base dimensions: the seven SI bases, `strain`, and `count`.
//! - [`Unit::parse`] (and `FromStr`) accept compound strings such as
//!   `"m / s^2"`, `"strain / Hz^(1/2)"`, or `"1/Hz"`.
//! - Equality compares scale and dimensions; the display label is ignored.
//!
//! Conventions
//! -----------
//! - The empty string and `"dimensionless"` both parse to
//!   [`Unit::dimensionless`].
//! - Powers are `f64` so that half-integer powers (amplitude spectral
//!   densities) are representable; sums of small rationals stay exact.
use crate::types::errors::{SeriesError, SeriesResult};
use std::fmt;
use std::ops::{Div, Mul};
use std::str::FromStr;

/// Number of base dimensions tracked by [`Unit`].
pub const N_BASE: usize = 9;

/// Base dimensions, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseUnit {
    Meter,
    Kilogram,
    Second,
    Ampere,
    Kelvin,
    Mole,
    Candela,
    Strain,
    Count,
}

impl BaseUnit {
    /// All base dimensions in storage order.
    pub const ALL: [BaseUnit; N_BASE] = [
        BaseUnit::Meter,
        BaseUnit::Kilogram,
        BaseUnit::Second,
        BaseUnit::Ampere,
        BaseUnit::Kelvin,
        BaseUnit::Mole,
        BaseUnit::Candela,
        BaseUnit::Strain,
        BaseUnit::Count,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BaseUnit::Meter => "m",
            BaseUnit::Kilogram => "kg",
            BaseUnit::Second => "s",
            BaseUnit::Ampere => "A",
            BaseUnit::Kelvin => "K",
            BaseUnit::Mole => "mol",
            BaseUnit::Candela => "cd",
            BaseUnit::Strain => "strain",
            BaseUnit::Count => "ct",
        }
    }

    fn position(self) -> usize {
        self as usize
    }
}

/// A physical unit: `scale × Π base_i ^ power_i`.
#[derive(Debug, Clone)]
pub struct Unit {
    scale: f64,
    powers: [f64; N_BASE],
    label: Option<String>,
}

impl Unit {
    /// The dimensionless unit with scale 1.
    pub fn dimensionless() -> Unit {
        Unit { scale: 1.0, powers: [0.0; N_BASE], label: None }
    }

    /// A single base dimension with scale 1.
    pub fn base(base: BaseUnit) -> Unit {
        let mut powers = [0.0; N_BASE];
        powers[base.position()] = 1.0;
        Unit { scale: 1.0, powers, label: Some(base.symbol().to_string()) }
    }

    /// Build a unit directly from its scale and base powers.
    pub fn from_parts(scale: f64, powers: [f64; N_BASE]) -> Unit {
        Unit { scale, powers, label: None }
    }

    pub fn second() -> Unit {
        Unit::base(BaseUnit::Second)
    }

    pub fn hertz() -> Unit {
        Unit::second().recip().with_label("Hz")
    }

    /// Parse a unit string; see the module docs for the accepted grammar.
    pub fn parse(text: &str) -> SeriesResult<Unit> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "dimensionless" {
            return Ok(Unit::dimensionless());
        }
        let mut parser = Parser { chars: trimmed.chars().collect(), pos: 0, source: trimmed };
        let unit = parser.expression()?;
        parser.skip_ws();
        if parser.pos != parser.chars.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(unit.with_label(trimmed))
    }

    /// Attach a display label without changing the unit's value.
    pub fn with_label(mut self, label: impl Into<String>) -> Unit {
        self.label = Some(label.into());
        self
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn powers(&self) -> &[f64; N_BASE] {
        &self.powers
    }

    /// Power of one base dimension.
    pub fn power_of(&self, base: BaseUnit) -> f64 {
        self.powers[base.position()]
    }

    pub fn is_dimensionless(&self) -> bool {
        self.powers.iter().all(|&p| p == 0.0)
    }

    /// Same dimensions, regardless of scale.
    pub fn is_equivalent(&self, other: &Unit) -> bool {
        self.powers == other.powers
    }

    /// Factor `f` such that `x [self] == x·f [other]`, if the dimensions agree.
    pub fn conversion_factor(&self, other: &Unit) -> Option<f64> {
        if self.is_equivalent(other) { Some(self.scale / other.scale) } else { None }
    }

    /// `1 / self`.
    pub fn recip(&self) -> Unit {
        let mut powers = self.powers;
        powers.iter_mut().for_each(|p| *p = -*p);
        Unit { scale: 1.0 / self.scale, powers, label: None }
    }

    /// `self ^ exponent`.
    pub fn powf(&self, exponent: f64) -> Unit {
        let mut powers = self.powers;
        powers.iter_mut().for_each(|p| *p *= exponent);
        Unit { scale: self.scale.powf(exponent), powers, label: None }
    }

    fn combine(&self, other: &Unit, sign: f64) -> Unit {
        let mut powers = self.powers;
        for (p, q) in powers.iter_mut().zip(other.powers.iter()) {
            *p += sign * q;
        }
        let scale = if sign > 0.0 { self.scale * other.scale } else { self.scale / other.scale };
        Unit { scale, powers, label: None }
    }
}

impl Default for Unit {
    fn default() -> Unit {
        Unit::dimensionless()
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Unit) -> bool {
        self.powers == other.powers
            && (self.scale - other.scale).abs() <= 1e-12 * self.scale.abs().max(other.scale.abs())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            return f.write_str(label);
        }
        let mut parts: Vec<String> = Vec::new();
        if self.scale != 1.0 {
            parts.push(format!("{}", self.scale));
        }
        for base in BaseUnit::ALL {
            let p = self.powers[base.position()];
            if p == 0.0 {
                continue;
            }
            if p == 1.0 {
                parts.push(base.symbol().to_string());
            } else {
                parts.push(format!("{}^{}", base.symbol(), p));
            }
        }
        f.write_str(&parts.join(" "))
    }
}

impl FromStr for Unit {
    type Err = SeriesError;

    fn from_str(s: &str) -> SeriesResult<Unit> {
        Unit::parse(s)
    }
}

impl Mul for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        self.combine(rhs, 1.0)
    }
}

impl Mul for Unit {
    type Output = Unit;

    fn mul(self, rhs: Unit) -> Unit {
        self.combine(&rhs, 1.0)
    }
}

impl Div for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self.combine(rhs, -1.0)
    }
}

impl Div for Unit {
    type Output = Unit;

    fn div(self, rhs: Unit) -> Unit {
        self.combine(&rhs, -1.0)
    }
}

// ---- Named units ----------------------------------------------------------

// (name, scale, [m, kg, s, A, K, mol, cd, strain, ct])
const NAMED_UNITS: &[(&str, f64, [f64; N_BASE])] = &[
    ("m", 1.0, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("km", 1e3, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("cm", 1e-2, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("mm", 1e-3, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("um", 1e-6, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("nm", 1e-9, [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("kg", 1.0, [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("g", 1e-3, [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("s", 1.0, [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("second", 1.0, [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("seconds", 1.0, [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("ms", 1e-3, [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("us", 1e-6, [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("ns", 1e-9, [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("min", 60.0, [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("h", 3600.0, [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("d", 86400.0, [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("Hz", 1.0, [0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("Hertz", 1.0, [0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("mHz", 1e-3, [0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("kHz", 1e3, [0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("MHz", 1e6, [0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("A", 1.0, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("mA", 1e-3, [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("K", 1.0, [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]),
    ("mol", 1.0, [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]),
    ("cd", 1.0, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
    ("strain", 1.0, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
    ("ct", 1.0, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
    ("count", 1.0, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
    ("counts", 1.0, [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
    ("N", 1.0, [1.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("J", 1.0, [2.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("W", 1.0, [2.0, 1.0, -3.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("Pa", 1.0, [-1.0, 1.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("C", 1.0, [0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("V", 1.0, [2.0, 1.0, -3.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("mV", 1e-3, [2.0, 1.0, -3.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("uV", 1e-6, [2.0, 1.0, -3.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("Ohm", 1.0, [2.0, 1.0, -3.0, -2.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("T", 1.0, [0.0, 1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
    ("rad", 1.0, [0.0; N_BASE]),
    ("deg", std::f64::consts::PI / 180.0, [0.0; N_BASE]),
];

fn named_unit(name: &str) -> Option<Unit> {
    NAMED_UNITS
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(n, scale, powers)| Unit { scale: *scale, powers: *powers, label: Some(n.to_string()) })
}

// ---- Parser ---------------------------------------------------------------
//
// expression := term (('*' | '/' | <space>) term)*
// term       := factor ('^' exponent)?
// factor     := identifier | number | '(' expression ')'
// exponent   := ['-'] number | '(' ['-'] number ['/' number] ')'

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    source: &'a str,
}

impl Parser<'_> {
    fn error(&self, reason: &str) -> SeriesError {
        SeriesError::InvalidUnit {
            unit: self.source.to_string(),
            reason: format!("{reason} at position {}", self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expression(&mut self) -> SeriesResult<Unit> {
        let mut unit = self.term()?;
        loop {
            self.skip_ws();
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    if self.peek() == Some('*') {
                        return Err(self.error("unexpected '**' outside an exponent"));
                    }
                    unit = &unit * &self.term()?;
                }
                Some('/') => {
                    self.pos += 1;
                    unit = &unit / &self.term()?;
                }
                Some(c) if c.is_alphanumeric() || c == '(' => {
                    unit = &unit * &self.term()?;
                }
                _ => return Ok(unit),
            }
        }
    }

    fn term(&mut self) -> SeriesResult<Unit> {
        let base = self.factor()?;
        self.skip_ws();
        let has_exponent = match (self.peek(), self.chars.get(self.pos + 1)) {
            (Some('^'), _) => {
                self.pos += 1;
                true
            }
            (Some('*'), Some('*')) => {
                self.pos += 2;
                true
            }
            _ => false,
        };
        if has_exponent {
            let exponent = self.exponent()?;
            Ok(base.powf(exponent))
        } else {
            Ok(base)
        }
    }

    fn factor(&mut self) -> SeriesResult<Unit> {
        self.skip_ws();
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let inner = self.expression()?;
                self.skip_ws();
                if self.peek() != Some(')') {
                    return Err(self.error("expected ')'"));
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let value = self.number()?;
                Ok(Unit { scale: value, powers: [0.0; N_BASE], label: None })
            }
            Some(c) if c.is_alphabetic() => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_alphabetic() || c == '_') {
                    self.pos += 1;
                }
                let name: String = self.chars[start..self.pos].iter().collect();
                named_unit(&name).ok_or_else(|| SeriesError::InvalidUnit {
                    unit: self.source.to_string(),
                    reason: format!("unknown unit '{name}'"),
                })
            }
            _ => Err(self.error("expected a unit")),
        }
    }

    fn exponent(&mut self) -> SeriesResult<f64> {
        self.skip_ws();
        if self.peek() == Some('(') {
            self.pos += 1;
            let numerator = self.signed_number()?;
            self.skip_ws();
            let value = if self.peek() == Some('/') {
                self.pos += 1;
                let denominator = self.signed_number()?;
                if denominator == 0.0 {
                    return Err(self.error("zero denominator in exponent"));
                }
                numerator / denominator
            } else {
                numerator
            };
            self.skip_ws();
            if self.peek() != Some(')') {
                return Err(self.error("expected ')' after exponent"));
            }
            self.pos += 1;
            Ok(value)
        } else {
            self.signed_number()
        }
    }

    fn signed_number(&mut self) -> SeriesResult<f64> {
        self.skip_ws();
        let negative = if self.peek() == Some('-') {
            self.pos += 1;
            true
        } else {
            false
        };
        let value = self.number()?;
        Ok(if negative { -value } else { value })
    }

    fn number(&mut self) -> SeriesResult<f64> {
        self.skip_ws();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>().map_err(|_| self.error("expected a number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Hertz is the reciprocal of the second.
    //
    // Expect
    // ------
    // - `Unit::hertz() == 1 / Unit::second()` and it displays as "Hz".
    fn hertz_is_reciprocal_second() {
        assert_eq!(Unit::hertz(), Unit::second().recip());
        assert_eq!(Unit::hertz().to_string(), "Hz");
    }

    #[test]
    // Purpose
    // -------
    // Compound strings parse into the expected dimensions.
    //
    // Given
    // -----
    // - "m / s^2", "strain / Hz^(1/2)", "1/Hz", "kg m**2".
    //
    // Expect
    // ------
    // - Powers match the hand-derived dimensions.
    fn parse_compound_strings() {
        let accel = Unit::parse("m / s^2").unwrap();
        assert_eq!(accel.power_of(BaseUnit::Meter), 1.0);
        assert_eq!(accel.power_of(BaseUnit::Second), -2.0);

        let asd = Unit::parse("strain / Hz^(1/2)").unwrap();
        assert_eq!(asd.power_of(BaseUnit::Strain), 1.0);
        assert_eq!(asd.power_of(BaseUnit::Second), 0.5);

        let per_hz = Unit::parse("1/Hz").unwrap();
        assert_eq!(per_hz, Unit::second());

        let moment = Unit::parse("kg m**2").unwrap();
        assert_eq!(moment.power_of(BaseUnit::Kilogram), 1.0);
        assert_eq!(moment.power_of(BaseUnit::Meter), 2.0);
    }

    #[test]
    fn parse_keeps_label_for_display() {
        let unit: Unit = "ct".parse().unwrap();
        assert_eq!(unit.to_string(), "ct");
        assert_eq!(Unit::parse("").unwrap(), Unit::dimensionless());
        assert_eq!(Unit::parse("dimensionless").unwrap().to_string(), "");
    }

    #[test]
    // Purpose
    // -------
    // Unknown names and malformed input are reported as `InvalidUnit`.
    fn parse_rejects_unknown_and_malformed() {
        assert!(matches!(Unit::parse("furlong"), Err(SeriesError::InvalidUnit { .. })));
        assert!(matches!(Unit::parse("m / (s"), Err(SeriesError::InvalidUnit { .. })));
        assert!(matches!(Unit::parse("m ^"), Err(SeriesError::InvalidUnit { .. })));
    }

    #[test]
    fn conversion_factor_between_time_units() {
        let ms = Unit::parse("ms").unwrap();
        assert_relative_eq!(ms.conversion_factor(&Unit::second()).unwrap(), 1e-3);
        assert!(ms.conversion_factor(&Unit::hertz()).is_none());
    }

    #[test]
    fn unit_algebra_cancels_dimensions() {
        let volt = Unit::parse("V").unwrap();
        let ratio = &volt / &volt;
        assert!(ratio.is_dimensionless());
        let energy = Unit::parse("N").unwrap() * Unit::parse("m").unwrap();
        assert_eq!(energy, Unit::parse("J").unwrap());
    }
}
