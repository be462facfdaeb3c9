//! Bridge to LAL-style time series structures.
//!
//! Purpose
//! -------
//! Convert [`TimeSeries`] values to and from the layout used by the LAL
//! C library: a name, a split-integer GPS epoch, a heterodyne frequency
//! `f0`, the step `deltaT` in seconds, a unit expressed as a power of ten
//! times rational powers of seven base units, and a typed data vector.
//!
//! Key behaviors
//! -------------
//! - The storage type follows the element type via [`LalType`]; element
//!   types LAL has no vector for (`bool`, `u8`) fail with
//!   `UnsupportedDType`.
//! - [`LalUnit::from_unit`] cannot express mole, candela, or a scale that
//!   is not a power of ten. Such units are replaced by dimensionless with a
//!   warning rather than failing the conversion.
//! - `to_lal` requires a regular time axis measured in a time unit.
//!
//! Invariants & assumptions
//! ------------------------
//! - `from_lal(to_lal(x))` reproduces values, unit, `dt` and `t0` whenever
//!   the unit is representable and `t0` is a whole number of nanoseconds.
use crate::detector::Channel;
use crate::time::LigoTimeGps;
use crate::timeseries::{TimeDomain, TimeSeries, TimeSeriesBuilder};
use crate::types::{BaseUnit, DType, Element, Indexed, N_BASE, Series, SeriesError, SeriesResult, Time, Unit};
use ndarray::Array1;
use std::fmt;

const TARGET: &str = "LAL";

/// LAL base units in LAL's own order.
pub const LAL_BASE_UNITS: [BaseUnit; 7] = [
    BaseUnit::Meter,
    BaseUnit::Kilogram,
    BaseUnit::Second,
    BaseUnit::Ampere,
    BaseUnit::Kelvin,
    BaseUnit::Strain,
    BaseUnit::Count,
];

const MAX_DENOMINATOR: i32 = 16;
const POWER_TOL: f64 = 1e-9;

/// LAL storage class of a data vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LalType {
    Int2,
    Int4,
    Int8,
    UInt2,
    UInt4,
    UInt8,
    Real4,
    Real8,
    Complex8,
    Complex16,
}

impl LalType {
    pub fn for_dtype(dtype: DType) -> SeriesResult<LalType> {
        Ok(match dtype {
            DType::Int16 => LalType::Int2,
            DType::Int32 => LalType::Int4,
            DType::Int64 => LalType::Int8,
            DType::UInt16 => LalType::UInt2,
            DType::UInt32 => LalType::UInt4,
            DType::UInt64 => LalType::UInt8,
            DType::Float32 => LalType::Real4,
            DType::Float64 => LalType::Real8,
            DType::Complex64 => LalType::Complex8,
            DType::Complex128 => LalType::Complex16,
            DType::Bool | DType::UInt8 => return Err(SeriesError::UnsupportedDType { dtype, target: TARGET }),
        })
    }

    pub fn dtype(self) -> DType {
        match self {
            LalType::Int2 => DType::Int16,
            LalType::Int4 => DType::Int32,
            LalType::Int8 => DType::Int64,
            LalType::UInt2 => DType::UInt16,
            LalType::UInt4 => DType::UInt32,
            LalType::UInt8 => DType::UInt64,
            LalType::Real4 => DType::Float32,
            LalType::Real8 => DType::Float64,
            LalType::Complex8 => DType::Complex64,
            LalType::Complex16 => DType::Complex128,
        }
    }

    /// Type code as it appears in LAL function names (`"REAL8"`, ...).
    pub fn code(self) -> &'static str {
        match self {
            LalType::Int2 => "INT2",
            LalType::Int4 => "INT4",
            LalType::Int8 => "INT8",
            LalType::UInt2 => "UINT2",
            LalType::UInt4 => "UINT4",
            LalType::UInt8 => "UINT8",
            LalType::Real4 => "REAL4",
            LalType::Real8 => "REAL8",
            LalType::Complex8 => "COMPLEX8",
            LalType::Complex16 => "COMPLEX16",
        }
    }
}

impl fmt::Display for LalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// `10^power_of_ten × Π base_i ^ (numerator_i / (denominator_minus_one_i + 1))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LalUnit {
    pub power_of_ten: i16,
    pub unit_numerator: [i16; 7],
    pub unit_denominator_minus_one: [u16; 7],
}

/// Smallest-denominator fraction equal to `value`, if one exists.
fn rational(value: f64) -> Option<(i16, u16)> {
    (1..=MAX_DENOMINATOR).find_map(|den| {
        let num = (value * f64::from(den)).round();
        let fits = (num / f64::from(den) - value).abs() <= POWER_TOL && num.abs() <= f64::from(i16::MAX);
        fits.then(|| (num as i16, (den - 1) as u16))
    })
}

impl LalUnit {
    pub fn dimensionless() -> LalUnit {
        LalUnit::default()
    }

    /// LAL form of `unit`, or dimensionless (with a warning) when `unit`
    /// has no LAL equivalent.
    pub fn from_unit(unit: &Unit) -> LalUnit {
        match LalUnit::try_from_unit(unit) {
            Some(lal) => lal,
            None => {
                tracing::warn!(unit = %unit, "unit has no LAL equivalent, using dimensionless");
                LalUnit::dimensionless()
            }
        }
    }

    fn try_from_unit(unit: &Unit) -> Option<LalUnit> {
        if unit.power_of(BaseUnit::Mole) != 0.0 || unit.power_of(BaseUnit::Candela) != 0.0 {
            return None;
        }
        let exponent = unit.scale().log10().round();
        if !exponent.is_finite() || (10f64.powf(exponent) - unit.scale()).abs() > 1e-12 * unit.scale().abs() {
            return None;
        }
        let mut lal = LalUnit { power_of_ten: exponent as i16, ..LalUnit::default() };
        for (i, base) in LAL_BASE_UNITS.iter().enumerate() {
            let (num, den_minus_one) = rational(unit.power_of(*base))?;
            lal.unit_numerator[i] = num;
            lal.unit_denominator_minus_one[i] = if num == 0 { 0 } else { den_minus_one };
        }
        Some(lal)
    }

    pub fn to_unit(&self) -> Unit {
        let mut powers = [0.0; N_BASE];
        for (i, base) in LAL_BASE_UNITS.iter().enumerate() {
            let den = f64::from(self.unit_denominator_minus_one[i]) + 1.0;
            powers[*base as usize] = f64::from(self.unit_numerator[i]) / den;
        }
        Unit::from_parts(10f64.powi(i32::from(self.power_of_ten)), powers)
    }
}

/// LAL-layout time series.
#[derive(Debug, Clone, PartialEq)]
pub struct LalTimeSeries<A> {
    pub name: String,
    pub epoch: LigoTimeGps,
    pub f0: f64,
    pub delta_t: f64,
    pub sample_units: LalUnit,
    pub data: Array1<A>,
}

impl<A: Element> LalTimeSeries<A> {
    pub fn lal_type(&self) -> SeriesResult<LalType> {
        LalType::for_dtype(A::DTYPE)
    }
}

impl<A: Element> Series<A, Time> {
    /// Copy into a LAL-layout series.
    ///
    /// Errors
    /// ------
    /// - `UnsupportedDType` for element types without a LAL vector.
    /// - `IrregularIndex` for explicit time indices.
    /// - `IncompatibleXUnits` when the axis is not measured in time.
    pub fn to_lal(&self) -> SeriesResult<LalTimeSeries<A>> {
        LalType::for_dtype(A::DTYPE)?;
        if !self.xindex().is_regular() {
            return Err(SeriesError::IrregularIndex { operation: "to_lal" });
        }
        let factor = self.xunit().conversion_factor(&Unit::second()).ok_or_else(|| {
            SeriesError::IncompatibleXUnits { left: self.xunit().to_string(), right: Unit::second().to_string() }
        })?;
        Ok(LalTimeSeries {
            name: self.name().unwrap_or_default().to_string(),
            epoch: LigoTimeGps::from_f64(self.t0() * factor)?,
            f0: 0.0,
            delta_t: self.dt() * factor,
            sample_units: LalUnit::from_unit(self.unit()),
            data: self.value().clone(),
        })
    }

    /// Build a series from a LAL-layout one.
    ///
    /// A non-empty LAL name becomes both the name and the channel; the
    /// channel also records the sample rate `1 / deltaT`, the unit, and the
    /// element type.
    pub fn from_lal(lal: &LalTimeSeries<A>) -> SeriesResult<TimeSeries<A>> {
        let unit = lal.sample_units.to_unit();
        let mut builder = TimeSeriesBuilder::new(lal.data.clone())
            .epoch(lal.epoch)
            .dt(lal.delta_t)
            .unit(unit.clone());
        if !lal.name.is_empty() {
            let channel = Channel::new(&lal.name)
                .with_sample_rate(1.0 / lal.delta_t)
                .with_unit(unit)
                .with_dtype(A::DTYPE);
            builder = builder.channel(channel);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use num_complex::Complex64;

    #[test]
    // Purpose
    // -------
    // Values, unit, step, and epoch survive a round trip.
    //
    // Given
    // -----
    // - A strain series at 16384 Hz starting at a half-second GPS time.
    //
    // Expect
    // ------
    // - REAL8 storage; the series read back equals the original.
    fn round_trip_preserves_metadata() {
        let ts = TimeSeriesBuilder::new(array![1.0, -2.0, 3.5])
            .t0(1_126_259_462.5)
            .sample_rate(16384.0)
            .unit(Unit::parse("strain").unwrap())
            .name("H1:GDS-CALIB_STRAIN")
            .build()
            .unwrap();
        let lal = ts.to_lal().unwrap();
        assert_eq!(lal.lal_type().unwrap(), LalType::Real8);
        assert_eq!(lal.epoch, LigoTimeGps::new(1_126_259_462, 500_000_000));
        assert_eq!(lal.sample_units.unit_numerator, [0, 0, 0, 0, 0, 1, 0]);

        let back = Series::from_lal(&lal).unwrap();
        assert_eq!(back.value(), ts.value());
        assert_eq!(back.unit(), ts.unit());
        assert_eq!(back.dt(), ts.dt());
        assert_eq!(back.t0(), ts.t0());
        assert_eq!(back.name(), Some("H1:GDS-CALIB_STRAIN"));
    }

    #[test]
    // Purpose
    // -------
    // The channel read back from LAL carries the nominal rate, unit, and
    // element type of the data.
    //
    // Given
    // -----
    // - A named REAL4 series in metres at deltaT = 1/256 s.
    //
    // Expect
    // ------
    // - Channel rate 256 Hz, unit m, dtype float32.
    // - An unnamed LAL series yields no channel.
    fn channel_carries_rate_unit_and_dtype() {
        let lal = LalTimeSeries {
            name: "L1:PEM-ACC".to_string(),
            epoch: LigoTimeGps::new(1_000_000_000, 0),
            f0: 0.0,
            delta_t: 1.0 / 256.0,
            sample_units: LalUnit::from_unit(&Unit::parse("m").unwrap()),
            data: array![0.25f32, 0.5],
        };
        let ts = Series::from_lal(&lal).unwrap();
        let channel = ts.channel().unwrap();
        assert_eq!(channel.name(), "L1:PEM-ACC");
        assert_eq!(channel.sample_rate(), Some(256.0));
        assert_eq!(channel.unit(), Some(&Unit::parse("m").unwrap()));
        assert_eq!(channel.dtype(), Some(DType::Float32));

        let unnamed = LalTimeSeries { name: String::new(), ..lal };
        assert!(Series::from_lal(&unnamed).unwrap().channel().is_none());
    }

    #[test]
    fn fractional_and_scaled_units_map_exactly() {
        let unit = Unit::parse("strain / Hz^(1/2)").unwrap();
        let lal = LalUnit::from_unit(&unit);
        assert_eq!(lal.unit_numerator[2], 1);
        assert_eq!(lal.unit_denominator_minus_one[2], 1);
        assert_eq!(lal.to_unit(), unit);

        let ms = Unit::parse("ms").unwrap();
        let lal = LalUnit::from_unit(&ms);
        assert_eq!(lal.power_of_ten, -3);
        assert_eq!(lal.to_unit(), ms);
    }

    #[test]
    fn unrepresentable_units_fall_back_to_dimensionless() {
        let mole = Unit::base(BaseUnit::Mole);
        assert_eq!(LalUnit::from_unit(&mole), LalUnit::dimensionless());
        let odd = Unit::from_parts(2.5, [0.0; N_BASE]);
        assert_eq!(LalUnit::from_unit(&odd), LalUnit::dimensionless());
    }

    #[test]
    fn element_types_without_lal_vectors_are_rejected() {
        let flags = TimeSeriesBuilder::new(array![true, false]).build().unwrap();
        assert_eq!(
            flags.to_lal().unwrap_err(),
            SeriesError::UnsupportedDType { dtype: DType::Bool, target: "LAL" }
        );
        let complex = TimeSeriesBuilder::new(array![Complex64::new(1.0, 1.0)]).build().unwrap();
        assert_eq!(complex.to_lal().unwrap().lal_type().unwrap(), LalType::Complex16);
    }

    #[test]
    fn explicit_times_cannot_be_converted() {
        let ts = TimeSeriesBuilder::new(array![1.0, 2.0]).times(array![0.0, 3.0]).build().unwrap();
        assert_eq!(ts.to_lal().unwrap_err(), SeriesError::IrregularIndex { operation: "to_lal" });
    }
}
