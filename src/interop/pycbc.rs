//! Bridge to PyCBC-style time series.
//!
//! A PyCBC series is a data vector plus `delta_t` and a split GPS epoch.
//! It carries no physical unit: `to_pycbc` drops the unit (logging a
//! warning when it was not dimensionless) and `from_pycbc`
//! yields a dimensionless series. Only floating-point and complex element
//! types are accepted.
use crate::time::LigoTimeGps;
use crate::timeseries::{TimeDomain, TimeSeries, TimeSeriesBuilder};
use crate::types::{DType, Element, Indexed, Series, SeriesError, SeriesResult, Time, Unit};
use ndarray::Array1;

const TARGET: &str = "PyCBC";

fn check_dtype(dtype: DType) -> SeriesResult<()> {
    match dtype {
        DType::Float32 | DType::Float64 | DType::Complex64 | DType::Complex128 => Ok(()),
        _ => Err(SeriesError::UnsupportedDType { dtype, target: TARGET }),
    }
}

/// PyCBC-layout time series.
#[derive(Debug, Clone, PartialEq)]
pub struct PycbcTimeSeries<A> {
    pub data: Array1<A>,
    pub delta_t: f64,
    pub epoch: LigoTimeGps,
}

impl<A: Element> PycbcTimeSeries<A> {
    pub fn sample_rate(&self) -> f64 {
        1.0 / self.delta_t
    }

    /// `[start, end)` in GPS seconds.
    pub fn span(&self) -> (f64, f64) {
        let start = self.epoch.as_f64();
        (start, start + self.delta_t * self.data.len() as f64)
    }
}

impl<A: Element> Series<A, Time> {
    /// Copy into a PyCBC-layout series; the unit is not carried over.
    pub fn to_pycbc(&self) -> SeriesResult<PycbcTimeSeries<A>> {
        check_dtype(A::DTYPE)?;
        if !self.xindex().is_regular() {
            return Err(SeriesError::IrregularIndex { operation: "to_pycbc" });
        }
        let factor = self.xunit().conversion_factor(&Unit::second()).ok_or_else(|| {
            SeriesError::IncompatibleXUnits { left: self.xunit().to_string(), right: Unit::second().to_string() }
        })?;
        if !self.unit().is_dimensionless() {
            tracing::warn!(unit = %self.unit(), "dropping unit on conversion to PyCBC");
        }
        Ok(PycbcTimeSeries {
            data: self.value().clone(),
            delta_t: self.dt() * factor,
            epoch: LigoTimeGps::from_f64(self.t0() * factor)?,
        })
    }

    pub fn from_pycbc(pycbc: &PycbcTimeSeries<A>) -> SeriesResult<TimeSeries<A>> {
        check_dtype(A::DTYPE)?;
        TimeSeriesBuilder::new(pycbc.data.clone()).epoch(pycbc.epoch).dt(pycbc.delta_t).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Log sink shared between the subscriber and the assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    // Purpose
    // -------
    // A dimensionless series round-trips exactly; a dimensioned one loses
    // only its unit.
    fn round_trip_keeps_values_step_and_epoch() {
        let ts = TimeSeriesBuilder::new(array![0.5f32, 1.5, -2.0])
            .t0(1_000_000_000.25)
            .dt(0.5)
            .build()
            .unwrap();
        let pycbc = ts.to_pycbc().unwrap();
        assert_eq!(pycbc.sample_rate(), 2.0);
        assert_eq!(pycbc.span(), (1_000_000_000.25, 1_000_000_001.75));

        let back = Series::from_pycbc(&pycbc).unwrap();
        assert_eq!(back.value(), ts.value());
        assert_eq!(back.t0(), ts.t0());
        assert_eq!(back.dt(), ts.dt());
        assert!(back.unit().is_dimensionless());

        let metres = ts.with_unit(Unit::parse("m").unwrap());
        assert!(Series::from_pycbc(&metres.to_pycbc().unwrap()).unwrap().unit().is_dimensionless());
    }

    #[test]
    fn integer_series_are_rejected() {
        let ts = TimeSeriesBuilder::new(array![1i32, 2]).build().unwrap();
        assert_eq!(
            ts.to_pycbc().unwrap_err(),
            SeriesError::UnsupportedDType { dtype: DType::Int32, target: "PyCBC" }
        );
    }

    #[test]
    // Purpose
    // -------
    // Losing a physical unit on conversion is reported at warning level.
    //
    // Given
    // -----
    // - A series in metres, converted with a capturing subscriber installed.
    //
    // Expect
    // ------
    // - The conversion succeeds and one WARN line names the dropped unit.
    // - A dimensionless series converts without any warning.
    fn dropped_unit_is_warned() {
        let metres = TimeSeriesBuilder::new(array![1.0, 2.0]).unit(Unit::parse("m").unwrap()).build().unwrap();
        let logs = CapturedLogs::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt().with_writer(move || sink.clone()).with_ansi(false).finish();
        tracing::subscriber::with_default(subscriber, || metres.to_pycbc()).unwrap();
        let text = logs.text();
        assert!(text.contains("WARN"), "{text}");
        assert!(text.contains("dropping unit on conversion to PyCBC"), "{text}");

        let plain = TimeSeriesBuilder::new(array![1.0, 2.0]).build().unwrap();
        let quiet = CapturedLogs::default();
        let sink = quiet.clone();
        let subscriber = tracing_subscriber::fmt().with_writer(move || sink.clone()).with_ansi(false).finish();
        tracing::subscriber::with_default(subscriber, || plain.to_pycbc()).unwrap();
        assert!(quiet.text().is_empty());
    }
}
