//! Channel — identifier and nominal metadata for one data source.
//!
//! A channel name follows `<IFO>:<SYSTEM>-<SIGNAL>` (for example
//! `H1:GDS-CALIB_STRAIN`), optionally suffixed with `,<type>` to request a
//! particular server-side representation (`,m-trend`, `,s-trend`, `,raw`).
//! The two-character prefix before the colon is the site code; its first
//! letter is the observatory letter used by archive queries.
use crate::types::{DType, Unit};
use std::fmt;
use std::str::FromStr;

/// Named data source plus optional nominal properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Channel {
    name: String,
    channel_type: Option<String>,
    sample_rate: Option<f64>,
    unit: Option<Unit>,
    dtype: Option<DType>,
}

impl Channel {
    /// Parse `text` as `NAME` or `NAME,type`.
    pub fn new(text: &str) -> Channel {
        let text = text.trim();
        let (name, channel_type) = match text.split_once(',') {
            Some((name, kind)) if !kind.trim().is_empty() => (name.trim(), Some(kind.trim().to_string())),
            Some((name, _)) => (name.trim(), None),
            None => (text, None),
        };
        Channel { name: name.to_string(), channel_type, ..Channel::default() }
    }

    pub fn with_sample_rate(mut self, rate: f64) -> Channel {
        self.sample_rate = Some(rate);
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Channel {
        self.unit = Some(unit);
        self
    }

    pub fn with_dtype(mut self, dtype: DType) -> Channel {
        self.dtype = Some(dtype);
        self
    }

    pub fn with_type(mut self, channel_type: impl Into<String>) -> Channel {
        self.channel_type = Some(channel_type.into());
        self
    }

    /// Name without any type suffix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel_type(&self) -> Option<&str> {
        self.channel_type.as_deref()
    }

    /// Nominal sample rate in Hz.
    pub fn sample_rate(&self) -> Option<f64> {
        self.sample_rate
    }

    pub fn unit(&self) -> Option<&Unit> {
        self.unit.as_ref()
    }

    pub fn dtype(&self) -> Option<DType> {
        self.dtype
    }

    /// Site code such as `"H1"`, if the name carries one.
    pub fn ifo(&self) -> Option<&str> {
        let (prefix, _) = self.name.split_once(':')?;
        let mut chars = prefix.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(site), Some(index), None) if site.is_ascii_uppercase() && index.is_ascii_digit() => {
                Some(prefix)
            }
            _ => None,
        }
    }

    /// Observatory letter, e.g. `'H'` for `H1`.
    pub fn observatory(&self) -> Option<char> {
        self.ifo().and_then(|ifo| ifo.chars().next())
    }

    /// Name as sent to a data server: `NAME` or `NAME,type`.
    pub fn ndsname(&self) -> String {
        match &self.channel_type {
            Some(kind) => format!("{},{}", self.name, kind),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ndsname())
    }
}

impl FromStr for Channel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Channel, Self::Err> {
        Ok(Channel::new(s))
    }
}

impl From<&str> for Channel {
    fn from(value: &str) -> Channel {
        Channel::new(value)
    }
}

impl From<String> for Channel {
    fn from(value: String) -> Channel {
        Channel::new(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Names are split into base name, type suffix, and site code.
    fn parses_name_type_and_site() {
        let channel = Channel::new("L1:ISI-GND_STS_ITMY_X_BLRMS_30M_100M.mean,m-trend");
        assert_eq!(channel.name(), "L1:ISI-GND_STS_ITMY_X_BLRMS_30M_100M.mean");
        assert_eq!(channel.channel_type(), Some("m-trend"));
        assert_eq!(channel.ifo(), Some("L1"));
        assert_eq!(channel.observatory(), Some('L'));
        assert_eq!(channel.ndsname(), "L1:ISI-GND_STS_ITMY_X_BLRMS_30M_100M.mean,m-trend");
    }

    #[test]
    fn names_without_site_code_have_no_ifo() {
        assert_eq!(Channel::new("strain").ifo(), None);
        assert_eq!(Channel::new("Hx:FOO").ifo(), None);
        assert_eq!(Channel::new("H1:FOO,").channel_type(), None);
    }

    #[test]
    fn builder_sets_nominal_metadata() {
        let channel = Channel::new("H1:GDS-CALIB_STRAIN")
            .with_sample_rate(16384.0)
            .with_unit(Unit::parse("strain").unwrap())
            .with_dtype(DType::Float64);
        assert_eq!(channel.sample_rate(), Some(16384.0));
        assert_eq!(channel.unit().map(|u| u.to_string()), Some("strain".to_string()));
        assert_eq!(channel.dtype(), Some(DType::Float64));
    }
}
