//! Dynamic source selection: archive, then remote bulk, then remote per
//! channel.
//!
//! Key behaviors
//! -------------
//! - The archive tier runs only when [`AcquisitionConfig`] reports a
//!   datafind server and `host` does not name a remote data server
//!   (prefix `nds`). It uses `allow_tape = false` unless tape is requested.
//!   `Import`, `Runtime` and `Value` failures fall through to remote access.
//! - The remote tier is [`TimeSeriesDict::fetch`]. A `Runtime` failure for
//!   several channels is retried channel by channel through the full
//!   single-channel `get`; a single-channel failure propagates.
//!
//! [`AcquisitionConfig`]: crate::acquisition::AcquisitionConfig
use crate::acquisition::errors::{AcquisitionError, AcquisitionResult, FailureKind};
use crate::acquisition::fetch::{channel_names, fetch_gps};
use crate::acquisition::find::find_gps;
use crate::acquisition::options::AcquireOptions;
use crate::acquisition::sources::DataSources;
use crate::time::{TimeInput, to_gps};
use crate::timeseries::{TimeSeries, TimeSeriesDict};
use crate::types::{Element, Series, Time};

const NDS_HOST_PREFIX: &str = "nds";

impl<A: Element> TimeSeriesDict<A> {
    /// Retrieve `channels` over `[start, end)` from whichever source can
    /// serve them.
    pub fn get<S: AsRef<str>>(
        channels: &[S], start: impl Into<TimeInput>, end: impl Into<TimeInput>, opts: &AcquireOptions<A>,
        sources: &DataSources<'_, A>,
    ) -> AcquisitionResult<TimeSeriesDict<A>> {
        let names = channel_names(channels)?;
        get_gps(&names, to_gps(start)?, to_gps(end)?, opts, sources)
    }
}

impl<A: Element> Series<A, Time> {
    /// Retrieve one channel from whichever source can serve it.
    pub fn get(
        channel: &str, start: impl Into<TimeInput>, end: impl Into<TimeInput>, opts: &AcquireOptions<A>,
        sources: &DataSources<'_, A>,
    ) -> AcquisitionResult<TimeSeries<A>> {
        let mut out = TimeSeriesDict::get(&[channel], start, end, opts, sources)?;
        out.remove(channel.trim()).ok_or_else(|| AcquisitionError::ChannelMissing { channel: channel.to_string() })
    }
}

fn get_gps<A: Element>(
    names: &[String], start: f64, end: f64, opts: &AcquireOptions<A>, sources: &DataSources<'_, A>,
) -> AcquisitionResult<TimeSeriesDict<A>> {
    let remote_only = opts.host.as_deref().is_some_and(|host| host.starts_with(NDS_HOST_PREFIX));
    if sources.config.has_datafind() && !remote_only {
        tracing::debug!("attempting to access data from frames");
        match find_gps(names, start, end, opts, opts.allow_tape.unwrap_or(false), sources) {
            Ok(out) => return Ok(out),
            Err(err) if matches!(err.kind(), FailureKind::Import | FailureKind::Runtime | FailureKind::Value) => {
                tracing::debug!(error = %err, "failed to access data from frames, trying remote servers");
            }
            Err(err) => return Err(err),
        }
    }

    match fetch_gps(names, start, end, opts, sources) {
        Err(err) if err.kind() == FailureKind::Runtime && names.len() > 1 => {
            tracing::debug!(error = %err, "failed to access data for all channels as a group, trying individually");
            names
                .iter()
                .map(|name| {
                    let mut one = get_gps(std::slice::from_ref(name), start, end, opts, sources)?;
                    let series = one
                        .remove(name)
                        .ok_or_else(|| AcquisitionError::ChannelMissing { channel: name.clone() })?;
                    Ok((name.clone(), series))
                })
                .collect()
        }
        result => result,
    }
}
