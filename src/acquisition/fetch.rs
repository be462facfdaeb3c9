//! Remote acquisition with host rotation.
//!
//! Purpose
//! -------
//! Retrieve data for many channels from remote data servers, trying
//! servers in a sensible order until one can deliver everything.
//!
//! Key behaviors
//! -------------
//! - With `connection` set, that connection is used as is. With only `host`
//!   set, one connection is opened and any failure propagates directly.
//! - Otherwise the hosts from [`HostResolver`](super::HostResolver) are
//!   tried for each tape setting (`false` then `true`, unless fixed by
//!   `allow_tape`). A `Runtime`/`Value` failure is logged and the next host
//!   is tried. When every host fails for several channels, each channel is
//!   fetched on its own (with the same host rotation) before moving on to
//!   the next tape setting.
//! - A connected query asks for whole seconds `[floor(start), ceil(end))`
//!   and crops the result back to `[start, end)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The chain is bounded: `|tapes| × (|hosts| + per-channel attempts)`.
//!   Exhaustion yields [`AcquisitionError::Exhausted`].
//! - `Import` and `Fatal` failures are never retried.
//! - Result keys are the channel names as requested, type suffix included.
use crate::acquisition::errors::{AcquisitionError, AcquisitionResult, FailureKind};
use crate::acquisition::options::AcquireOptions;
use crate::acquisition::sources::{DataSources, NdsClient, NdsConnection, NdsRequest};
use crate::detector::Channel;
use crate::time::{TimeInput, to_gps};
use crate::timeseries::{TimeSeries, TimeSeriesDict};
use crate::types::{Element, Series, Time};

/// True for the failure classes a host rotation may recover from.
fn retryable(err: &AcquisitionError) -> bool {
    matches!(err.kind(), FailureKind::Runtime | FailureKind::Value)
}

/// Site code shared by every channel, if there is exactly one.
pub(crate) fn common_ifo(names: &[String]) -> Option<String> {
    let mut ifos = names.iter().map(|name| Channel::new(name).ifo().map(str::to_string));
    let first = ifos.next()??;
    ifos.all(|ifo| ifo.as_deref() == Some(first.as_str())).then_some(first)
}

pub(crate) fn channel_names<S: AsRef<str>>(channels: &[S]) -> AcquisitionResult<Vec<String>> {
    if channels.is_empty() {
        return Err(AcquisitionError::InvalidRequest { reason: "no channels requested".into() });
    }
    Ok(channels.iter().map(|c| c.as_ref().trim().to_string()).collect())
}

impl<A: Element> TimeSeriesDict<A> {
    /// Fetch `channels` over `[start, end)` from remote data servers.
    ///
    /// Errors
    /// ------
    /// - `MissingBackend` when no remote client is configured.
    /// - `Connection` when an explicit `host` cannot be reached.
    /// - `Exhausted` when every host and fallback failed.
    pub fn fetch<S: AsRef<str>>(
        channels: &[S], start: impl Into<TimeInput>, end: impl Into<TimeInput>, opts: &AcquireOptions<A>,
        sources: &DataSources<'_, A>,
    ) -> AcquisitionResult<TimeSeriesDict<A>> {
        let names = channel_names(channels)?;
        fetch_gps(&names, to_gps(start)?, to_gps(end)?, opts, sources)
    }
}

impl<A: Element> Series<A, Time> {
    /// Fetch one channel from remote data servers.
    pub fn fetch(
        channel: &str, start: impl Into<TimeInput>, end: impl Into<TimeInput>, opts: &AcquireOptions<A>,
        sources: &DataSources<'_, A>,
    ) -> AcquisitionResult<TimeSeries<A>> {
        let mut out = TimeSeriesDict::fetch(&[channel], start, end, opts, sources)?;
        out.remove(channel.trim()).ok_or_else(|| AcquisitionError::ChannelMissing { channel: channel.to_string() })
    }
}

pub(crate) fn fetch_gps<A: Element>(
    names: &[String], start: f64, end: f64, opts: &AcquireOptions<A>, sources: &DataSources<'_, A>,
) -> AcquisitionResult<TimeSeriesDict<A>> {
    let nds = sources.nds()?;
    let connection = match (&opts.connection, &opts.host) {
        (Some(connection), _) => connection.clone(),
        (None, Some(host)) => {
            tracing::debug!(host = host.as_str(), port = ?opts.port, "opening new connection");
            nds.auth_connect(host, opts.port)?
        }
        (None, None) => return fetch_any_host(names, start, end, opts, sources),
    };
    fetch_connected(nds, &connection, names, start, end, opts)
}

fn fetch_any_host<A: Element>(
    names: &[String], start: f64, end: f64, opts: &AcquireOptions<A>, sources: &DataSources<'_, A>,
) -> AcquisitionResult<TimeSeriesDict<A>> {
    let ifo = common_ifo(names);
    let hosts = sources.resolver.host_resolution_order(ifo.as_deref(), start);
    let tapes = match opts.allow_tape {
        Some(allow_tape) => vec![allow_tape],
        None => vec![false, true],
    };

    for allow_tape in tapes {
        for host in &hosts {
            let attempt = AcquireOptions {
                host: Some(host.host.clone()),
                port: host.port,
                connection: None,
                allow_tape: Some(allow_tape),
                ..opts.clone()
            };
            match fetch_gps(names, start, end, &attempt, sources) {
                Ok(out) => return Ok(out),
                Err(err) if retryable(&err) => {
                    tracing::warn!(host = %host, allow_tape, error = %err, "remote fetch failed")
                }
                Err(err) => return Err(err),
            }
        }

        if names.len() > 1 {
            tracing::debug!(allow_tape, "cannot fetch all channels together, trying individually");
            let single = AcquireOptions { allow_tape: Some(allow_tape), ..opts.clone() };
            match fetch_each(names, start, end, &single, sources) {
                Ok(out) => return Ok(out),
                Err(err) if retryable(&err) => {
                    tracing::warn!(allow_tape, error = %err, "per-channel fetch failed")
                }
                Err(err) => return Err(err),
            }
        }
    }
    Err(AcquisitionError::Exhausted)
}

fn fetch_each<A: Element>(
    names: &[String], start: f64, end: f64, opts: &AcquireOptions<A>, sources: &DataSources<'_, A>,
) -> AcquisitionResult<TimeSeriesDict<A>> {
    names
        .iter()
        .map(|name| {
            let mut one = fetch_gps(std::slice::from_ref(name), start, end, opts, sources)?;
            let series = one
                .remove(name)
                .ok_or_else(|| AcquisitionError::ChannelMissing { channel: name.clone() })?;
            Ok((name.clone(), series))
        })
        .collect()
}

fn fetch_connected<A: Element>(
    nds: &dyn NdsClient<A>, connection: &NdsConnection, names: &[String], start: f64, end: f64,
    opts: &AcquireOptions<A>,
) -> AcquisitionResult<TimeSeriesDict<A>> {
    let request = NdsRequest {
        channels: names.to_vec(),
        start: start.floor() as i64,
        end: end.ceil() as i64,
        channel_type: opts.channel_type.clone(),
        dtype: opts.dtype,
        pad: opts.pad,
        allow_tape: opts.allow_tape,
        verify: opts.verify,
    };
    tracing::debug!(
        host = connection.host.as_str(),
        channels = names.len(),
        start = request.start,
        end = request.end,
        "querying remote server"
    );
    let mut buffers = nds.fetch(connection, &request)?.into_iter();
    let mut out = TimeSeriesDict::new();
    for name in names {
        let buffer = buffers.next().ok_or_else(|| AcquisitionError::ChannelMissing { channel: name.clone() })?;
        out.insert(name.clone(), Series::from_nds_buffer(buffer)?);
    }
    out.crop(Some(start.into()), Some(end.into()), false)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_site_code_requires_agreement() {
        let same = vec!["H1:A".to_string(), "H1:B,m-trend".to_string()];
        assert_eq!(common_ifo(&same), Some("H1".to_string()));
        let mixed = vec!["H1:A".to_string(), "L1:B".to_string()];
        assert_eq!(common_ifo(&mixed), None);
        let bare = vec!["strain".to_string()];
        assert_eq!(common_ifo(&bare), None);
    }

    #[test]
    fn empty_channel_list_is_rejected() {
        let none: [&str; 0] = [];
        assert!(matches!(channel_names(&none), Err(AcquisitionError::InvalidRequest { .. })));
    }
}
