//! Local archive acquisition: frametype discovery, frame location, bulk read.
//!
//! Channels are grouped by frametype (one explicit frametype, or one
//! discovered per channel). Each group resolves its observatory code from
//! the channels' site codes, locates frame files for `[start, end)`, reads
//! them in one call, and maps the reader's bare channel names back to the
//! names the caller asked for. Groups are independent; the first failing
//! group aborts the call.
use crate::acquisition::errors::{AcquisitionError, AcquisitionResult};
use crate::acquisition::fetch::channel_names;
use crate::acquisition::options::AcquireOptions;
use crate::acquisition::sources::{DataSources, ReadRequest};
use crate::detector::Channel;
use crate::time::{TimeInput, to_gps};
use crate::timeseries::{TimeSeries, TimeSeriesDict};
use crate::types::{AppendOptions, Element, Series, Time};
use indexmap::IndexMap;

const FRAME_FORMAT: &str = "gwf";
const URL_TYPE: &str = "file";

/// Sorted, de-duplicated observatory letters, e.g. `"HL"` for H1 and L1.
pub(crate) fn observatory_code(keys: &[String]) -> AcquisitionResult<String> {
    let mut letters = keys
        .iter()
        .map(|key| Channel::new(key).observatory())
        .collect::<Option<Vec<char>>>()
        .ok_or_else(|| AcquisitionError::UnparseableObservatory { channels: keys.to_vec() })?;
    letters.sort_unstable();
    letters.dedup();
    Ok(letters.into_iter().collect())
}

impl<A: Element> TimeSeriesDict<A> {
    /// Find and read `channels` from the local frame archive.
    ///
    /// `allow_tape` defaults to `true` here.
    pub fn find<S: AsRef<str>>(
        channels: &[S], start: impl Into<TimeInput>, end: impl Into<TimeInput>, opts: &AcquireOptions<A>,
        sources: &DataSources<'_, A>,
    ) -> AcquisitionResult<TimeSeriesDict<A>> {
        let names = channel_names(channels)?;
        let allow_tape = opts.allow_tape.unwrap_or(true);
        find_gps(&names, to_gps(start)?, to_gps(end)?, opts, allow_tape, sources)
    }
}

impl<A: Element> Series<A, Time> {
    /// Find and read one channel from the local frame archive.
    pub fn find(
        channel: &str, start: impl Into<TimeInput>, end: impl Into<TimeInput>, opts: &AcquireOptions<A>,
        sources: &DataSources<'_, A>,
    ) -> AcquisitionResult<TimeSeries<A>> {
        let mut out = TimeSeriesDict::find(&[channel], start, end, opts, sources)?;
        out.remove(channel.trim()).ok_or_else(|| AcquisitionError::ChannelMissing { channel: channel.to_string() })
    }
}

pub(crate) fn find_gps<A: Element>(
    names: &[String], start: f64, end: f64, opts: &AcquireOptions<A>, allow_tape: bool,
    sources: &DataSources<'_, A>,
) -> AcquisitionResult<TimeSeriesDict<A>> {
    let discovery = sources.discovery()?;
    let reader = sources.reader()?;

    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    match &opts.frametype {
        Some(frametype) => {
            groups.insert(frametype.clone(), names.to_vec());
        }
        None => {
            for name in names {
                let frametype =
                    discovery.find_best_frametype(name, start, end, opts.frametype_match.as_ref(), allow_tape)?;
                groups.entry(frametype).or_default().push(name.clone());
            }
            tracing::debug!(frametypes = ?groups.keys().collect::<Vec<_>>(), "resolved frametypes");
        }
    }

    let request = ReadRequest {
        start,
        end,
        pad: opts.pad,
        dtype: opts.dtype,
        nproc: opts.nproc,
        format: FRAME_FORMAT.to_string(),
    };
    let mut out = TimeSeriesDict::new();
    for (frametype, keys) in &groups {
        let bare: Vec<String> = keys.iter().map(|key| Channel::new(key).name().to_string()).collect();
        let observatory = match &opts.observatory {
            Some(observatory) => observatory.clone(),
            None => observatory_code(keys)?,
        };

        let index = discovery.connect()?;
        let urls = index.find_frame_urls(&observatory, frametype, start, end, URL_TYPE)?;
        if urls.is_empty() {
            return Err(AcquisitionError::NoFrameFiles {
                observatory,
                frametype: frametype.clone(),
                start,
                end,
            });
        }
        tracing::debug!(frametype = frametype.as_str(), files = urls.len(), "reading frames");

        let data = reader.read(&urls, &bare, &request)?;
        let remapped = keys
            .iter()
            .zip(&bare)
            .map(|(key, name)| {
                data.series(name)
                    .cloned()
                    .map(|series| (key.clone(), series))
                    .ok_or_else(|| AcquisitionError::ChannelMissing { channel: name.clone() })
            })
            .collect::<AcquisitionResult<TimeSeriesDict<A>>>()?;
        out.append(&remapped, false, &AppendOptions::default())?;
    }
    Ok(out)
}
