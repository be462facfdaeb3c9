//! Keyword options shared by `fetch`, `find`, and `get`.
use crate::acquisition::sources::NdsConnection;
use crate::types::DType;
use regex::Regex;

/// Options for the acquisition entry points.
///
/// Every field is optional; unset fields let the source or the fallback
/// chain choose. Fields that only one tier understands are ignored by the
/// others (`frametype` only affects archive reads, `host` only remote
/// queries).
#[derive(Debug, Clone)]
pub struct AcquireOptions<A> {
    /// Remote server to use exclusively.
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Already-open remote connection; takes precedence over `host`.
    pub connection: Option<NdsConnection>,
    /// Fill value for gaps; `None` leaves gap handling to the source.
    pub pad: Option<A>,
    pub dtype: Option<DType>,
    /// Allow slow tape-backed storage. `None` lets each tier decide.
    pub allow_tape: Option<bool>,
    pub channel_type: Option<String>,
    /// Check channel availability before a remote query.
    pub verify: bool,
    pub frametype: Option<String>,
    pub frametype_match: Option<Regex>,
    pub observatory: Option<String>,
    /// Parallel readers for archive reads.
    pub nproc: usize,
}

impl<A> Default for AcquireOptions<A> {
    fn default() -> AcquireOptions<A> {
        AcquireOptions {
            host: None,
            port: None,
            connection: None,
            pad: None,
            dtype: None,
            allow_tape: None,
            channel_type: None,
            verify: false,
            frametype: None,
            frametype_match: None,
            observatory: None,
            nproc: 1,
        }
    }
}

impl<A> AcquireOptions<A> {
    pub fn new() -> AcquireOptions<A> {
        AcquireOptions::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn connection(mut self, connection: NdsConnection) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn pad(mut self, pad: A) -> Self {
        self.pad = Some(pad);
        self
    }

    pub fn dtype(mut self, dtype: DType) -> Self {
        self.dtype = Some(dtype);
        self
    }

    pub fn allow_tape(mut self, allow_tape: bool) -> Self {
        self.allow_tape = Some(allow_tape);
        self
    }

    pub fn channel_type(mut self, channel_type: impl Into<String>) -> Self {
        self.channel_type = Some(channel_type.into());
        self
    }

    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn frametype(mut self, frametype: impl Into<String>) -> Self {
        self.frametype = Some(frametype.into());
        self
    }

    pub fn frametype_match(mut self, pattern: Regex) -> Self {
        self.frametype_match = Some(pattern);
        self
    }

    pub fn observatory(mut self, observatory: impl Into<String>) -> Self {
        self.observatory = Some(observatory.into());
        self
    }

    pub fn nproc(mut self, nproc: usize) -> Self {
        self.nproc = nproc.max(1);
        self
    }
}
