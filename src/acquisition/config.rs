//! Environment-level acquisition settings.
//!
//! Two variables are consulted, once, by [`AcquisitionConfig::from_env`]:
//! - `LIGO_DATAFIND_SERVER`: when set and non-empty, local frame archives
//!   are considered reachable and `get` tries them before remote servers.
//! - `NDSSERVER`: comma-separated `host[:port]` list that is tried before
//!   the built-in default servers.
//!
//! Tests and embedding applications construct the config explicitly instead.
use std::fmt;

pub const DATAFIND_SERVER_ENV: &str = "LIGO_DATAFIND_SERVER";
pub const NDSSERVER_ENV: &str = "NDSSERVER";

/// Remote data server address; `port = None` means the server default.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NdsHost {
    pub host: String,
    pub port: Option<u16>,
}

impl NdsHost {
    pub fn new(host: impl Into<String>, port: Option<u16>) -> NdsHost {
        NdsHost { host: host.into(), port }
    }
}

impl fmt::Display for NdsHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}

/// Parse a `host[:port],host[:port],...` list. Empty items are skipped; an
/// unparseable port is dropped with a warning and the server default used.
pub fn parse_nds_env(value: &str) -> Vec<NdsHost> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.rsplit_once(':') {
            Some((host, port)) => match port.parse::<u16>() {
                Ok(port) => NdsHost::new(host, Some(port)),
                Err(_) => {
                    tracing::warn!(entry = item, "ignoring unparseable port in NDSSERVER");
                    NdsHost::new(host, None)
                }
            },
            None => NdsHost::new(item, None),
        })
        .collect()
}

/// Environment-derived settings for the acquisition layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AcquisitionConfig {
    pub datafind_server: Option<String>,
    pub nds_servers: Vec<NdsHost>,
}

impl AcquisitionConfig {
    /// Read [`DATAFIND_SERVER_ENV`] and [`NDSSERVER_ENV`] from the process
    /// environment.
    pub fn from_env() -> AcquisitionConfig {
        let datafind_server = std::env::var(DATAFIND_SERVER_ENV).ok().filter(|v| !v.trim().is_empty());
        let nds_servers = std::env::var(NDSSERVER_ENV).map(|v| parse_nds_env(&v)).unwrap_or_default();
        tracing::debug!(
            datafind = datafind_server.as_deref().unwrap_or("<unset>"),
            nds_servers = nds_servers.len(),
            "loaded acquisition configuration"
        );
        AcquisitionConfig { datafind_server, nds_servers }
    }

    pub fn with_datafind_server(mut self, server: impl Into<String>) -> AcquisitionConfig {
        self.datafind_server = Some(server.into());
        self
    }

    pub fn with_nds_servers(mut self, servers: Vec<NdsHost>) -> AcquisitionConfig {
        self.nds_servers = servers;
        self
    }

    /// True when local frame archives are configured.
    pub fn has_datafind(&self) -> bool {
        self.datafind_server.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}
