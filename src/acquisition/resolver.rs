//! Default remote-server ordering.
//!
//! Hosts named in `NDSSERVER` always come first. The built-in table maps
//! each site to its local server plus a central fallback server; for
//! recent data the site server is preferred, for data older than two weeks
//! the central server (which holds the long-term archive) is tried first.
use crate::acquisition::config::NdsHost;
use crate::acquisition::sources::HostResolver;
use crate::time::{TimeInput, to_gps};

pub const DEFAULT_NDS_PORT: u16 = 31200;

/// Age beyond which the central archive server is preferred.
pub const RECENT_DATA_WINDOW: f64 = 14.0 * 86400.0;

/// Built-in server for a site code; `None` selects the central server.
pub fn default_host(ifo: Option<&str>) -> Option<NdsHost> {
    let host = match ifo {
        None | Some("V1") => "nds.ligo.caltech.edu",
        Some("H1") | Some("H0") => "nds.ligo-wa.caltech.edu",
        Some("L1") | Some("L0") => "nds.ligo-la.caltech.edu",
        Some("C1") | Some("C0") => "nds40.ligo.caltech.edu",
        Some(_) => return None,
    };
    Some(NdsHost::new(host, Some(DEFAULT_NDS_PORT)))
}

/// [`HostResolver`] over `NDSSERVER` plus the built-in table.
#[derive(Debug, Clone, Default)]
pub struct DefaultHostResolver {
    nds_servers: Vec<NdsHost>,
    now: Option<f64>,
}

impl DefaultHostResolver {
    pub fn new(nds_servers: Vec<NdsHost>) -> DefaultHostResolver {
        DefaultHostResolver { nds_servers, now: None }
    }

    /// Pin "now" (GPS seconds) instead of reading the clock.
    pub fn with_now(mut self, now: f64) -> DefaultHostResolver {
        self.now = Some(now);
        self
    }

    fn now(&self) -> f64 {
        self.now.or_else(|| to_gps(TimeInput::Text("now".into())).ok()).unwrap_or(f64::INFINITY)
    }
}

impl HostResolver for DefaultHostResolver {
    fn host_resolution_order(&self, ifo: Option<&str>, epoch: f64) -> Vec<NdsHost> {
        let mut hosts = self.nds_servers.clone();
        let sites = if self.now() - epoch > RECENT_DATA_WINDOW { [None, ifo] } else { [ifo, None] };
        for site in sites {
            match default_host(site) {
                Some(host) if !hosts.contains(&host) => hosts.push(host),
                Some(_) => {}
                None => tracing::warn!(ifo = site.unwrap_or("<none>"), "no default data server for site"),
            }
        }
        tracing::debug!(count = hosts.len(), "resolved data server order");
        hosts
    }
}
