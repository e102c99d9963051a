//! Host list parsing for service address values

use std::fmt;

use tracing::debug;

/// A single `ip:port` endpoint of a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceHost {
    pub ip: String,
    pub port: u16,
}

impl ServiceHost {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            port,
        }
    }

    /// The `host:port` identity used by weight nodes.
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

impl fmt::Display for ServiceHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Parse a raw address value such as `"10.0.0.1:8080,10.0.0.2:8080"`.
///
/// Entries may be separated by `,` or `;`. Empty and malformed entries are
/// skipped, so an absent value yields an empty list.
pub fn parse_host_list(raw: Option<&str>) -> Vec<ServiceHost> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.split([',', ';'])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let host = parse_host(entry);
            if host.is_none() {
                debug!(entry, "Skipping malformed host entry");
            }
            host
        })
        .collect()
}

fn parse_host(entry: &str) -> Option<ServiceHost> {
    let (ip, port) = entry.rsplit_once(':')?;
    let ip = ip.trim();
    if ip.is_empty() {
        return None;
    }
    let port = port.trim().parse::<u16>().ok()?;
    Some(ServiceHost::new(ip, port))
}
