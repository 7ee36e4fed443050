//! Per-socket listener aggregate

use router_api::{Backend, Mode};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Hostname key under which a tcp listener stores its only backend
pub const TCP_HOSTNAME: &str = "_";

/// The socket a listener binds to. Orders by IP, then port.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenAddress {
    pub ip: String,
    pub port: u16,
}

impl ListenAddress {
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self { ip: ip.into(), port }
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// Listener holds everything merged onto one (IP, port)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listener {
    pub name: String,
    pub mode: Mode,
    pub use_ssl: bool,
    ssl_certificates: BTreeSet<String>,
    hostname_backends: BTreeMap<String, Backend>,
}

impl Listener {
    pub fn new(name: impl Into<String>, mode: Mode, use_ssl: bool) -> Self {
        Self {
            name: name.into(),
            mode,
            use_ssl,
            ssl_certificates: BTreeSet::new(),
            hostname_backends: BTreeMap::new(),
        }
    }

    pub(crate) fn add_certificate(&mut self, certificate: &str) {
        self.ssl_certificates.insert(certificate.to_string());
    }

    /// Attach a backend, replacing whatever was routed for this hostname before
    pub(crate) fn set_backend(&mut self, hostname: &str, backend: Backend) {
        let key = match self.mode {
            Mode::Tcp => TCP_HOSTNAME,
            Mode::Http => hostname,
        };
        self.hostname_backends.insert(key.to_string(), backend);
    }

    /// Certificates, sorted and distinct
    pub fn certificates(&self) -> impl Iterator<Item = &str> {
        self.ssl_certificates.iter().map(String::as_str)
    }

    /// Hostname to backend routes, sorted by hostname
    pub fn backends(&self) -> impl Iterator<Item = (&str, &Backend)> {
        self.hostname_backends.iter().map(|(h, b)| (h.as_str(), b))
    }

    pub fn backend_for(&self, hostname: &str) -> Option<&Backend> {
        self.hostname_backends.get(hostname)
    }

    /// The backend a tcp listener forwards everything to
    pub fn default_backend(&self) -> Option<&Backend> {
        self.backend_for(TCP_HOSTNAME)
    }
}
