use crate::Backend;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Protocol handling for a listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Host-header based virtual routing
    Http,
    /// Single default backend, no header inspection
    Tcp,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Http => "http",
            Mode::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown listener mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Mode::Http),
            "tcp" => Ok(Mode::Tcp),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// A desired route as supplied by the discovery side.
///
/// `mode` is kept as the raw string so that an unsupported value surfaces as a
/// validation error when the request is added, rather than at decode time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerRequest {
    /// Frontend name, used when this request creates the listener
    pub name: String,

    /// Pool that traffic for `hostname` is routed to
    pub backend: Backend,

    /// Virtual host. Ignored for tcp listeners.
    #[serde(default)]
    pub hostname: String,

    pub listen_ip: String,

    pub listen_port: u16,

    /// "http" or "tcp"
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Certificate file to terminate TLS with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_certificate: Option<String>,
}

impl ListenerRequest {
    pub fn new(
        name: impl Into<String>,
        backend: Backend,
        listen_ip: impl Into<String>,
        listen_port: u16,
        mode: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            backend,
            hostname: String::new(),
            listen_ip: listen_ip.into(),
            listen_port,
            mode: mode.into(),
            ssl_certificate: None,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_certificate(mut self, certificate: impl Into<String>) -> Self {
        self.ssl_certificate = Some(certificate.into());
        self
    }

    /// The certificate, treating an empty name as absent
    pub fn certificate(&self) -> Option<&str> {
        self.ssl_certificate.as_deref().filter(|c| !c.is_empty())
    }

    pub fn uses_ssl(&self) -> bool {
        self.certificate().is_some()
    }
}

fn default_mode() -> String {
    Mode::Http.as_str().to_string()
}
