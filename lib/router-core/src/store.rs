//! Configuration store: the desired listeners keyed by socket

use crate::listener::{ListenAddress, Listener};
use crate::{CoreError, Result, ValidationError};
use router_api::{ListenerRequest, Mode};
use std::collections::BTreeMap;
use tracing::{debug, error, warn};

/// Outcome of a request that did not hit a fatal conflict
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    /// The request was dropped; the store is unchanged
    Rejected(Vec<ValidationError>),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }

    /// Human-readable messages, in the order the checks ran
    pub fn errors(&self) -> Vec<String> {
        match self {
            Admission::Accepted => Vec::new(),
            Admission::Rejected(errors) => errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// ConfigurationStore owns every listener of one configuration build.
///
/// There is no removal: recomputing the desired state means starting from a
/// fresh store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigurationStore {
    listeners: BTreeMap<ListenAddress, Listener>,
}

impl ConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and merge a request.
    ///
    /// Validation failures come back as `Ok(Admission::Rejected(..))`. A second
    /// tcp listener on an occupied socket is returned as
    /// [`CoreError::DuplicateTcpListener`] and must abort the build.
    pub fn add_listener(&mut self, request: ListenerRequest) -> Result<Admission> {
        let address = ListenAddress::new(request.listen_ip.clone(), request.listen_port);

        let mode = match self.validate(&address, &request) {
            Ok(mode) => mode,
            Err(errors) => {
                warn!("Rejected listener {}", request.name);
                for message in &errors {
                    warn!("  {}", message);
                }
                return Ok(Admission::Rejected(errors));
            }
        };

        if self.listeners.contains_key(&address) && mode == Mode::Tcp {
            error!(
                "A listener for another TCP service is already configured on {}, rejecting {}",
                address, request.name
            );
            return Err(CoreError::DuplicateTcpListener {
                ip: address.ip,
                port: address.port,
            });
        }

        let listener = self.listeners.entry(address).or_insert_with_key(|address| {
            debug!("Created {} listener {} on {}", mode, request.name, address);
            Listener::new(request.name.clone(), mode, request.uses_ssl())
        });

        if let Some(certificate) = request.certificate() {
            listener.add_certificate(certificate);
        }

        debug!(
            "Routing {} on listener {} to backend {}",
            if mode == Mode::Tcp { "*" } else { request.hostname.as_str() },
            listener.name,
            request.backend.name
        );
        listener.set_backend(&request.hostname, request.backend);

        Ok(Admission::Accepted)
    }

    /// Run every check and collect all failures
    fn validate(
        &self,
        address: &ListenAddress,
        request: &ListenerRequest,
    ) -> std::result::Result<Mode, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let mode = match request.mode.parse::<Mode>() {
            Ok(mode) => Some(mode),
            Err(_) => {
                errors.push(ValidationError::InvalidMode(request.mode.clone()));
                None
            }
        };

        if let Some(existing) = self.listeners.get(address) {
            if mode != Some(existing.mode) {
                errors.push(ValidationError::ModeMismatch);
            }

            match (existing.use_ssl, request.uses_ssl()) {
                (false, true) => errors.push(ValidationError::SslCertificateUnexpected),
                (true, false) => errors.push(ValidationError::SslCertificateMissing),
                _ => {}
            }
        }

        match mode {
            Some(mode) if errors.is_empty() => Ok(mode),
            _ => Err(errors),
        }
    }

    pub fn get(&self, ip: &str, port: u16) -> Option<&Listener> {
        self.listeners.get(&ListenAddress::new(ip, port))
    }

    /// Listeners in (IP, port) order
    pub fn listeners(&self) -> impl Iterator<Item = (&ListenAddress, &Listener)> {
        self.listeners.iter()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
