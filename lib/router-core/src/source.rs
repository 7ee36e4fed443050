//! Listener sources feeding the configuration store

use crate::store::Admission;
use crate::{ConfigurationStore, Result};
use async_trait::async_trait;
use router_api::{ListenerRequest, NodeAddresses};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// A supplier of desired listeners, such as a cluster discovery client
#[async_trait]
pub trait ListenerSource: Send + Sync {
    /// Every listener that should be rendered in this cycle
    async fn listener_requests(&self) -> Result<Vec<ListenerRequest>>;

    /// Node name to internal IP mapping, when the source knows it
    async fn node_addresses(&self) -> Result<NodeAddresses> {
        Ok(NodeAddresses::new())
    }
}

/// Document layout accepted by [`StaticListenerSource`]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StaticListenerConfig {
    #[serde(default)]
    pub listeners: Vec<ListenerRequest>,

    #[serde(default)]
    pub nodes: NodeAddresses,
}

/// StaticListenerSource serves listeners declared in a YAML document
pub struct StaticListenerSource {
    config: StaticListenerConfig,
}

impl StaticListenerSource {
    pub fn new(config: StaticListenerConfig) -> Self {
        Self { config }
    }

    /// Parse a YAML document
    pub fn from_yaml(document: &str) -> Result<Self> {
        let config: StaticListenerConfig = serde_yaml::from_str(document)?;
        debug!("Loaded {} static listeners", config.listeners.len());
        Ok(Self::new(config))
    }

    /// Read and parse a YAML file
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = tokio::fs::read_to_string(path).await?;
        debug!("Read listener file {}", path.display());
        Self::from_yaml(&document)
    }
}

#[async_trait]
impl ListenerSource for StaticListenerSource {
    async fn listener_requests(&self) -> Result<Vec<ListenerRequest>> {
        Ok(self.config.listeners.clone())
    }

    async fn node_addresses(&self) -> Result<NodeAddresses> {
        Ok(self.config.nodes.clone())
    }
}

/// A request that was dropped during a build
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedListener {
    pub name: String,
    pub errors: Vec<String>,
}

/// Summary of one configuration build
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedListener>,
}

/// Apply every request from `source` to a fresh store, in the order given.
///
/// Rejected requests are recorded in the report and skipped. A duplicate tcp
/// listener aborts the whole build.
pub async fn build_configuration(
    source: &dyn ListenerSource,
) -> Result<(ConfigurationStore, BuildReport)> {
    let requests = source.listener_requests().await?;
    let mut store = ConfigurationStore::new();
    let mut report = BuildReport::default();

    for request in requests {
        let name = request.name.clone();
        match store.add_listener(request)? {
            Admission::Accepted => report.accepted += 1,
            rejected @ Admission::Rejected(_) => report.rejected.push(RejectedListener {
                name,
                errors: rejected.errors(),
            }),
        }
    }

    info!(
        "Built configuration with {} listeners ({} requests accepted, {} rejected)",
        store.len(),
        report.accepted,
        report.rejected.len()
    );
    Ok((store, report))
}
