use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping of cluster node name to its internal IP address
pub type NodeAddresses = BTreeMap<String, String>;

/// A single endpoint inside a backend pool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendServer {
    /// Server name, used as the sort key when rendering
    pub name: String,
    pub ip: String,
    pub port: u16,
}

impl BackendServer {
    pub fn new(name: impl Into<String>, ip: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
            port,
        }
    }
}

/// Backend represents a named pool of servers and the policy used to reach them
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backend {
    /// Name of the backend section. Expected to be unique across listeners.
    pub name: String,

    /// Load-balancing algorithm: roundrobin, leastconn, source, ...
    #[serde(default = "default_balance_method")]
    pub balance_method: String,

    /// Connect to the servers over TLS
    #[serde(default)]
    pub use_ssl: bool,

    /// Verify server certificates when `use_ssl` is set
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// Servers in this pool
    #[serde(default)]
    pub servers: Vec<BackendServer>,
}

impl Backend {
    /// Create an empty backend with the given balance method
    pub fn new(name: impl Into<String>, balance_method: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance_method: balance_method.into(),
            use_ssl: false,
            verify_ssl: true,
            servers: Vec::new(),
        }
    }

    /// Enable TLS towards the servers
    pub fn with_ssl(mut self, verify: bool) -> Self {
        self.use_ssl = true;
        self.verify_ssl = verify;
        self
    }

    /// Append a server to the pool
    pub fn with_server(mut self, server: BackendServer) -> Self {
        self.servers.push(server);
        self
    }

    /// Build a pool with one server per cluster node, all on the same node port.
    ///
    /// Server names are the node names, so rendering order follows the node map.
    pub fn from_nodes(
        name: impl Into<String>,
        balance_method: impl Into<String>,
        nodes: &NodeAddresses,
        node_port: u16,
    ) -> Self {
        let servers = nodes
            .iter()
            .map(|(node, ip)| BackendServer::new(node.clone(), ip.clone(), node_port))
            .collect();

        Self {
            servers,
            ..Self::new(name, balance_method)
        }
    }
}

fn default_balance_method() -> String {
    "roundrobin".to_string()
}

fn default_verify_ssl() -> bool {
    true
}
