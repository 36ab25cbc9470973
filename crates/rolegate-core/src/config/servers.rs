//! Resource server configuration.
//!
//! Every server is an independent token audience. The client reaches a
//! server at `address`; the server itself binds `listen`.

use crate::{ResourceServerDescriptor, ServerId, TransportKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration of one resource server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// URL of the JSON-RPC endpoint.
    pub address: String,

    /// Audience a token must carry to be accepted by this server.
    pub audience: String,

    /// Transport used to reach the server.
    #[serde(default)]
    pub transport: TransportKind,

    /// Socket address the server binds when started with `rolegate serve`.
    pub listen: String,
}

impl ServerConfig {
    /// Default deployment: localhost, ports 8001-8003.
    pub fn default_for(id: ServerId) -> Self {
        let port = id.default_port();
        Self {
            address: format!("http://localhost:{}/mcp", port),
            audience: format!("rolegate:{}", id.as_str()),
            transport: TransportKind::default(),
            listen: format!("127.0.0.1:{}", port),
        }
    }

    /// Descriptor handed to the policy and the client.
    pub fn descriptor(&self, id: ServerId) -> ResourceServerDescriptor {
        ResourceServerDescriptor {
            id,
            address: self.address.clone(),
            transport: self.transport,
        }
    }
}

/// Per-server overrides. Servers not listed fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServersConfig {
    entries: BTreeMap<ServerId, ServerConfig>,
}

impl ServersConfig {
    /// Configuration for `id`, defaulted when absent.
    pub fn get(&self, id: ServerId) -> ServerConfig {
        self.entries
            .get(&id)
            .cloned()
            .unwrap_or_else(|| ServerConfig::default_for(id))
    }

    /// Override one server.
    pub fn insert(&mut self, id: ServerId, config: ServerConfig) {
        self.entries.insert(id, config);
    }

    /// Descriptors for every known server, in canonical order.
    pub fn descriptors(&self) -> Vec<ResourceServerDescriptor> {
        ServerId::ALL
            .iter()
            .map(|id| self.get(*id).descriptor(*id))
            .collect()
    }
}
