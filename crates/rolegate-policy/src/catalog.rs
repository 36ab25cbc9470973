//! Where each resource server lives.

use rolegate_core::{ResourceServerDescriptor, ServerId, ServersConfig};

/// Descriptor for every known server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCatalog {
    servers: Vec<ResourceServerDescriptor>,
}

impl ServerCatalog {
    /// Catalog built from configuration; servers missing from the config use
    /// their default local addresses.
    pub fn from_config(config: &ServersConfig) -> Self {
        Self {
            servers: config.descriptors(),
        }
    }

    /// Look up the descriptor of `id`.
    pub fn descriptor(&self, id: ServerId) -> Option<&ResourceServerDescriptor> {
        self.servers.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceServerDescriptor> {
        self.servers.iter()
    }
}

impl Default for ServerCatalog {
    fn default() -> Self {
        Self::from_config(&ServersConfig::default())
    }
}

/// One-line description of what a server holds.
pub fn capability_summary(id: ServerId) -> &'static str {
    match id {
        ServerId::HrManagement => "Employee records, leave requests, performance reviews",
        ServerId::ProjectManagement => "Task tracking, milestones, team management",
        ServerId::Crm => "Customer profiles, interactions, sales opportunities",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_core::{ServerConfig, TransportKind};

    #[test]
    fn test_default_addresses() {
        let catalog = ServerCatalog::default();
        let addresses: Vec<_> = catalog.iter().map(|d| d.address.as_str()).collect();
        assert_eq!(
            addresses,
            vec![
                "http://localhost:8001/mcp",
                "http://localhost:8002/mcp",
                "http://localhost:8003/mcp",
            ]
        );
        assert!(catalog.iter().all(|d| d.transport == TransportKind::Http));
    }

    #[test]
    fn test_config_override() {
        let mut servers = ServersConfig::default();
        let mut crm = ServerConfig::default_for(ServerId::Crm);
        crm.address = "http://crm.internal:9000/mcp".into();
        servers.insert(ServerId::Crm, crm);

        let catalog = ServerCatalog::from_config(&servers);
        assert_eq!(
            catalog.descriptor(ServerId::Crm).unwrap().address,
            "http://crm.internal:9000/mcp"
        );
        assert_eq!(
            catalog.descriptor(ServerId::HrManagement).unwrap().address,
            "http://localhost:8001/mcp"
        );
    }
}
