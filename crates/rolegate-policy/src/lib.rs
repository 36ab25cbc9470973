//! Rolegate authorization policy
//!
//! Maps the role carried by a verified token to the resource servers the
//! caller may reach. The table is fixed:
//!
//! | Role               | Servers                                      |
//! |--------------------|----------------------------------------------|
//! | `Manager`          | hr_management, project_management, crm       |
//! | `AssistantManager` | hr_management, project_management            |
//! | anything else      | hr_management                                |
//!
//! The same table is used by the client (to decide which servers to contact)
//! and by each server's gateway (to refuse roles that should not be there).

pub mod catalog;
pub mod decision;
pub mod role;

pub use catalog::{ServerCatalog, capability_summary};
pub use decision::{AuthorizationDecision, Capabilities};
pub use role::Role;

use rolegate_core::{ServerId, ServersConfig};

/// Resolves role claims into authorization decisions.
#[derive(Debug, Clone, Default)]
pub struct RoleAuthorizationPolicy {
    catalog: ServerCatalog,
}

impl RoleAuthorizationPolicy {
    pub fn new(catalog: ServerCatalog) -> Self {
        Self { catalog }
    }

    pub fn from_config(servers: &ServersConfig) -> Self {
        Self::new(ServerCatalog::from_config(servers))
    }

    pub fn catalog(&self) -> &ServerCatalog {
        &self.catalog
    }

    /// Resolve a raw role claim. Total and deterministic.
    pub fn resolve(&self, role: &str) -> AuthorizationDecision {
        let resolved = Role::parse(role);
        if Role::recognize(role).is_none() {
            tracing::debug!(claimed = %role, "Unrecognised role; using least-privileged role");
        }
        self.decide(resolved)
    }

    /// Decision for an already parsed role.
    pub fn decide(&self, role: Role) -> AuthorizationDecision {
        let allowed = role.permitted_servers();
        let permitted = allowed
            .iter()
            .filter_map(|id| self.catalog.descriptor(*id).cloned())
            .collect();
        let denied = ServerId::ALL
            .iter()
            .copied()
            .filter(|id| !allowed.contains(id))
            .collect();

        AuthorizationDecision {
            role,
            permitted,
            denied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(decision: &AuthorizationDecision) -> Vec<ServerId> {
        decision.permitted_ids()
    }

    #[test]
    fn test_manager_gets_everything() {
        let decision = RoleAuthorizationPolicy::default().resolve("Manager");
        assert_eq!(
            ids(&decision),
            vec![
                ServerId::HrManagement,
                ServerId::ProjectManagement,
                ServerId::Crm
            ]
        );
        assert!(decision.denied.is_empty());
    }

    #[test]
    fn test_assistant_manager_denied_crm() {
        let decision = RoleAuthorizationPolicy::default().resolve("AssistantManager");
        assert_eq!(
            ids(&decision),
            vec![ServerId::HrManagement, ServerId::ProjectManagement]
        );
        assert_eq!(decision.denied, vec![ServerId::Crm]);
        assert!(!decision.permits(ServerId::Crm));
    }

    #[test]
    fn test_unrecognised_role_is_least_privileged() {
        let policy = RoleAuthorizationPolicy::default();
        for role in ["Officer", "", "manager", "Intern"] {
            let decision = policy.resolve(role);
            assert_eq!(decision.role, Role::Officer);
            assert_eq!(ids(&decision), vec![ServerId::HrManagement]);
            assert_eq!(
                decision.denied,
                vec![ServerId::ProjectManagement, ServerId::Crm]
            );
        }
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let policy = RoleAuthorizationPolicy::default();
        for role in ["Manager", "AssistantManager", "Officer", "x"] {
            assert_eq!(policy.resolve(role), policy.resolve(role));
        }
    }

    #[test]
    fn test_permitted_and_denied_partition_all_servers() {
        let policy = RoleAuthorizationPolicy::default();
        for role in Role::ALL {
            let decision = policy.decide(role);
            let mut all = decision.permitted_ids();
            all.extend(&decision.denied);
            all.sort();
            assert_eq!(all, ServerId::ALL.to_vec());
        }
    }

    #[test]
    fn test_capabilities_and_description() {
        let decision = RoleAuthorizationPolicy::default().resolve("AssistantManager");
        let caps = decision.capabilities();
        assert_eq!(
            caps.permitted[0],
            "HR Management System: Employee records, leave requests, performance reviews"
        );
        assert_eq!(
            caps.denied,
            vec!["CRM System: Customer profiles, interactions, sales opportunities"]
        );

        let text = decision.describe();
        assert!(text.starts_with("Role: AssistantManager"));
        assert!(text.contains("http://localhost:8002/mcp"));
        assert!(text.contains("CRM System"));
    }
}
