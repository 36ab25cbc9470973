//! Job roles and their server entitlements.

use rolegate_core::ServerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of roles the policy understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Manager,
    AssistantManager,
    /// Least-privileged role. Every unrecognised role string lands here.
    Officer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Manager, Role::AssistantManager, Role::Officer];

    /// Parse a role claim. Never fails: the match is exact and
    /// case-sensitive, and anything that is not `Manager` or
    /// `AssistantManager` (including `""` and `"Officer"`) is an officer.
    pub fn parse(role: &str) -> Role {
        Self::recognize(role).unwrap_or(Role::Officer)
    }

    /// Exact match against the role names, without the default arm.
    pub fn recognize(role: &str) -> Option<Role> {
        match role {
            "Manager" => Some(Role::Manager),
            "AssistantManager" => Some(Role::AssistantManager),
            "Officer" => Some(Role::Officer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "Manager",
            Role::AssistantManager => "AssistantManager",
            Role::Officer => "Officer",
        }
    }

    /// Servers this role may reach, in canonical order.
    pub fn permitted_servers(&self) -> &'static [ServerId] {
        match self {
            Role::Manager => &[
                ServerId::HrManagement,
                ServerId::ProjectManagement,
                ServerId::Crm,
            ],
            Role::AssistantManager => &[ServerId::HrManagement, ServerId::ProjectManagement],
            Role::Officer => &[ServerId::HrManagement],
        }
    }

    pub fn permits(&self, server: ServerId) -> bool {
        self.permitted_servers().contains(&server)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(Role::parse("Manager"), Role::Manager);
        assert_eq!(Role::parse("AssistantManager"), Role::AssistantManager);
        assert_eq!(Role::parse("Officer"), Role::Officer);
    }

    #[test]
    fn test_unknown_roles_fall_to_officer() {
        for role in ["", "manager", "MANAGER", " Manager", "Manager ", "Admin", "root"] {
            assert_eq!(Role::parse(role), Role::Officer, "role {:?}", role);
            assert_eq!(Role::recognize(role), None);
        }
    }

    #[test]
    fn test_every_role_has_servers() {
        for role in Role::ALL {
            let servers = role.permitted_servers();
            assert!(!servers.is_empty());
            assert!(servers.contains(&ServerId::HrManagement));
        }
    }

    #[test]
    fn test_permits() {
        assert!(Role::Manager.permits(ServerId::Crm));
        assert!(!Role::AssistantManager.permits(ServerId::Crm));
        assert!(!Role::Officer.permits(ServerId::ProjectManagement));
    }
}
