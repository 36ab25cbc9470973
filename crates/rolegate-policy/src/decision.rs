//! The outcome of resolving a role.

use crate::catalog::capability_summary;
use crate::role::Role;
use rolegate_core::{ResourceServerDescriptor, ServerId};
use serde::{Deserialize, Serialize};

/// Which servers a session may contact, and which it may not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationDecision {
    /// Role the decision was derived for (after the default arm).
    pub role: Role,
    /// Reachable servers, in canonical order.
    pub permitted: Vec<ResourceServerDescriptor>,
    /// Servers the role may not reach.
    pub denied: Vec<ServerId>,
}

/// Human-readable capability lines for a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub permitted: Vec<String>,
    pub denied: Vec<String>,
}

impl AuthorizationDecision {
    pub fn permits(&self, server: ServerId) -> bool {
        self.permitted.iter().any(|d| d.id == server)
    }

    /// Descriptor of a permitted server.
    pub fn descriptor(&self, server: ServerId) -> Option<&ResourceServerDescriptor> {
        self.permitted.iter().find(|d| d.id == server)
    }

    pub fn permitted_ids(&self) -> Vec<ServerId> {
        self.permitted.iter().map(|d| d.id).collect()
    }

    pub fn capabilities(&self) -> Capabilities {
        let line = |id: ServerId| format!("{}: {}", id.display_name(), capability_summary(id));
        Capabilities {
            permitted: self.permitted.iter().map(|d| line(d.id)).collect(),
            denied: self.denied.iter().map(|id| line(*id)).collect(),
        }
    }

    /// Multi-line summary for terminals.
    pub fn describe(&self) -> String {
        let capabilities = self.capabilities();
        let mut out = format!("Role: {}\n", self.role);

        out.push_str("Permitted:\n");
        for (descriptor, line) in self.permitted.iter().zip(&capabilities.permitted) {
            out.push_str(&format!("  - {} ({})\n", line, descriptor.address));
        }

        out.push_str("Denied:\n");
        if capabilities.denied.is_empty() {
            out.push_str("  (none)\n");
        }
        for line in &capabilities.denied {
            out.push_str(&format!("  - {}\n", line));
        }
        out
    }
}
