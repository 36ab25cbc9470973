//! Shared types for the rolegate crates.
//!
//! The resource-server vocabulary (which backends exist, where they live and
//! how they are reached) is used by the policy, the resource servers and the
//! client alike, so it lives here next to the configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod config;

pub use config::{AuthConfig, ConfigError, RolegateConfig, ServerConfig, ServersConfig};

/// Identifier of one backend resource server.
///
/// Declaration order is the canonical order used everywhere a set of servers
/// is listed (policy decisions, session banners, tool listings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerId {
    HrManagement,
    ProjectManagement,
    Crm,
}

impl ServerId {
    /// Every known server, in canonical order.
    pub const ALL: [ServerId; 3] = [
        ServerId::HrManagement,
        ServerId::ProjectManagement,
        ServerId::Crm,
    ];

    /// Wire name of the server (`hr_management`, `project_management`, `crm`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerId::HrManagement => "hr_management",
            ServerId::ProjectManagement => "project_management",
            ServerId::Crm => "crm",
        }
    }

    /// Human-readable system name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ServerId::HrManagement => "HR Management System",
            ServerId::ProjectManagement => "Project Management System",
            ServerId::Crm => "CRM System",
        }
    }

    /// Port used by the default deployment.
    pub fn default_port(&self) -> u16 {
        match self {
            ServerId::HrManagement => 8001,
            ServerId::ProjectManagement => 8002,
            ServerId::Crm => 8003,
        }
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource server '{0}' (expected one of: hr_management, project_management, crm)")]
pub struct UnknownServer(pub String);

impl FromStr for ServerId {
    type Err = UnknownServer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hr_management" | "hr" => Ok(ServerId::HrManagement),
            "project_management" | "projects" => Ok(ServerId::ProjectManagement),
            "crm" => Ok(ServerId::Crm),
            other => Err(UnknownServer(other.to_string())),
        }
    }
}

/// Network transport a resource server is reached over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum TransportKind {
    /// JSON-RPC over HTTP POST.
    #[default]
    Http,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Http => f.write_str("http"),
        }
    }
}

/// Static description of where a resource server lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceServerDescriptor {
    pub id: ServerId,
    /// Endpoint URL the client posts tool calls to.
    pub address: String,
    pub transport: TransportKind,
}
