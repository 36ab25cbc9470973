//! # rolegate-mcp
//!
//! Role-gated resource servers speaking MCP-style JSON-RPC over HTTP.
//!
//! Three servers ship with the crate, each over its own [`RecordStore`]:
//! HR management, project management and CRM. Every server sits behind an
//! authorization [`Gateway`] that verifies the caller's bearer token for
//! that server's audience and checks the token's role against the shared
//! policy table before any tool runs.
//!
//! ## Architecture
//!
//! ```text
//! Client session (rolegate-runtime)
//!       │
//!       │ POST /mcp  Authorization: Bearer <token>
//!       ▼
//! ┌──────────────────────┐
//! │ Gateway              │
//! │ 1. Extract bearer    │
//! │ 2. Verify token      │  ← rolegate-token
//! │ 3. Check role        │  ← rolegate-policy
//! ├──────────────────────┤
//! │ ResourceServer       │
//! │ 4. tools/list        │
//! │ 5. tools/call        │  → RecordStore
//! └──────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use rolegate_core::ServerId;
//! use rolegate_mcp::{Gateway, HttpServer, ResourceServer};
//!
//! let server = ResourceServer::with_sample_data(ServerId::Crm)?;
//! let gateway = Gateway::new(ServerId::Crm, verifier);
//! HttpServer::new("127.0.0.1:8003", server, gateway).run().await?;
//! ```

pub mod domain;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod http_transport;
pub mod protocol;
pub mod server;
pub mod store;
pub mod tool_generator;
pub mod tools;

pub use domain::{CollectionSpec, DomainSpec};
pub use error::McpError;
pub use executor::{ExecutionResult, ToolExecutor};
pub use gateway::{Gateway, GatewayRejection, enforce_gateway};
pub use http_transport::{HttpServer, create_router};
pub use protocol::*;
pub use server::ResourceServer;
pub use store::{InMemoryStore, Record, RecordStore};
pub use tools::ToolRegistry;
