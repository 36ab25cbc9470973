//! Client side of rolegate.
//!
//! [`Session::establish`] turns an identity into per-server bearer tokens and
//! an authorization decision; calls then go out through a [`ToolTransport`]
//! (normally [`HttpTransport`]) only to servers the decision permits.

pub mod client;
pub mod error;
pub mod session;

pub use client::{HttpTransport, ToolTransport};
pub use error::ClientError;
pub use session::{Identity, Session};
