//! Client-side errors.

use rolegate_core::ServerId;
use rolegate_token::TokenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The session's role may not contact this server. Raised before any
    /// network I/O.
    #[error("role '{role}' is not permitted to access {server}")]
    ServerNotPermitted { role: String, server: ServerId },

    /// Minting or checking the session's own token failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The verified token carries a different role than the session
    /// resolved its decision from.
    #[error("verified role '{verified}' differs from requested role '{requested}'")]
    RoleMismatch { requested: String, verified: String },

    #[error("configuration error: {0}")]
    Config(#[from] rolegate_core::ConfigError),

    /// The request never produced a response.
    #[error("transport error calling {server}: {message}")]
    Transport { server: ServerId, message: String },

    /// The server answered with a JSON-RPC error.
    #[error("{server} returned error {code}: {message}")]
    Rpc {
        server: ServerId,
        code: i32,
        message: String,
        /// Gateway rejection reason, when the gateway refused the call.
        reason: Option<String>,
    },

    /// The server answered with something that is not a valid response.
    #[error("invalid response from {server}: {message}")]
    Protocol { server: ServerId, message: String },
}
