//! Authorization gateway in front of every resource server.
//!
//! Each call walks `received -> token extracted -> verified -> authorized`
//! before any tool runs:
//!
//! - no usable `Authorization: Bearer <token>` header: `MissingCredential` (401)
//! - token fails verification for this server's issuer/audience: the
//!   verifier's error (401)
//! - the token's role may not reach this server: `InsufficientRole` (403)
//!
//! On success the verified [`Principal`] is attached to the request.

use crate::protocol::{JsonRpcResponse, Principal};
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use rolegate_core::ServerId;
use rolegate_policy::RoleAuthorizationPolicy;
use rolegate_token::{TokenError, TokenVerifier};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// JSON-RPC code for calls without valid credentials.
pub const UNAUTHENTICATED: i32 = -32001;
/// JSON-RPC code for authenticated calls the role may not make.
pub const FORBIDDEN: i32 = -32003;

/// Why the gateway refused a call.
#[derive(Debug, Error)]
pub enum GatewayRejection {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("role '{role}' may not access {server}")]
    InsufficientRole { role: String, server: ServerId },
}

impl GatewayRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayRejection::MissingCredential | GatewayRejection::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            GatewayRejection::InsufficientRole { .. } => StatusCode::FORBIDDEN,
        }
    }

    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            GatewayRejection::MissingCredential => "MissingCredential",
            GatewayRejection::Token(e) => e.kind(),
            GatewayRejection::InsufficientRole { .. } => "InsufficientRole",
        }
    }

    pub fn to_json_rpc(&self) -> JsonRpcResponse {
        let code = match self.status() {
            StatusCode::FORBIDDEN => FORBIDDEN,
            _ => UNAUTHENTICATED,
        };
        JsonRpcResponse::error_with_data(
            None,
            code,
            self.to_string(),
            Some(json!({ "reason": self.reason() })),
        )
    }
}

impl IntoResponse for GatewayRejection {
    fn into_response(self) -> Response {
        let mut response = (self.status(), Json(self.to_json_rpc())).into_response();
        if self.status() == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

/// Verifies and authorizes calls for one server.
#[derive(Debug, Clone)]
pub struct Gateway {
    server: ServerId,
    verifier: TokenVerifier,
    policy: RoleAuthorizationPolicy,
}

impl Gateway {
    pub fn new(server: ServerId, verifier: TokenVerifier) -> Self {
        Self {
            server,
            verifier,
            policy: RoleAuthorizationPolicy::default(),
        }
    }

    pub fn server(&self) -> ServerId {
        self.server
    }

    /// Decide whether a call carrying `headers` may proceed.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Principal, GatewayRejection> {
        let token = extract_bearer(headers).ok_or(GatewayRejection::MissingCredential)?;
        let claims = self.verifier.verify(token)?;

        let decision = self.policy.resolve(&claims.role);
        if !decision.permits(self.server) {
            return Err(GatewayRejection::InsufficientRole {
                role: claims.role,
                server: self.server,
            });
        }

        Ok(Principal::from_claims(&claims))
    }
}

/// Axum middleware running [`Gateway::authorize`] ahead of the handler.
pub async fn enforce_gateway(
    State(gateway): State<Arc<Gateway>>,
    mut req: Request,
    next: Next,
) -> Response {
    match gateway.authorize(req.headers()) {
        Ok(principal) => {
            tracing::debug!(
                server = %gateway.server,
                subject = %principal.subject,
                role = %principal.role,
                "Call authorized"
            );
            req.extensions_mut().insert(principal);
            next.run(req).await
        }
        Err(rejection) => {
            tracing::warn!(
                server = %gateway.server,
                reason = rejection.reason(),
                error = %rejection,
                "Call rejected"
            );
            rejection.into_response()
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
