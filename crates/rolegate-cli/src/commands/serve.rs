//! `rolegate serve` - Run one resource server behind its gateway.

use anyhow::Context;
use rolegate_core::{RolegateConfig, ServerId};
use rolegate_mcp::{Gateway, HttpServer, ResourceServer};
use rolegate_token::TokenVerifier;

pub async fn serve(
    config: &RolegateConfig,
    server: ServerId,
    listen: Option<String>,
) -> anyhow::Result<()> {
    let server_config = config.servers.get(server);
    let public_key = super::load_public_key(config)?;

    let verifier = TokenVerifier::new(
        public_key,
        config.auth.issuer.clone(),
        server_config.audience.clone(),
    )
    .with_leeway(config.auth.leeway_seconds);
    let gateway = Gateway::new(server, verifier);

    let resource_server = ResourceServer::with_sample_data(server)
        .with_context(|| format!("Failed to initialise {}", server.display_name()))?;

    let listen = listen.unwrap_or(server_config.listen);
    tracing::info!(
        server = %server,
        audience = %server_config.audience,
        issuer = %config.auth.issuer,
        tools = resource_server.tools().len(),
        "Starting resource server"
    );

    HttpServer::new(listen, resource_server, gateway)
        .run()
        .await
        .with_context(|| format!("{} failed", server.display_name()))
}
