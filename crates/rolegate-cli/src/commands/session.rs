//! Client commands.
//!
//! `rolegate session` - Establish a session and list reachable tools.
//! `rolegate call` - Call one tool through the session.

use crate::IdentityArgs;
use anyhow::Context;
use rolegate_core::{RolegateConfig, ServerId};
use rolegate_mcp::{CallToolResponse, ToolContent};
use rolegate_runtime::{ClientError, HttpTransport, Session};
use rolegate_token::TokenIssuer;
use serde_json::Value;
use std::sync::Arc;

fn establish(config: &RolegateConfig, identity: &IdentityArgs) -> anyhow::Result<Session> {
    let issuer = TokenIssuer::new(super::load_keypair(config)?);
    let identity = identity.to_identity()?;
    Session::establish(&issuer, config, &identity, Arc::new(HttpTransport::new()))
        .context("Failed to establish session")
}

/// Print the banner and the tools of every permitted server.
pub async fn run(config: &RolegateConfig, identity: &IdentityArgs) -> anyhow::Result<()> {
    let session = establish(config, identity)?;
    println!("{}", session.banner());

    for (server, tools) in session.discover().await {
        println!("{} ({}):", server.display_name(), server);
        match tools {
            Ok(tools) if tools.is_empty() => println!("  (no tools)"),
            Ok(tools) => {
                for tool in tools {
                    match &tool.description {
                        Some(description) => println!("  {:<28} {}", tool.name, description),
                        None => println!("  {}", tool.name),
                    }
                }
            }
            Err(e) => println!("  ✘ {}", e),
        }
        println!();
    }
    Ok(())
}

/// Call `tool` on `server` and print its content.
pub async fn call(
    config: &RolegateConfig,
    identity: &IdentityArgs,
    server: ServerId,
    tool: &str,
    args: &str,
) -> anyhow::Result<()> {
    let arguments: Value =
        serde_json::from_str(args).with_context(|| format!("--args is not valid JSON: {}", args))?;
    anyhow::ensure!(arguments.is_object(), "--args must be a JSON object");

    let session = establish(config, identity)?;
    match session.call_tool(server, tool, arguments).await {
        Ok(response) => {
            print_response(&response)?;
            if response.is_error {
                anyhow::bail!("{} reported an error", tool);
            }
            Ok(())
        }
        Err(ClientError::ServerNotPermitted { role, server }) => {
            println!(
                "✘ Access denied: role '{}' cannot use {}",
                role,
                server.display_name()
            );
            println!();
            print!("{}", session.decision().describe());
            anyhow::bail!("access denied")
        }
        Err(e) => Err(e.into()),
    }
}

fn print_response(response: &CallToolResponse) -> anyhow::Result<()> {
    for content in &response.content {
        match content {
            ToolContent::Text { text } => println!("{}", text),
            ToolContent::Json { json } => println!("{}", serde_json::to_string_pretty(json)?),
        }
    }
    Ok(())
}
