use anyhow::Context;
use clap::{Parser, Subcommand};
use rolegate_core::{RolegateConfig, ServerId};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

/// Configuration file picked up from the working directory when `--config`
/// is not given.
const DEFAULT_CONFIG_FILE: &str = "rolegate.yaml";

#[derive(Parser, Debug)]
#[command(name = "rolegate", version, about = "Role-gated resource servers with signed bearer tokens")]
struct Cli {
    /// Path to rolegate.yaml
    #[arg(long, global = true, env = "ROLEGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Signing key management
    Keys {
        #[command(subcommand)]
        cmd: KeysCommand,
    },

    /// Mint, verify and inspect tokens
    Token {
        #[command(subcommand)]
        cmd: TokenCommand,
    },

    /// Inspect the role policy
    Policy {
        #[command(subcommand)]
        cmd: PolicyCommand,
    },

    /// Run one resource server behind its authorization gateway
    Serve {
        /// hr_management, project_management or crm
        server: ServerId,

        /// Override the configured listen address
        #[arg(long)]
        listen: Option<String>,
    },

    /// Establish a session and list the tools of every permitted server
    Session {
        #[command(flatten)]
        identity: IdentityArgs,
    },

    /// Call one tool on a resource server
    Call {
        server: ServerId,
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,

        #[command(flatten)]
        identity: IdentityArgs,
    },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// Generate an RSA keypair and write private.pem / public.pem
    Generate {
        #[arg(long, short, default_value = "mcp_auth")]
        output: PathBuf,

        /// Modulus size
        #[arg(long, default_value_t = rolegate_token::DEFAULT_KEY_BITS)]
        bits: usize,

        /// Replace existing key files
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Mint a signed token
    Mint {
        #[command(flatten)]
        identity: IdentityArgs,

        /// Audience; defaults to the HR server's configured audience
        #[arg(long)]
        audience: Option<String>,

        /// Lifetime such as "1h" or "30m"; defaults to auth.token_ttl
        #[arg(long)]
        expires: Option<String>,

        /// Never expire
        #[arg(long, default_value_t = false, conflicts_with = "expires")]
        no_expiry: bool,
    },

    /// Verify a token and print its claims
    Verify {
        token: String,

        #[arg(long)]
        audience: Option<String>,
    },

    /// Decode a token without verifying it
    Inspect { token: String },
}

#[derive(Subcommand, Debug)]
enum PolicyCommand {
    /// Print the servers a role may and may not reach
    Show { role: String },
}

/// Who a token or session is for.
#[derive(clap::Args, Debug, Clone)]
pub struct IdentityArgs {
    #[arg(long)]
    pub subject: String,

    #[arg(long)]
    pub role: String,

    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    /// Extra claim as key=value (value parsed as JSON when possible)
    #[arg(long = "claim", value_name = "KEY=VALUE")]
    pub claims: Vec<String>,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RolegateConfig> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            fallback.exists().then_some(fallback)
        }
    };
    RolegateConfig::load_or_default(path.as_deref()).with_context(|| match &path {
        Some(p) => format!("Failed to load configuration from {}", p.display()),
        None => "Failed to build default configuration".to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Keys { cmd } => match cmd {
            KeysCommand::Generate {
                output,
                bits,
                force,
            } => commands::keys::generate(&output, bits, force),
        },
        Command::Token { cmd } => {
            let config = load_config(cli.config.as_deref())?;
            match cmd {
                TokenCommand::Mint {
                    identity,
                    audience,
                    expires,
                    no_expiry,
                } => commands::token::mint(&config, &identity, audience, expires, no_expiry),
                TokenCommand::Verify { token, audience } => {
                    commands::token::verify(&config, &token, audience)
                }
                TokenCommand::Inspect { token } => commands::token::inspect(&token),
            }
        }
        Command::Policy { cmd } => {
            let config = load_config(cli.config.as_deref())?;
            match cmd {
                PolicyCommand::Show { role } => commands::policy::show(&config, &role),
            }
        }
        Command::Serve { server, listen } => {
            let config = load_config(cli.config.as_deref())?;
            commands::serve::serve(&config, server, listen).await
        }
        Command::Session { identity } => {
            let config = load_config(cli.config.as_deref())?;
            commands::session::run(&config, &identity).await
        }
        Command::Call {
            server,
            tool,
            args,
            identity,
        } => {
            let config = load_config(cli.config.as_deref())?;
            commands::session::call(&config, &identity, server, &tool, &args).await
        }
    }
}
