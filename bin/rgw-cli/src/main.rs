//! Radosgw CLI - Identity Admin Command Line Interface
//!
//! Manages users, subusers and keys on a radosgw gateway through the admin
//! API. Observed records are printed to stdout as JSON; logs go to stderr.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rgw_admin::{AccessLevel, CallContext};
use rgw_reconcile::{
    DataSource, KeyState, Provider, ProviderConfig, Resource, SubuserState, UserState,
};
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rgw-cli")]
#[command(about = "Radosgw identity admin CLI")]
#[command(version)]
struct Args {
    /// Config file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Admin endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Admin access key ID (falls back to ACCESS_KEY_ID)
    #[arg(long)]
    access_key_id: Option<String>,

    /// Admin secret access key (falls back to SECRET_ACCESS_KEY)
    #[arg(long)]
    secret_access_key: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show cluster info (liveness check)
    Info,
    /// User operations
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Subuser operations
    Subuser {
        #[command(subcommand)]
        action: SubuserCommands,
    },
    /// Access key operations
    Key {
        #[command(subcommand)]
        action: KeyCommands,
    },
    /// Bucket operations
    Bucket {
        #[command(subcommand)]
        action: BucketCommands,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// List all user IDs
    List,
    /// Create a user
    Create {
        /// User ID
        user_id: String,
        /// Display name
        display_name: String,
    },
    /// Show a user and its keys
    Show {
        /// User ID
        user_id: String,
    },
    /// Change a user's display name
    Update {
        /// User ID
        user_id: String,
        /// New display name
        display_name: String,
    },
    /// Delete a user (bucket data is kept)
    Delete {
        /// User ID
        user_id: String,
    },
    /// Import a user by ID
    Import {
        /// User ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum SubuserCommands {
    /// Create a subuser
    Create {
        /// Parent user ID
        user_id: String,
        /// Subuser name
        subuser: String,
        /// Access level (none, read, write, readwrite, full)
        #[arg(short, long, default_value = "none")]
        access: AccessLevel,
    },
    /// Show a subuser
    Show {
        /// Parent user ID
        user_id: String,
        /// Subuser name
        subuser: String,
    },
    /// Change a subuser's access level
    Update {
        /// Parent user ID
        user_id: String,
        /// Subuser name
        subuser: String,
        /// Access level (none, read, write, readwrite, full)
        #[arg(short, long)]
        access: AccessLevel,
    },
    /// Delete a subuser
    Delete {
        /// Parent user ID
        user_id: String,
        /// Subuser name
        subuser: String,
    },
    /// Import a subuser by `user:subuser` ID
    Import {
        /// Composite ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum KeyCommands {
    /// Create a key; omitted halves are generated by the gateway
    Create {
        /// Owning user ID
        user_id: String,
        /// Owning subuser name
        #[arg(short, long)]
        subuser: Option<String>,
        /// Access key ID to use
        #[arg(long)]
        access_key: Option<String>,
        /// Secret key to use
        #[arg(long)]
        secret_key: Option<String>,
    },
    /// Show a key matching owner, access key and secret key
    Show {
        /// Owning user ID
        user_id: String,
        /// Access key ID
        access_key: String,
        /// Owning subuser name
        #[arg(short, long)]
        subuser: Option<String>,
        /// Secret key
        #[arg(long)]
        secret_key: String,
    },
    /// Delete a key
    Delete {
        /// Owning user ID
        user_id: String,
        /// Access key ID
        access_key: String,
        /// Owning subuser name
        #[arg(short, long)]
        subuser: Option<String>,
    },
    /// Find a key by access key ID across all users
    Import {
        /// Access key ID
        access_key: String,
    },
}

#[derive(Subcommand, Debug)]
enum BucketCommands {
    /// List all buckets with their owners
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging; stdout is reserved for JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let provider_config = provider_config(&args)?;
    debug!(config = ?provider_config, "loaded provider configuration");

    let provider = Provider::configure(env!("CARGO_PKG_VERSION"), &provider_config)
        .context("failed to configure radosgw provider")?;

    let token = CancellationToken::new();
    let ctx = CallContext::new().with_cancellation(token.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, canceling in-flight request");
            token.cancel();
        }
    });

    run(&provider, &ctx, args.command).await
}

/// Merge file, environment and flag settings
fn provider_config(args: &Args) -> Result<ProviderConfig> {
    let loaded = config::load(args.config.as_deref()).context("failed to load configuration")?;

    let flags = ProviderConfig {
        endpoint: args.endpoint.clone(),
        access_key_id: args.access_key_id.clone(),
        secret_access_key: args.secret_access_key.clone(),
        timeout_ms: args.timeout_ms,
    };
    Ok(loaded.overlay(flags).with_env())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(provider: &Provider, ctx: &CallContext, command: Commands) -> Result<()> {
    match command {
        Commands::Info => {
            let info = provider.client().info(ctx).await?;
            print_json(&info)
        }
        Commands::User { action } => run_user(provider, ctx, action).await,
        Commands::Subuser { action } => run_subuser(provider, ctx, action).await,
        Commands::Key { action } => run_key(provider, ctx, action).await,
        Commands::Bucket { action } => match action {
            BucketCommands::List => print_json(&provider.buckets().read(ctx).await?),
        },
    }
}

async fn run_user(provider: &Provider, ctx: &CallContext, action: UserCommands) -> Result<()> {
    let users = provider.users();
    match action {
        UserCommands::List => print_json(&provider.client().list_users(ctx).await?),
        UserCommands::Create {
            user_id,
            display_name,
        } => print_json(&users.create(ctx, &UserState::new(user_id, display_name)).await?),
        UserCommands::Show { user_id } => {
            print_json(&users.read(ctx, &UserState::new(user_id, "")).await?)
        }
        UserCommands::Update {
            user_id,
            display_name,
        } => print_json(&users.update(ctx, &UserState::new(user_id, display_name)).await?),
        UserCommands::Delete { user_id } => {
            users.delete(ctx, &UserState::new(user_id, "")).await?;
            Ok(())
        }
        UserCommands::Import { id } => print_json(&users.import(ctx, &id).await?),
    }
}

async fn run_subuser(
    provider: &Provider,
    ctx: &CallContext,
    action: SubuserCommands,
) -> Result<()> {
    let subusers = provider.subusers();
    match action {
        SubuserCommands::Create {
            user_id,
            subuser,
            access,
        } => {
            let desired = SubuserState::new(user_id, subuser, access);
            print_json(&subusers.create(ctx, &desired).await?)
        }
        SubuserCommands::Show { user_id, subuser } => {
            let current = SubuserState::new(user_id, subuser, AccessLevel::None);
            print_json(&subusers.read(ctx, &current).await?)
        }
        SubuserCommands::Update {
            user_id,
            subuser,
            access,
        } => {
            let desired = SubuserState::new(user_id, subuser, access);
            print_json(&subusers.update(ctx, &desired).await?)
        }
        SubuserCommands::Delete { user_id, subuser } => {
            let current = SubuserState::new(user_id, subuser, AccessLevel::None);
            subusers.delete(ctx, &current).await?;
            Ok(())
        }
        SubuserCommands::Import { id } => print_json(&subusers.import(ctx, &id).await?),
    }
}

async fn run_key(provider: &Provider, ctx: &CallContext, action: KeyCommands) -> Result<()> {
    let keys = provider.keys();
    match action {
        KeyCommands::Create {
            user_id,
            subuser,
            access_key,
            secret_key,
        } => {
            let desired = KeyState {
                user: user_id,
                subuser,
                access_key,
                secret_key,
            };
            print_json(&keys.create(ctx, &desired).await?)
        }
        KeyCommands::Show {
            user_id,
            access_key,
            subuser,
            secret_key,
        } => {
            let current = KeyState {
                user: user_id,
                subuser,
                access_key: Some(access_key),
                secret_key: Some(secret_key),
            };
            print_json(&keys.read(ctx, &current).await?)
        }
        KeyCommands::Delete {
            user_id,
            access_key,
            subuser,
        } => {
            let current = KeyState {
                user: user_id,
                subuser,
                access_key: Some(access_key),
                secret_key: None,
            };
            keys.delete(ctx, &current).await?;
            Ok(())
        }
        KeyCommands::Import { access_key } => print_json(&keys.import(ctx, &access_key).await?),
    }
}
