//! WFA CLI - database migrations, provisioning and admin management.
//!
//! # Usage
//!
//! ```bash
//! # Apply catalog and session migrations
//! wfa-cli migrate
//!
//! # Migrations plus the default `wfa_admin` identity (idempotent)
//! wfa-cli init-db
//!
//! # Create another admin (password from --password or WFA_ADMIN_PASSWORD)
//! wfa-cli admin create -u alice --password 's3cret'
//!
//! # Reset an admin's password
//! WFA_ADMIN_PASSWORD='n3w' wfa-cli admin set-password -u wfa_admin
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "wfa-cli")]
#[command(author, version, about = "WFA catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (catalog tables and session table)
    Migrate,
    /// Run migrations and create the default admin if missing
    InitDb,
    /// Manage admin identities
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password for the new admin
        #[arg(long, env = "WFA_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Replace an existing admin's password
    SetPassword {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// New password
        #[arg(long, env = "WFA_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wfa_cli=info,wfa_web=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::InitDb => commands::migrate::init_db().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { username, password } => {
                commands::admin::create(&username, &SecretString::from(password)).await?;
            }
            AdminAction::SetPassword { username, password } => {
                commands::admin::set_password(&username, &SecretString::from(password)).await?;
            }
        },
    }
    Ok(())
}
