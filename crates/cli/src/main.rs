//! Stellar Market CLI - Catalog seeding and user administration.
//!
//! # Usage
//!
//! ```bash
//! # Seed the catalog with sample categories, products, and images
//! sm-cli seed
//!
//! # Force-set a user's password
//! sm-cli admin reset-password -u 4f8c1c3e-9d3a-4a9e-8a3e-2f1b5c6d7e8f -p newpassword
//!
//! # Delete a user entirely (application data + identity)
//! sm-cli admin delete-user -u 4f8c1c3e-9d3a-4a9e-8a3e-2f1b5c6d7e8f
//!
//! # Grant / revoke / list roles
//! sm-cli admin assign-role -u <id> -r seller
//! sm-cli admin remove-role -u <id> -r seller
//! sm-cli admin roles -u <id>
//! ```
//!
//! Every command builds a service-role client; this binary must only run
//! in trusted operator contexts.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sm-cli")]
#[command(author, version, about = "Stellar Market CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the catalog with sample data (idempotent)
    Seed,
    /// Privileged user administration
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Force-set a user's password
    ResetPassword {
        /// Account id (UUID)
        #[arg(short, long)]
        user: String,

        /// New password (minimum 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// Delete a user's application data and identity record
    DeleteUser {
        /// Account id (UUID)
        #[arg(short, long)]
        user: String,
    },
    /// Grant a role (idempotent)
    AssignRole {
        /// Account id (UUID)
        #[arg(short, long)]
        user: String,

        /// Role name (`admin`, `seller`, `user`)
        #[arg(short, long)]
        role: String,
    },
    /// Revoke a role (succeeds even when not held)
    RemoveRole {
        /// Account id (UUID)
        #[arg(short, long)]
        user: String,

        /// Role name (`admin`, `seller`, `user`)
        #[arg(short, long)]
        role: String,
    },
    /// List the roles a user holds
    Roles {
        /// Account id (UUID)
        #[arg(short, long)]
        user: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::ResetPassword { user, password } => {
                commands::admin::reset_password(&user, &password).await?;
            }
            AdminAction::DeleteUser { user } => {
                commands::admin::delete_user(&user).await?;
            }
            AdminAction::AssignRole { user, role } => {
                commands::admin::assign_role(&user, &role).await?;
            }
            AdminAction::RemoveRole { user, role } => {
                commands::admin::remove_role(&user, &role).await?;
            }
            AdminAction::Roles { user } => {
                commands::admin::list_roles(&user).await?;
            }
        },
    }
    Ok(())
}
