//! Catalog CLI - Database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! catalog-cli migrate
//!
//! # Create a user
//! catalog-cli user create -e user@example.com -p secret -n "User Name"
//!
//! # Create a superuser (staff + superuser flags)
//! catalog-cli user create-superuser -e admin@example.com -p secret
//!
//! # Print a user's API token, issuing one if needed
//! catalog-cli user token -e user@example.com -p secret
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user` - Create users and issue tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about = "Catalog API CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a regular user
    Create {
        /// Email address (stored lowercased)
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long, default_value = "")]
        name: String,
    },
    /// Create a superuser
    CreateSuperuser {
        /// Email address (stored lowercased)
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Print the user's API token, issuing one if needed
    Token {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                password,
                name,
            } => {
                commands::user::create(&email, &password, &name).await?;
            }
            UserAction::CreateSuperuser { email, password } => {
                commands::user::create_superuser(&email, &password).await?;
            }
            UserAction::Token { email, password } => {
                commands::user::token(&email, &password).await?;
            }
        },
    }
    Ok(())
}
