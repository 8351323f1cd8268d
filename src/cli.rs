use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::configuration::Settings;
use crate::models::user::NewUser;
use crate::services::user::UserService;
use crate::startup::{self, get_connection_pool};
use crate::store::{UserRepository, schema};

/// Rows inserted by `seed-db`.
pub const SEED_USERS: [(&str, &str); 2] = [
    ("test1", "test1@example.com"),
    ("test2", "test2@example.com"),
];

#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(about = "User registry service and its maintenance commands", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Drop and recreate the users table
    RecreateDb,
    /// Insert the two sample users
    SeedDb,
}

impl Cli {
    pub async fn execute(self, configuration: Settings) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => startup::run(configuration).await,
            Command::RecreateDb => recreate_db(&configuration).await,
            Command::SeedDb => seed_db(&configuration).await,
        }
    }
}

async fn recreate_db(configuration: &Settings) -> anyhow::Result<()> {
    let pool = get_connection_pool(&configuration.database);
    schema::recreate_all(&pool).await?;
    Ok(())
}

async fn seed_db(configuration: &Settings) -> anyhow::Result<()> {
    let pool = get_connection_pool(&configuration.database);
    schema::create_all(&pool).await?;

    let service = UserService::new(Arc::new(UserRepository::new(pool)));
    for (username, email) in SEED_USERS {
        let new_user = NewUser::parse(username.to_string(), email.to_string())
            .ok_or_else(|| anyhow::anyhow!("seed row for {email} is incomplete"))?;
        let user = service.create(new_user).await?;
        tracing::info!(user_id = user.id, "Seeded {}", user.email);
    }
    Ok(())
}
