pub mod commands;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::models::Role;
use crate::database::DatabaseManager;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "vetclinic")]
#[command(about = "VetClinic CLI - database and account administration")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Grant the ADMIN role to an existing account")]
    Promote {
        #[arg(help = "Account email")]
        email: String,
    },

    #[command(about = "Return an account to the USER role")]
    Demote {
        #[arg(help = "Account email")]
        email: String,
    },

    #[command(about = "Delete sessions past their expiry")]
    PurgeSessions,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = Arc::new(AppConfig::from_env());
    let db = DatabaseManager::connect(&config.database).await?;

    let state = AppState::postgres(config, db.clone());

    let result = match cli.command {
        Commands::Migrate => commands::database::migrate(&db, output_format).await,
        Commands::Promote { email } => {
            commands::users::set_role(&state, &email, Role::Admin, output_format).await
        }
        Commands::Demote { email } => {
            commands::users::set_role(&state, &email, Role::User, output_format).await
        }
        Commands::PurgeSessions => commands::database::purge_sessions(&state, output_format).await,
    };

    db.close().await;
    result
}
