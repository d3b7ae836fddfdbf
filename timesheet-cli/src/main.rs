mod api;
mod cli;
mod commands;
mod config;
mod render;
mod session_store;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use timesheet_core::{Clock, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::DevBackend;
use crate::cli::{Cli, Commands};
use crate::config::TimesheetConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timesheet=info,timesheet_core=info,timesheet_api=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(tracing_subscriber::fmt::time::LocalTime::rfc_3339()),
        )
        .init();

    let cli = Cli::parse();
    let config = TimesheetConfig::load()?;

    match cli.command {
        Commands::ConfigPath => commands::config_path(),
        Commands::Login { .. }
        | Commands::Logout
        | Commands::Profile
        | Commands::Edit(_)
        | Commands::Delete { .. }
            if cli.dev =>
        {
            println!("Not available in dev mode; it talks to the API directly.");
            Ok(())
        }
        Commands::Login { email } => commands::login(&config, email).await,
        Commands::Logout => commands::logout(&config).await,
        Commands::Profile => commands::profile(&config).await,
        Commands::Edit(args) => commands::edit(&config, &args).await,
        Commands::Delete { id } => commands::delete(&config, id).await,
        command if cli.dev => {
            tracing::info!("Running against in-memory dev data");
            let backend = Arc::new(DevBackend::new(SystemClock.today()));
            commands::run(command, backend, &config).await
        }
        command => {
            let backend = Arc::new(commands::http_backend(&config)?);
            commands::run(command, backend, &config).await
        }
    }
}
