//! Everglen CLI binary.
//!
//! - `serve` starts the HTTP API
//! - `seed` inserts the two demo characters and their relationship

use anyhow::Result;
use clap::Parser;
use everglen_core::{DatabaseConfig, EverglenConfig, init_logging};
use everglen_database::{InMemoryGateway, seed_demo_cast};
use everglen_error::HttpError;
use everglen_interface::PersistenceGateway;
use everglen_models::GroqDriver;
use everglen_narrative::{NarrativePipeline, StoryLibrary};
use everglen_server::{AppState, create_router};
use std::sync::Arc;
use tracing::info;

mod cli;

use cli::{Cli, Commands};

fn open_gateway(database: &DatabaseConfig) -> Result<Arc<dyn PersistenceGateway>> {
    match database.url.as_deref() {
        #[cfg(feature = "postgres")]
        Some(url) => {
            let gateway = everglen_database::PostgresGateway::connect(Some(url))?;
            Ok(Arc::new(gateway))
        }
        #[cfg(not(feature = "postgres"))]
        Some(_) => {
            tracing::warn!("database.url is set but the postgres feature is disabled, using memory store");
            Ok(Arc::new(InMemoryGateway::new()))
        }
        None => {
            info!("No database configured, using memory store");
            Ok(Arc::new(InMemoryGateway::new()))
        }
    }
}

async fn seed(gateway: &dyn PersistenceGateway) -> Result<()> {
    match seed_demo_cast(gateway).await? {
        Some(cast) => info!(
            nerd = %cast.nerd.id,
            bully = %cast.bully.id,
            relationship = %cast.relationship.id,
            "Seeded demo cast"
        ),
        None => info!("Store already has characters, demo cast not inserted"),
    }
    Ok(())
}

async fn serve(
    config: &EverglenConfig,
    gateway: Arc<dyn PersistenceGateway>,
    bind: Option<String>,
) -> Result<()> {
    let driver = GroqDriver::from_config(&config.completion, &config.retry)?;
    let pipeline = NarrativePipeline::from_config(Arc::new(driver), config);
    let library = StoryLibrary::new(gateway, pipeline, config.defaults.clone());
    let app = create_router(AppState::new(Arc::new(library)));

    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|e| HttpError::new(format!("Failed to bind {}: {}", bind, e)))?;
    info!(
        address = %bind,
        model = %config.completion.model,
        "Everglen API listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| HttpError::new(format!("Server error: {}", e)))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_logging(cli.verbose);

    let config = EverglenConfig::load_with(cli.config.as_deref())?;
    let gateway = open_gateway(&config.database)?;

    match cli.command {
        Commands::Serve { bind, seed: with_seed } => {
            if with_seed {
                seed(gateway.as_ref()).await?;
            }
            serve(&config, gateway, bind).await?;
        }
        Commands::Seed => {
            seed(gateway.as_ref()).await?;
        }
    }

    Ok(())
}
