use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;

use sensorpad_ingest::{config, server, storage};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    info!("Starting sensorpad-ingest");

    // Parse command-line arguments
    let cli = config::Cli::parse();

    // Load configuration
    let config = config::load_config(&cli)?;
    info!("Configuration loaded successfully");

    // Accepted readings are appended to a flat comma-separated log
    let store: Arc<dyn storage::ReadingLog> =
        Arc::new(storage::CsvFileLog::new(config.data_file.clone()));

    server::run(&config, store).await
}
