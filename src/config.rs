use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "sensorpad-ingest", version, about)]
pub struct Cli {
    /// Path to configuration file
    #[clap(long, default_value = "./config.toml")]
    pub config: PathBuf,

    /// Override listen address
    #[clap(long)]
    pub listen_addr: Option<String>,

    /// Override the reading log path
    #[clap(long)]
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub data_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            data_file: PathBuf::from("data.csv"),
        }
    }
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    // A missing config file is not an error; the defaults cover a bare deployment
    let mut config = if cli.config.exists() {
        let config_content = fs::read_to_string(&cli.config)
            .with_context(|| format!("Failed to read config file: {:?}", cli.config))?;

        toml::from_str(&config_content).context("Failed to parse config file")?
    } else {
        Config::default()
    };

    // Apply CLI overrides
    if let Some(ref listen_addr) = cli.listen_addr {
        config.listen_addr = listen_addr.clone();
    }

    if let Some(ref data_file) = cli.data_file {
        config.data_file = data_file.clone();
    }

    Ok(config)
}
