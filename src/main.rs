use std::path::PathBuf;

use anyhow::Context;
use athletic_scraping::{
    config::Config,
    roster::{update_roster, ReqwestFetcher},
};
use athletic_scraping_utils::fs_json_util::read_toml_or_default;
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the roster page of every sport and season.
    Roster {
        /// TOML file overriding the defaults.
        config_toml: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder().format_timestamp_nanos().init();
    let opts = Opts::parse();

    match opts.command {
        Command::Roster { config_toml } => {
            let config: Config = read_toml_or_default(config_toml)?;
            let fetcher = ReqwestFetcher::new().context("Failed to build the http client")?;
            let pages = update_roster(
                &fetcher,
                &config.connector(),
                &config.team(),
                &config.matrix(),
            )
            .await;
            info!("Fetched {} roster page(s)", pages.len());
        }
    }
    Ok(())
}
