use std::path::PathBuf;

use athletic_scraping::{
    config::Config,
    schedule::{
        store::{JsonFileStore, ScheduleStore},
        ScheduleUpdater,
    },
};
use athletic_scraping_utils::fs_json_util::read_toml_or_default;
use clap::Parser;
use log::info;
use schedule_browser::ChromeLauncher;

#[derive(Parser)]
struct Opts {
    /// TOML file overriding the defaults.
    config_toml: Option<PathBuf>,
    /// Where to write the schedule; overrides `output_path`.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Remote debugging port of the launched Chrome; overrides `remote_debugging_port`.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder().format_timestamp_nanos().init();
    let opts = Opts::parse();
    let config: Config = read_toml_or_default(opts.config_toml)?;

    let connector = config.connector();
    let launcher = ChromeLauncher::new(
        opts.port.or(config.remote_debugging_port),
        config.polling.step_timeout,
    );
    info!("Updating schedule for {}", config.matrix());
    let result = ScheduleUpdater::builder()
        .launcher(launcher)
        .connector(&connector)
        .team(config.team())
        .matrix(config.matrix())
        .polling(config.polling)
        .build()
        .run();

    JsonFileStore::new(opts.output.unwrap_or(config.output_path)).store(&result)?;
    Ok(())
}
