use anyhow::Result;
use clap::Parser;
use ivrflow::app::{self, AppStateBuilder};
use ivrflow::config::{Cli, Config};
use std::fs::File;
use tokio::select;
use tracing::{info, level_filters::LevelFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = cli
        .conf
        .map(|conf| Config::load(&conf).expect("Failed to load config"))
        .unwrap_or_default();
    config.apply_env();
    config.validate().expect("Invalid configuration");

    let mut log_fmt = tracing_subscriber::fmt();
    if let Some(ref level) = config.log_level {
        if let Ok(lv) = level.as_str().parse::<LevelFilter>() {
            log_fmt = log_fmt.with_max_level(lv);
        }
    }

    // the guard must outlive main or buffered log lines are lost
    let mut _log_guard = None;
    if let Some(ref log_file) = config.log_file {
        let file = File::create(log_file).expect("Failed to create log file");
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        _log_guard = Some(guard);
        log_fmt.with_writer(non_blocking).try_init().ok();
    } else {
        log_fmt.try_init().ok();
    }

    let state = AppStateBuilder::new()
        .config(config)
        .build()
        .expect("Failed to build app state");

    info!(
        caller_id = state.config.caller_id.as_str(),
        associate = state.config.associate_number.as_str(),
        base_url = state.config.base_url.as_str(),
        "Starting ivrflow on {}",
        state.config.http_addr
    );
    select! {
        _ = app::run(state.clone()) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received CTRL+C, shutting down");
        }
    }
    Ok(())
}
