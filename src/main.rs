use std::fs::{self, OpenOptions};

use env_logger::{Builder, Env, Target};
use log::{error, info};

use price_ticker::{app, config::TrackerConfig, Result};

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "logs/price-ticker.log";

fn init_logging() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    // The dashboard owns the terminal, so logs go to a file when one can be opened.
    let file = fs::create_dir_all(LOG_DIR).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(LOG_FILE)
    });
    match file {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.target(Target::Stderr);
        }
    }
    builder.init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let root = std::env::current_dir()?;
    let config = TrackerConfig::load(&root).map_err(|err| {
        error!("Startup failed: {err}");
        err
    })?;

    info!("Starting price-ticker {}", env!("CARGO_PKG_VERSION"));
    let result = app::run(config).await;
    match &result {
        Ok(()) => info!("Shut down cleanly"),
        Err(err) => error!("Exited with error: {err}"),
    }
    result
}
