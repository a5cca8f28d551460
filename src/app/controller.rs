use log::{info, warn};

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::fetch::QuoteFetcher;
use crate::pipeline::{spawn_poll_loop, update_channel, PollLoop};
use crate::records::Tracker;
use crate::ui::run_dashboard;

/// Wires the poll loop to the dashboard and owns their shutdown order.
pub struct AppController {
    config: TrackerConfig,
    fetcher: QuoteFetcher,
}

impl AppController {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        let fetcher = QuoteFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }

    pub async fn run(self) -> Result<()> {
        let Self { config, fetcher } = self;
        let [first, second] = config.symbols();
        info!(
            "Tracking {first} and {second} in {} every {:?}",
            config.vs_currency, config.poll_interval
        );

        let (sender, receiver) = update_channel();
        let tracker = Tracker::new(&config);
        let poller = spawn_poll_loop(PollLoop::new(
            fetcher,
            tracker,
            sender,
            config.poll_interval,
        ));

        let ui_config = config.clone();
        let ui_result =
            tokio::task::spawn_blocking(move || run_dashboard(&ui_config, receiver)).await;

        if poller.is_finished() {
            warn!("Poll loop exited before the dashboard closed");
        }

        // Stop polling even when the dashboard failed, so the HTTP client is released.
        match poller.shutdown().await {
            Ok(poll_loop) => {
                let samples: Vec<String> = poll_loop
                    .tracker()
                    .instruments()
                    .iter()
                    .map(|instrument| {
                        format!("{}={}", instrument.symbol(), instrument.history().len())
                    })
                    .collect();
                info!("Poll loop stopped with {} retained samples", samples.join(", "));
            }
            Err(err) => warn!("Poll loop did not stop cleanly: {err}"),
        }

        ui_result?
    }
}
