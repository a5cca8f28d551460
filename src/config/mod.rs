use std::{path::Path, time::Duration};

pub mod loader;
pub mod validator;

pub use loader::{config_path, load_tracker_config};

use crate::error::Result;

pub const DEFAULT_ENDPOINT: &str = "https://api.coingecko.com/api/v3/simple/price";
pub const DEFAULT_USER_AGENT: &str = concat!("price-ticker/", env!("CARGO_PKG_VERSION"));

/// One tracked price series: the label shown on screen and the id the API expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentConfig {
    pub symbol: String,
    pub api_id: String,
}

impl InstrumentConfig {
    pub fn new(symbol: impl Into<String>, api_id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            api_id: api_id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub endpoint: String,
    pub vs_currency: String,
    pub instruments: [InstrumentConfig; 2],
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub ui_tick: Duration,
    pub history_capacity: usize,
    pub user_agent: String,
}

impl TrackerConfig {
    /// BTC and ETH quoted in USD, polled every five seconds.
    pub fn builtin() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            vs_currency: "usd".to_string(),
            instruments: [
                InstrumentConfig::new("BTC", "bitcoin"),
                InstrumentConfig::new("ETH", "ethereum"),
            ],
            request_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(5),
            ui_tick: Duration::from_millis(100),
            history_capacity: 50,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Builtin defaults overlaid with `<root>/assets/config.json` when it exists.
    pub fn load(root: &Path) -> Result<Self> {
        load_tracker_config(root)
    }

    /// Comma-joined API ids in configured order, as the `ids` query parameter expects.
    pub fn ids_param(&self) -> String {
        self.instruments
            .iter()
            .map(|instrument| instrument.api_id.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn symbols(&self) -> [&str; 2] {
        [
            self.instruments[0].symbol.as_str(),
            self.instruments[1].symbol.as_str(),
        ]
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
