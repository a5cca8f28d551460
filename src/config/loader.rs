use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use log::{error, info};
use serde::Deserialize;

use crate::error::{Context, Result};

use super::{validator, InstrumentConfig, TrackerConfig};

/// Location of the optional override file under the application root.
pub fn config_path(root: &Path) -> PathBuf {
    root.join("assets").join("config.json")
}

/// Load `assets/config.json` under `root`, layering its fields over the builtin defaults.
///
/// A missing file is not an error: the builtin configuration is used as-is.
pub fn load_tracker_config(root: &Path) -> Result<TrackerConfig> {
    let path = config_path(root);
    if !path.exists() {
        info!("No config at {}, using builtin defaults", path.display());
        return Ok(TrackerConfig::builtin());
    }

    let json = fs::read_to_string(&path)
        .with_context(|| format!("failed to read tracker config at {}", path.display()))?;
    let config = parse_tracker_config(&json).map_err(|err| {
        error!("Failed to parse tracker config at {}: {err}", path.display());
        err
    })?;

    validator::validate_tracker_config(&config)?;
    info!("Loaded tracker config from {}", path.display());
    Ok(config)
}

pub(crate) fn parse_tracker_config(json: &str) -> serde_json::Result<TrackerConfig> {
    let raw: RawTrackerConfig = serde_json::from_str(json)?;
    Ok(raw.into_config())
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawTrackerConfig {
    endpoint: Option<String>,
    vs_currency: Option<String>,
    instruments: Option<[RawInstrument; 2]>,
    request_timeout_secs: Option<u64>,
    poll_interval_secs: Option<u64>,
    ui_tick_millis: Option<u64>,
    history_capacity: Option<usize>,
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInstrument {
    symbol: String,
    api_id: String,
}

impl RawTrackerConfig {
    fn into_config(self) -> TrackerConfig {
        let defaults = TrackerConfig::builtin();
        TrackerConfig {
            endpoint: self.endpoint.unwrap_or(defaults.endpoint),
            vs_currency: self
                .vs_currency
                .map(|currency| currency.trim().to_lowercase())
                .unwrap_or(defaults.vs_currency),
            instruments: self
                .instruments
                .map(|pair| pair.map(|raw| InstrumentConfig::new(raw.symbol, raw.api_id)))
                .unwrap_or(defaults.instruments),
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            poll_interval: self
                .poll_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
            ui_tick: self
                .ui_tick_millis
                .map(Duration::from_millis)
                .unwrap_or(defaults.ui_tick),
            history_capacity: self.history_capacity.unwrap_or(defaults.history_capacity),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn empty_object_yields_builtin_values() {
        let config = parse_tracker_config("{}").expect("parses");
        let builtin = TrackerConfig::builtin();

        assert_eq!(config.endpoint, builtin.endpoint);
        assert_eq!(config.instruments, builtin.instruments);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.ui_tick, Duration::from_millis(100));
        assert_eq!(config.history_capacity, 50);
    }

    #[test]
    fn overrides_individual_fields() {
        let config = parse_tracker_config(
            r#"{
                "vs_currency": " EUR ",
                "instruments": [
                    {"symbol": "SOL", "api_id": "solana"},
                    {"symbol": "ADA", "api_id": "cardano"}
                ],
                "poll_interval_secs": 30,
                "history_capacity": 120
            }"#,
        )
        .expect("parses");

        assert_eq!(config.vs_currency, "eur");
        assert_eq!(config.symbols(), ["SOL", "ADA"]);
        assert_eq!(config.ids_param(), "solana,cardano");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.history_capacity, 120);
        assert_eq!(config.ui_tick, Duration::from_millis(100));
    }

    #[test]
    fn rejects_unknown_fields_and_wrong_instrument_count() {
        assert!(parse_tracker_config(r#"{"pol_interval_secs": 3}"#).is_err());
        assert!(parse_tracker_config(
            r#"{"instruments": [{"symbol": "BTC", "api_id": "bitcoin"}]}"#
        )
        .is_err());
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let root = std::env::temp_dir().join("price-ticker-no-config");
        let config = load_tracker_config(&root).expect("builtin config");
        assert_eq!(config.ids_param(), "bitcoin,ethereum");
    }

    #[test]
    fn loads_and_validates_file_on_disk() {
        let root = std::env::temp_dir().join(format!("price-ticker-config-{}", std::process::id()));
        let assets = root.join("assets");
        fs::create_dir_all(&assets).expect("create assets dir");

        fs::write(config_path(&root), r#"{"history_capacity": 0}"#).expect("write config");
        let err = load_tracker_config(&root).expect_err("zero capacity is invalid");
        assert!(err.to_string().contains("history_capacity"), "{err}");

        fs::write(config_path(&root), r#"{"history_capacity": "#).expect("write config");
        let err = load_tracker_config(&root).expect_err("truncated json");
        assert!(matches!(err, AppError::Json(_)), "{err:?}");

        fs::write(config_path(&root), r#"{"history_capacity": 10}"#).expect("write config");
        let config = load_tracker_config(&root).expect("valid config");
        assert_eq!(config.history_capacity, 10);

        let _ = fs::remove_dir_all(&root);
    }
}
