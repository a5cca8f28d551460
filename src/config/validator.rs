use std::collections::HashSet;

use crate::error::{AppError, Result};

use super::TrackerConfig;

/// Validate a tracker configuration, reporting every problem at once.
pub fn validate_tracker_config(config: &TrackerConfig) -> Result<()> {
    let mut issues = Vec::new();

    validate_request(config, &mut issues);
    validate_instruments(config, &mut issues);
    validate_timing(config, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "\n  - {}",
            issues.join("\n  - ")
        )))
    }
}

fn validate_request(config: &TrackerConfig, issues: &mut Vec<String>) {
    if config.endpoint.trim().is_empty() {
        issues.push("endpoint must not be empty".to_string());
    } else if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://")
    {
        issues.push(format!(
            "endpoint must be an http(s) URL, found `{}`",
            config.endpoint
        ));
    }

    if config.vs_currency.trim().is_empty() {
        issues.push("vs_currency must not be empty".to_string());
    }
}

fn validate_instruments(config: &TrackerConfig, issues: &mut Vec<String>) {
    let mut symbols = HashSet::new();
    let mut ids = HashSet::new();

    for (idx, instrument) in config.instruments.iter().enumerate() {
        if instrument.symbol.trim().is_empty() {
            issues.push(format!("instruments[{idx}].symbol must not be empty"));
        } else if !symbols.insert(instrument.symbol.to_uppercase()) {
            issues.push(format!(
                "instruments[{idx}].symbol `{}` is duplicated",
                instrument.symbol
            ));
        }

        if instrument.api_id.trim().is_empty() {
            issues.push(format!("instruments[{idx}].api_id must not be empty"));
        } else if instrument.api_id.contains(',') {
            issues.push(format!(
                "instruments[{idx}].api_id `{}` must not contain commas",
                instrument.api_id
            ));
        } else if !ids.insert(instrument.api_id.to_lowercase()) {
            issues.push(format!(
                "instruments[{idx}].api_id `{}` is duplicated",
                instrument.api_id
            ));
        }
    }
}

fn validate_timing(config: &TrackerConfig, issues: &mut Vec<String>) {
    if config.request_timeout.is_zero() {
        issues.push("request_timeout_secs must be greater than zero".to_string());
    }
    if config.poll_interval.is_zero() {
        issues.push("poll_interval_secs must be greater than zero".to_string());
    }
    if config.ui_tick.is_zero() {
        issues.push("ui_tick_millis must be greater than zero".to_string());
    }
    if config.history_capacity == 0 {
        issues.push("history_capacity must be greater than zero".to_string());
    }
}
