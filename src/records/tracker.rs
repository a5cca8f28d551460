use crate::config::{InstrumentConfig, TrackerConfig};
use crate::pipeline::QuoteUpdate;

use super::HistoryBuffer;

/// One tracked series with its rolling history and the last accepted sample.
#[derive(Debug, Clone)]
pub struct Instrument {
    config: InstrumentConfig,
    history: HistoryBuffer,
    last_observed: Option<f64>,
}

impl Instrument {
    pub fn new(config: InstrumentConfig, capacity: usize) -> Self {
        Self {
            config,
            history: HistoryBuffer::new(capacity),
            last_observed: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn api_id(&self) -> &str {
        &self.config.api_id
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn last_observed(&self) -> Option<f64> {
        self.last_observed
    }

    /// Record an accepted sample and describe it relative to what came before.
    fn observe(&mut self, price: f64) -> QuoteUpdate {
        let previous = self.last_observed;
        self.history.append(price);
        self.last_observed = Some(price);

        QuoteUpdate {
            symbol: self.config.symbol.clone(),
            price,
            previous,
            change_pct: self.history.percent_change_from_open(price),
            window_len: self.history.len(),
        }
    }
}

/// Owned state for the pair of instruments the poll loop feeds.
#[derive(Debug, Clone)]
pub struct Tracker {
    instruments: [Instrument; 2],
}

impl Tracker {
    pub fn new(config: &TrackerConfig) -> Self {
        let capacity = config.history_capacity;
        Self {
            instruments: config
                .instruments
                .clone()
                .map(|instrument| Instrument::new(instrument, capacity)),
        }
    }

    pub fn instruments(&self) -> &[Instrument; 2] {
        &self.instruments
    }

    pub fn instrument(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments
            .iter()
            .find(|instrument| instrument.symbol().eq_ignore_ascii_case(symbol))
    }

    /// Apply both samples of a successful fetch. Callers only pass complete pairs.
    pub fn record(&mut self, prices: (f64, f64)) -> [QuoteUpdate; 2] {
        let [first, second] = &mut self.instruments;
        [first.observe(prices.0), second.observe(prices.1)]
    }
}
