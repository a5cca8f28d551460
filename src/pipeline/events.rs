use chrono::{DateTime, Local};

/// Everything the display needs to show one instrument after a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteUpdate {
    pub symbol: String,
    pub price: f64,
    /// Last accepted price before this one; `None` on the first success.
    pub previous: Option<f64>,
    /// Change against the oldest sample in the rolling window.
    pub change_pct: Option<f64>,
    pub window_len: usize,
}

impl QuoteUpdate {
    pub fn direction(&self) -> Direction {
        Direction::between(self.previous, self.price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateEvent {
    PriceUpdate {
        quotes: [QuoteUpdate; 2],
        fetched_at: DateTime<Local>,
    },
    Error {
        message: String,
    },
}

/// Up when the price rose, flat-or-down otherwise; unknown without a previous sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    FlatOrDown,
    Unknown,
}

impl Direction {
    pub fn between(previous: Option<f64>, current: f64) -> Self {
        match previous {
            Some(previous) if current > previous => Direction::Up,
            Some(_) => Direction::FlatOrDown,
            None => Direction::Unknown,
        }
    }
}
