use chrono::{DateTime, Local};
use log::{debug, trace};

use crate::utils::{format_amount, sanitize_text};

use super::{Direction, QuoteUpdate, UpdateEvent, UpdateReceiver};

/// Display side of the pipeline. Implementations only draw; all formatting happens
/// in the [`Dispatcher`].
pub trait RenderSurface {
    fn set_value(&mut self, symbol: &str, amount: &str, direction: Direction);
    fn set_change_text(&mut self, symbol: &str, text: &str);
    fn set_error(&mut self, message: &str);
    fn append_series_point(&mut self, symbol: &str, value: f64);

    fn set_updated_at(&mut self, _at: DateTime<Local>) {}
}

/// Drains queued updates on each display tick and forwards them in order.
#[derive(Debug, Default)]
pub struct Dispatcher {
    applied: u64,
    errors: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything queued and apply it oldest first. Returns how many events ran.
    pub fn tick<R: RenderSurface + ?Sized>(
        &mut self,
        receiver: &mut UpdateReceiver,
        surface: &mut R,
    ) -> usize {
        let events = receiver.try_drain_all();
        let count = events.len();
        if count > 1 {
            trace!("Applying {count} queued updates in one tick");
        }
        for event in events {
            self.apply(event, surface);
        }
        count
    }

    pub fn apply<R: RenderSurface + ?Sized>(&mut self, event: UpdateEvent, surface: &mut R) {
        match event {
            UpdateEvent::PriceUpdate { quotes, fetched_at } => {
                for quote in &quotes {
                    forward_quote(quote, surface);
                }
                surface.set_updated_at(fetched_at);
                self.applied += 1;
            }
            UpdateEvent::Error { message } => {
                debug!("Displaying fetch error: {message}");
                surface.set_error(&sanitize_text(&message));
                self.errors += 1;
            }
        }
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }
}

fn forward_quote<R: RenderSurface + ?Sized>(quote: &QuoteUpdate, surface: &mut R) {
    let amount = format!("${}", format_amount(quote.price));
    surface.set_value(&quote.symbol, &amount, quote.direction());

    // Every update rewrites the change line, including the first one after an error.
    let change = match quote.change_pct {
        Some(change) => format_change(change, quote.window_len),
        None => format_undefined_change(quote.window_len),
    };
    surface.set_change_text(&quote.symbol, &change);

    surface.append_series_point(&quote.symbol, quote.price);
}

pub fn format_change(change_pct: f64, window_len: usize) -> String {
    format!("{change_pct:+.2}% over {}", window_label(window_len))
}

/// Shown when the window opened at zero and no percentage exists.
pub fn format_undefined_change(window_len: usize) -> String {
    format!("n/a over {}", window_label(window_len))
}

fn window_label(window_len: usize) -> String {
    let noun = if window_len == 1 { "sample" } else { "samples" };
    format!("last {window_len} {noun}")
}
