pub mod history;
pub mod tracker;

pub use history::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
pub use tracker::{Instrument, Tracker};
