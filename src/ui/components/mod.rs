pub mod chart;
pub mod terminal;
pub mod utils;

pub use chart::render_price_line;
pub use terminal::TerminalGuard;
