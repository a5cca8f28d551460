pub mod text;
pub mod time;

pub use text::{format_amount, sanitize, sanitize_text, Sanitized};
pub use time::clock_label;
