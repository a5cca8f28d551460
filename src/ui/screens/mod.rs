pub mod dashboard;

pub use dashboard::{run_dashboard, Dashboard, PricePanel};
