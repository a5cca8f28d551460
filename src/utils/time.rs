use chrono::{DateTime, Local};

/// Wall-clock label for the dashboard header, e.g. `14:03:27`.
pub fn clock_label(time: &DateTime<Local>) -> String {
    time.format("%H:%M:%S").to_string()
}
