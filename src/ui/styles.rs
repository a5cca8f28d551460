use std::borrow::Cow;

use ratatui::prelude::Stylize;
use ratatui::style::Color;
use ratatui::text::{Line, Text};

use crate::pipeline::Direction;

/// Accent color used for the header and the price lines.
pub const ACCENT: Color = Color::Yellow;
/// Neutral label color, also used when a price is flat, down, or not yet comparable.
pub const NEUTRAL: Color = Color::White;

pub fn direction_color(direction: Direction) -> Color {
    match direction {
        Direction::Up => ACCENT,
        Direction::FlatOrDown | Direction::Unknown => NEUTRAL,
    }
}

pub fn header_text<'a>(text: impl Into<Cow<'a, str>>) -> Text<'a> {
    let owned = text.into().into_owned();
    Text::from(owned.bold().fg(ACCENT))
}

pub fn secondary_line<'a>(text: impl Into<Cow<'a, str>>) -> Line<'a> {
    let owned = text.into().into_owned();
    Line::from(owned.dim())
}
