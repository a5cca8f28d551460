use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Paragraph,
    },
};

use crate::utils::format_amount;

const FLAT_RANGE_PADDING: f64 = 0.01;

/// Draw a rolling price series as a connected line, oldest sample on the left.
pub fn render_price_line(f: &mut Frame<'_>, area: Rect, symbol: &str, series: &[f64], color: Color) {
    let Some((y_min, y_max)) = value_bounds(series) else {
        f.render_widget(
            Paragraph::new("Waiting for prices…")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(symbol.to_string())),
            area,
        );
        return;
    };

    let title = format!(
        "{symbol} | {} samples | high {} | low {}",
        series.len(),
        format_amount(series.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
        format_amount(series.iter().copied().fold(f64::INFINITY, f64::min)),
    );

    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(idx, value)| (idx as f64, *value))
        .collect();
    let x_max = points.len().saturating_sub(1).max(1) as f64;

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(Marker::Braille)
        .x_bounds([0.0, x_max])
        .y_bounds([y_min, y_max])
        .paint(move |ctx| {
            if let [(x, y)] = points.as_slice() {
                ctx.draw(&CanvasLine {
                    x1: *x,
                    y1: *y,
                    x2: *x,
                    y2: *y,
                    color,
                });
            }
            for pair in points.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].0,
                    y1: pair[0].1,
                    x2: pair[1].0,
                    y2: pair[1].1,
                    color,
                });
            }
        });

    f.render_widget(canvas, area);
}

/// Vertical bounds for a series, padded when every sample is equal so the line stays visible.
pub fn value_bounds(series: &[f64]) -> Option<(f64, f64)> {
    let mut iter = series.iter().copied().filter(|value| value.is_finite());
    let first = iter.next()?;
    let (min, max) = iter.fold((first, first), |(lo, hi), value| (lo.min(value), hi.max(value)));

    if (max - min).abs() < f64::EPSILON {
        let pad = (max.abs() * 0.001).max(FLAT_RANGE_PADDING);
        Some((min - pad, max + pad))
    } else {
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_follow_min_and_max() {
        assert_eq!(value_bounds(&[3.0, 1.0, 2.0]), Some((1.0, 3.0)));
        assert_eq!(value_bounds(&[]), None);
    }

    #[test]
    fn flat_series_gets_padding() {
        let (lo, hi) = value_bounds(&[50000.0, 50000.0]).expect("bounds");
        assert!(lo < 50000.0 && hi > 50000.0);

        let (lo, hi) = value_bounds(&[0.0]).expect("bounds");
        assert!((lo + FLAT_RANGE_PADDING).abs() < 1e-12);
        assert!((hi - FLAT_RANGE_PADDING).abs() < 1e-12);
    }
}
