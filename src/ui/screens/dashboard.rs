use std::collections::VecDeque;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;
use ratatui::{prelude::*, widgets::*};

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::pipeline::{Direction as PriceDirection, Dispatcher, RenderSurface, UpdateReceiver};
use crate::ui::{
    components::{render_price_line, utils::split_vertical},
    styles::{direction_color, header_text, secondary_line, ACCENT},
    TerminalGuard,
};
use crate::utils::clock_label;

/// What one instrument currently shows on screen.
#[derive(Debug, Clone)]
pub struct PricePanel {
    pub symbol: String,
    pub value_text: String,
    pub direction: PriceDirection,
    pub change_text: String,
    series: VecDeque<f64>,
    series_capacity: usize,
}

impl PricePanel {
    fn new(symbol: &str, series_capacity: usize) -> Self {
        Self {
            symbol: symbol.to_string(),
            value_text: format!("{symbol}: Loading..."),
            direction: PriceDirection::Unknown,
            change_text: String::new(),
            series: VecDeque::with_capacity(series_capacity),
            series_capacity: series_capacity.max(1),
        }
    }

    pub fn series(&self) -> Vec<f64> {
        self.series.iter().copied().collect()
    }

    fn push_point(&mut self, value: f64) {
        self.series.push_back(value);
        while self.series.len() > self.series_capacity {
            self.series.pop_front();
        }
    }
}

/// Terminal rendering surface: one label row and one chart per instrument.
#[derive(Debug, Clone)]
pub struct Dashboard {
    panels: Vec<PricePanel>,
    last_update: Option<DateTime<Local>>,
    last_error: Option<String>,
}

impl Dashboard {
    pub fn new(config: &TrackerConfig) -> Self {
        let panels = config
            .symbols()
            .iter()
            .map(|symbol| PricePanel::new(symbol, config.history_capacity))
            .collect();
        Self {
            panels,
            last_update: None,
            last_error: None,
        }
    }

    pub fn panels(&self) -> &[PricePanel] {
        &self.panels
    }

    pub fn panel(&self, symbol: &str) -> Option<&PricePanel> {
        self.panels.iter().find(|panel| panel.symbol == symbol)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    fn panel_mut(&mut self, symbol: &str) -> Option<&mut PricePanel> {
        self.panels.iter_mut().find(|panel| panel.symbol == symbol)
    }

    pub fn render(&self, f: &mut Frame<'_>) {
        let size = f.size();
        let mut constraints = vec![Constraint::Length(2)];
        for _ in &self.panels {
            constraints.push(Constraint::Length(2));
            constraints.push(Constraint::Min(6));
        }
        constraints.push(Constraint::Length(1));
        let chunks = split_vertical(size, &constraints);

        let updated = match self.last_update {
            Some(at) => format!("Last update {}", clock_label(&at)),
            None => "Waiting for first update".to_string(),
        };
        let header = Paragraph::new(header_text(format!("Price Ticker  {updated}")))
            .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, chunks[0]);

        for (idx, panel) in self.panels.iter().enumerate() {
            let label_area = chunks[1 + idx * 2];
            let chart_area = chunks[2 + idx * 2];
            let color = direction_color(panel.direction);

            let lines = vec![
                Line::from(Span::styled(
                    panel.value_text.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                secondary_line(panel.change_text.clone()),
            ];
            f.render_widget(Paragraph::new(lines), label_area);

            let series = panel.series();
            render_price_line(f, chart_area, &panel.symbol, &series, ACCENT);
        }

        let footer = Paragraph::new("q / Esc / Ctrl-C quit")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        if let Some(area) = chunks.last() {
            f.render_widget(footer, *area);
        }
    }
}

impl RenderSurface for Dashboard {
    fn set_value(&mut self, symbol: &str, amount: &str, direction: PriceDirection) {
        self.last_error = None;
        if let Some(panel) = self.panel_mut(symbol) {
            panel.value_text = format!("{symbol}: {amount}");
            panel.direction = direction;
        }
    }

    fn set_change_text(&mut self, symbol: &str, text: &str) {
        if let Some(panel) = self.panel_mut(symbol) {
            panel.change_text = text.to_string();
        }
    }

    fn set_error(&mut self, message: &str) {
        for panel in &mut self.panels {
            panel.value_text = format!("{}: Error", panel.symbol);
            panel.change_text = message.to_string();
            panel.direction = PriceDirection::Unknown;
        }
        self.last_error = Some(message.to_string());
    }

    fn append_series_point(&mut self, symbol: &str, value: f64) {
        if let Some(panel) = self.panel_mut(symbol) {
            panel.push_point(value);
        }
    }

    fn set_updated_at(&mut self, at: DateTime<Local>) {
        self.last_update = Some(at);
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Drive the dashboard until the user quits. Blocks the calling thread.
pub fn run_dashboard(config: &TrackerConfig, mut receiver: UpdateReceiver) -> Result<()> {
    let mut dashboard = Dashboard::new(config);
    let mut dispatcher = Dispatcher::new();
    let mut guard = TerminalGuard::new()?;

    loop {
        dispatcher.tick(&mut receiver, &mut dashboard);
        guard.draw(|f| dashboard.render(f))?;

        if event::poll(config.ui_tick)? {
            if let Event::Key(key) = event::read()? {
                if is_quit_key(&key) {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    info!(
        "Dashboard closed after {} updates and {} errors",
        dispatcher.applied(),
        dispatcher.errors()
    );
    Ok(())
}
