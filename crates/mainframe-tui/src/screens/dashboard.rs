//! Dashboard screen: banner, host metrics and the widget grid.

use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use mainframe_core::{
    MetricsState, Offset, Parallax, StatusMap, SystemStats, Widget, WidgetKind, WidgetState,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme::Palette;

const BANNER: &str = "M A I N F R A M E";
const CARD_WIDTH: u16 = 28;
const CARD_HEIGHT: u16 = 4;

pub struct DashboardScreen {
    palette: Palette,
    metrics: MetricsState,
    widgets: WidgetState,
    statuses: Arc<StatusMap>,
    selected: usize,
    parallax: Parallax,
    banner_offset: Offset,
    throbber: ThrobberState,
    /// Last rendered area, for mapping pointer positions.
    area: Cell<Rect>,
    /// Grid columns at the last render, for up/down navigation.
    columns: Cell<usize>,
    /// Card hit boxes at the last render: (rect, widget index).
    card_areas: RefCell<Vec<(Rect, usize)>>,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            palette: Palette::default(),
            metrics: MetricsState::default(),
            widgets: WidgetState::default(),
            statuses: Arc::new(StatusMap::new()),
            selected: 0,
            parallax: Parallax::default(),
            banner_offset: Offset::default(),
            throbber: ThrobberState::default(),
            area: Cell::new(Rect::default()),
            columns: Cell::new(1),
            card_areas: RefCell::new(Vec::new()),
        }
    }

    fn selected_widget(&self) -> Option<&Widget> {
        self.widgets.widgets.get(self.selected)
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.widgets.widgets.len();
        if len == 0 {
            return;
        }
        let target = self.selected.saturating_add_signed(delta);
        self.selected = target.min(len - 1);
    }

    fn clamp_selection(&mut self) {
        let len = self.widgets.widgets.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    // ── Banner ───────────────────────────────────────────────────

    fn render_banner(&self, frame: &mut Frame, area: Rect) {
        let p = &self.palette;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(p.border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = vec![
            Line::from(Span::styled(
                BANNER,
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("host status dashboard", p.key_hint())),
        ];
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            banner_area(inner, self.banner_offset, self.parallax.strength()),
        );
    }

    // ── Metrics ──────────────────────────────────────────────────

    fn render_metrics(&self, frame: &mut Frame, area: Rect) {
        let p = &self.palette;
        let mut title = vec![Span::styled(" System ", p.title())];
        if let Some(ref stats) = self.metrics.stats {
            title.push(Span::styled(
                format!("[updated {} ago] ", age(stats)),
                p.key_hint(),
            ));
        }
        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(p.border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(ref stats) = self.metrics.stats else {
            if self.metrics.loading {
                self.render_throbber(frame, inner, "Loading system metrics...");
            } else {
                let msg = self.metrics.error.as_deref().unwrap_or("No data");
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!(" Metrics unavailable: {msg}"),
                        Style::default().fg(p.error),
                    )),
                    inner,
                );
            }
            return;
        };

        let cols = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .spacing(1)
            .split(inner);

        let cpu_band = stats.cpu_band();
        frame.render_widget(
            usage_gauge(
                p,
                "CPU",
                stats.cpu_usage,
                format!("{:.1}%  {cpu_band}", stats.cpu_usage),
                p.cpu_band(cpu_band),
            ),
            cols[0],
        );

        let ram_band = stats.ram_band();
        frame.render_widget(
            usage_gauge(
                p,
                "RAM",
                stats.ram_usage,
                format!(
                    "{:.1}%  {} / {}  {ram_band}",
                    stats.ram_usage, stats.ram_used, stats.ram_total
                ),
                p.ram_band(ram_band),
            ),
            cols[1],
        );
    }

    fn render_throbber(&self, frame: &mut Frame, area: Rect, label: &'static str) {
        let throbber = Throbber::default()
            .label(label)
            .style(self.palette.body())
            .throbber_style(Style::default().fg(self.palette.accent));
        frame.render_stateful_widget(throbber, area, &mut self.throbber.clone());
    }

    // ── Widget grid ──────────────────────────────────────────────

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let p = &self.palette;
        let count = self.widgets.widgets.len();
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(" Widgets ", p.title()),
                Span::styled(format!("({count}) "), p.key_hint()),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(p.border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.card_areas.borrow_mut().clear();

        if count == 0 {
            if self.widgets.loading {
                self.render_throbber(frame, inner, "Loading widgets...");
            } else {
                frame.render_widget(
                    Paragraph::new(Span::styled(" No widgets configured", p.key_hint())),
                    inner,
                );
            }
            return;
        }

        let columns = usize::from((inner.width / CARD_WIDTH).max(1));
        self.columns.set(columns);
        let visible_rows = usize::from((inner.height / CARD_HEIGHT).max(1));
        let first_row = (self.selected / columns).saturating_sub(visible_rows - 1);
        let card_width = inner.width / u16::try_from(columns).unwrap_or(1);

        let mut hits = self.card_areas.borrow_mut();
        for (idx, widget) in self.widgets.widgets.iter().enumerate() {
            let row = idx / columns;
            if row < first_row || row >= first_row + visible_rows {
                continue;
            }
            let (Ok(col), Ok(row)) = (
                u16::try_from(idx % columns),
                u16::try_from(row - first_row),
            ) else {
                continue;
            };
            let card = Rect::new(
                inner.x + col * card_width,
                inner.y + row * CARD_HEIGHT,
                card_width,
                CARD_HEIGHT,
            )
            .intersection(inner);
            self.render_card(frame, card, widget, idx == self.selected);
            hits.push((card, idx));
        }
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, widget: &Widget, selected: bool) {
        let p = &self.palette;
        let unknown = matches!(widget.kind, WidgetKind::Unknown { .. });
        let border = if selected {
            p.border_focused()
        } else if unknown {
            Style::default().fg(p.muted)
        } else {
            p.border_default()
        };
        let title_style = if selected { p.selected() } else { p.body() };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", widget.label), title_style))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let status = self.statuses.get(&widget.id).copied();
        frame.render_widget(Paragraph::new(card_body(p, widget, status)), inner);
    }

    // ── Compact layout ───────────────────────────────────────────

    fn render_small(&self, frame: &mut Frame, area: Rect) {
        let summary = match self.metrics.stats {
            Some(ref s) => format!(
                "CPU {:.0}% {} | RAM {:.0}% {}",
                s.cpu_usage,
                s.cpu_band(),
                s.ram_usage,
                s.ram_band()
            ),
            None => "Waiting for metrics...".into(),
        };
        frame.render_widget(Paragraph::new(summary).style(self.palette.body()), area);
    }
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self::new()
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn usage_gauge(
    p: &Palette,
    title: &str,
    pct: f64,
    label: String,
    color: ratatui::style::Color,
) -> Gauge<'static> {
    Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(format!(" {title} "), p.title()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(p.border_default()),
        )
        .gauge_style(Style::default().fg(color).bg(p.highlight_bg))
        .ratio((pct / 100.0).clamp(0.0, 1.0))
        .label(Span::styled(label, Style::default().fg(p.text).add_modifier(Modifier::BOLD)))
}

/// Card contents for one widget.
fn card_body<'a>(p: &Palette, widget: &'a Widget, status: Option<bool>) -> Vec<Line<'a>> {
    match widget.kind {
        WidgetKind::Action { ref endpoint } => match endpoint {
            Some(_) => vec![Line::from(vec![
                Span::styled("▶ ", Style::default().fg(p.accent)),
                Span::styled("Enter to run", p.key_hint()),
            ])],
            None => vec![Line::from(Span::styled("no endpoint", p.key_hint()))],
        },
        WidgetKind::Stat { ref value } => vec![Line::from(Span::styled(
            value.as_str(),
            Style::default().fg(p.secondary).add_modifier(Modifier::BOLD),
        ))],
        WidgetKind::Toggle { toggle_state, .. } => {
            let (text, color) = if toggle_state {
                ("● ON", p.success)
            } else {
                ("○ OFF", p.muted)
            };
            vec![Line::from(vec![
                Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled("  Space to switch", p.key_hint()),
            ])]
        }
        WidgetKind::RedirectButton(_) => {
            let mut spans = vec![Span::styled(
                format!("↗ {}", widget.button_text()),
                Style::default().fg(p.accent),
            )];
            match status {
                Some(true) => spans.push(Span::styled("  ● Online", Style::default().fg(p.success))),
                Some(false) => spans.push(Span::styled("  ○ Offline", Style::default().fg(p.error))),
                None => {}
            }
            vec![Line::from(spans)]
        }
        WidgetKind::Unknown { ref type_name } => vec![Line::from(Span::styled(
            format!("unsupported type '{type_name}'"),
            Style::default().fg(p.muted).add_modifier(Modifier::ITALIC),
        ))],
    }
}

/// `inner` shifted by the parallax offset, shrinking on the side it moves
/// toward. The vertical shift is scaled down to a single row.
fn banner_area(inner: Rect, offset: Offset, strength: f64) -> Rect {
    let dx = cells(offset.x);
    let dy = if strength > 0.0 { cells(offset.y / strength) } else { 0 };
    let (left, right) = split_shift(dx);
    let (top, bottom) = split_shift(dy);
    if inner.width <= left + right || inner.height <= top + bottom {
        return inner;
    }
    Rect::new(
        inner.x + left,
        inner.y + top,
        inner.width - left - right,
        inner.height - top - bottom,
    )
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn cells(value: f64) -> i32 {
    value.round() as i32
}

fn split_shift(delta: i32) -> (u16, u16) {
    let amount = u16::try_from(delta.unsigned_abs()).unwrap_or(u16::MAX);
    if delta >= 0 { (amount, 0) } else { (0, amount) }
}

fn age(stats: &SystemStats) -> String {
    let secs = (Utc::now() - stats.fetched_at).num_seconds().max(0);
    humantime::format_duration(Duration::from_secs(secs.unsigned_abs())).to_string()
}

// ── Component ───────────────────────────────────────────────────────

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let columns = isize::try_from(self.columns.get()).unwrap_or(1);
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-columns),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(columns),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.widgets.widgets.len().saturating_sub(1);
            }
            KeyCode::Enter => {
                return Ok(self.selected_widget().map(|w| Action::Invoke(w.id.clone())));
            }
            KeyCode::Char(' ') => {
                return Ok(self
                    .selected_widget()
                    .filter(|w| matches!(w.kind, WidgetKind::Toggle { .. }))
                    .map(|w| Action::Invoke(w.id.clone())));
            }
            KeyCode::Char('r') => return Ok(Some(Action::ReloadWidgets)),
            _ => {}
        }
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let area = self.area.get();
                self.banner_offset = self.parallax.offset(
                    (
                        f64::from(mouse.column.saturating_sub(area.x)),
                        f64::from(mouse.row.saturating_sub(area.y)),
                    ),
                    (f64::from(area.width), f64::from(area.height)),
                );
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .card_areas
                    .borrow()
                    .iter()
                    .find(|(rect, _)| rect.contains((mouse.column, mouse.row).into()))
                    .map(|(_, idx)| *idx);
                if let Some(idx) = hit {
                    if idx == self.selected {
                        return Ok(self.selected_widget().map(|w| Action::Invoke(w.id.clone())));
                    }
                    self.selected = idx;
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => self.throbber.calc_next(),
            Action::MetricsUpdated(metrics) => self.metrics = metrics.clone(),
            Action::WidgetsUpdated(widgets) => {
                self.widgets = widgets.clone();
                self.clamp_selection();
            }
            Action::StatusesUpdated(statuses) => self.statuses = Arc::clone(statuses),
            Action::ThemeChanged(theme) => self.palette = Palette::for_theme(*theme),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.area.set(area);

        if area.width < 40 || area.height < 14 {
            self.render_small(frame, area);
            return;
        }

        let rows = Layout::vertical([
            Constraint::Length(4), // banner
            Constraint::Length(5), // metrics
            Constraint::Min(CARD_HEIGHT + 2),
        ])
        .split(area);

        self.render_banner(frame, rows[0]);
        self.render_metrics(frame, rows[1]);
        self.render_grid(frame, rows[2]);
    }
}
