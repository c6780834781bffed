//! Application core: event loop, action dispatch, overlays.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use mainframe_core::{Dashboard, Notification, NotificationLevel, Theme};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::dashboard::DashboardScreen;
use crate::theme::Palette;
use crate::tui::Tui;

/// How long a toast stays up.
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard,
    screen: DashboardScreen,
    running: bool,
    help_visible: bool,
    theme: Theme,
    palette: Palette,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancels the data bridge task.
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let theme = dashboard.theme();
        Self {
            dashboard,
            screen: DashboardScreen::new(),
            running: true,
            help_visible: false,
            theme,
            palette: Palette::for_theme(theme),
            notification: None,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.dashboard.start().await;
        {
            let dashboard = self.dashboard.clone();
            let tx = self.action_tx.clone();
            let cancel = self.data_cancel.clone();
            tokio::spawn(async move {
                crate::data_bridge::run_data_bridge(dashboard, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        self.dashboard.shutdown().await;
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            });
        }

        match key.code {
            KeyCode::Char('q') => Ok(Some(Action::Quit)),
            KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
            KeyCode::Char('t') => Ok(Some(Action::CycleTheme)),
            KeyCode::Esc if self.notification.is_some() => Ok(Some(Action::DismissNotification)),
            _ => self.screen.handle_key_event(key),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        self.screen.handle_mouse_event(mouse)
    }

    /// Update app state, run side effects, and forward to the screen.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                if let Some((_, shown)) = self.notification {
                    if shown.elapsed() > TOAST_TTL {
                        self.notification = None;
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),
            Action::DismissNotification => self.notification = None,

            Action::ThemeChanged(theme) => {
                self.theme = *theme;
                self.palette = Palette::for_theme(*theme);
            }

            // The bridge reports the new theme back through ThemeChanged.
            Action::CycleTheme => {
                let theme = self.dashboard.cycle_theme();
                debug!(%theme, "theme cycled");
            }

            Action::Invoke(id) => self.invoke(id.clone()),
            Action::ReloadWidgets => self.reload(),

            Action::Render
            | Action::Resize(..)
            | Action::MetricsUpdated(_)
            | Action::WidgetsUpdated(_)
            | Action::StatusesUpdated(_) => {}
        }

        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    /// Invoke a widget off the event loop. Outcomes arrive as notifications.
    fn invoke(&self, id: String) {
        let dashboard = self.dashboard.clone();
        tokio::spawn(async move {
            if let Err(e) = dashboard.invoke(&id).await {
                debug!(widget = %id, error = %e, "invocation failed");
            }
        });
    }

    fn reload(&self) {
        let dashboard = self.dashboard.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if dashboard.load_widgets().await.is_ok() {
                let _ = tx.send(Action::Notify(Notification::info("Widgets reloaded")));
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(self.palette.bg)), area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        self.screen.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        if let Some((ref notif, _)) = self.notification {
            self.render_notification(frame, area, notif);
        }
        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let p = &self.palette;
        let line = Line::from(vec![
            Span::styled(" ◆ ", Style::default().fg(p.accent)),
            Span::styled(self.dashboard.config().base_url.to_string(), p.body()),
            Span::styled(format!("  theme {}", self.theme), p.key_hint()),
            Span::styled(" │ ", p.key_hint()),
            Span::styled("?", p.key_hint_key()),
            Span::styled(" help  ", p.key_hint()),
            Span::styled("t", p.key_hint_key()),
            Span::styled(" theme  ", p.key_hint()),
            Span::styled("r", p.key_hint_key()),
            Span::styled(" reload  ", p.key_hint()),
            Span::styled("q", p.key_hint_key()),
            Span::styled(" quit", p.key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let p = &self.palette;
        let width = 46u16.min(area.width.saturating_sub(4));
        let height = 15u16.min(area.height.saturating_sub(2));
        let help_area = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(Span::styled(" Keyboard Shortcuts ", p.title()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(p.border_focused())
            .style(Style::default().bg(p.bg));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let row = |key: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<12}"), p.key_hint_key()),
                Span::styled(what, p.key_hint()),
            ])
        };
        let help_text = vec![
            Line::from(""),
            row("←↓↑→ hjkl", "Move between widgets"),
            row("Enter", "Run / switch / open"),
            row("Space", "Switch a toggle"),
            row("g / G", "First / last widget"),
            row("click", "Select, click again to run"),
            Line::from(""),
            row("r", "Reload widgets"),
            row("t", "Next theme"),
            row("Esc", "Dismiss notification"),
            row("q", "Quit"),
            Line::from(""),
            Line::from(Span::styled("        Esc or ? to close", p.key_hint())),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(&self, frame: &mut Frame, area: Rect, notif: &Notification) {
        let p = &self.palette;
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;
        let toast_area = Rect::new(
            area.x + area.width.saturating_sub(width + 1),
            area.y + area.height.saturating_sub(height + 1),
            width,
            height.min(area.height),
        );

        let (color, icon) = match notif.level {
            NotificationLevel::Success => (p.success, "✓"),
            NotificationLevel::Error => (p.error, "✗"),
            NotificationLevel::Warning => (p.warning, "!"),
            NotificationLevel::Info => (p.secondary, "·"),
        };

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(p.bg));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(color)),
            Span::styled(notif.message.as_str(), p.body()),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}
