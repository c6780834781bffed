//! UI actions. Every state change in the app goes through one of these.

use std::sync::Arc;

use mainframe_core::{MetricsState, Notification, StatusMap, Theme, WidgetState};

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Overlays ─────────────────────────────────────────────────
    ToggleHelp,
    Notify(Notification),
    DismissNotification,

    // ── Dashboard data (from the bridge) ─────────────────────────
    MetricsUpdated(MetricsState),
    WidgetsUpdated(WidgetState),
    StatusesUpdated(Arc<StatusMap>),
    ThemeChanged(Theme),

    // ── User intents ─────────────────────────────────────────────
    /// Run the widget's default interaction (action, toggle flip, redirect).
    Invoke(String),
    ReloadWidgets,
    CycleTheme,
}
