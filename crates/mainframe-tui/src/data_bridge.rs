//! Data bridge: forwards dashboard watch channels and notifications into
//! the TUI action loop.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use mainframe_core::Dashboard;

use crate::action::Action;

/// Push the current snapshots, then forward every change until cancelled
/// or until the app stops listening.
pub async fn run_data_bridge(
    dashboard: Dashboard,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut metrics = dashboard.metrics();
    let mut widgets = dashboard.widgets();
    let mut statuses = dashboard.statuses();
    let mut theme = dashboard.subscribe_theme();
    let mut notifications = dashboard.take_notifications().await;

    let initial = [
        Action::MetricsUpdated(metrics.borrow_and_update().clone()),
        Action::WidgetsUpdated(widgets.borrow_and_update().clone()),
        Action::StatusesUpdated(statuses.borrow_and_update().clone()),
        Action::ThemeChanged(*theme.borrow_and_update()),
    ];
    for action in initial {
        if action_tx.send(action).is_err() {
            return;
        }
    }

    loop {
        let action = tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = metrics.changed() => {
                Action::MetricsUpdated(metrics.borrow_and_update().clone())
            }
            Ok(()) = widgets.changed() => {
                Action::WidgetsUpdated(widgets.borrow_and_update().clone())
            }
            Ok(()) = statuses.changed() => {
                Action::StatusesUpdated(statuses.borrow_and_update().clone())
            }
            Ok(()) = theme.changed() => Action::ThemeChanged(*theme.borrow_and_update()),
            Some(note) = next_notification(&mut notifications) => Action::Notify(note),
            else => break,
        };

        if action_tx.send(action).is_err() {
            break;
        }
    }

    debug!("data bridge shut down");
}

/// Pending forever when the receiver was already taken elsewhere.
async fn next_notification(
    rx: &mut Option<mpsc::UnboundedReceiver<mainframe_core::Notification>>,
) -> Option<mainframe_core::Notification> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
