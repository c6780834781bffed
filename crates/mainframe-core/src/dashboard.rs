// ── Dashboard facade ──
//
// Composes the metrics poller, widget registry and status poller, and owns
// the theme preference. Cheaply cloneable; consumers hold a `Dashboard`
// and subscribe to the watch channels they render.

use std::sync::Arc;

use mainframe_api::MainframeClient;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::launcher::Launcher;
use crate::metrics::{MetricsPoller, MetricsState};
use crate::model::{SystemStats, Theme};
use crate::notify::{Notification, Notifier};
use crate::preference::{PreferenceStore, load_theme, save_theme};
use crate::registry::{RedirectOutcome, WidgetRegistry, WidgetState};
use crate::status::{self, StatusMap, StatusPoller};

#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    client: MainframeClient,
    notifier: Notifier,
    notifications: Mutex<Option<mpsc::UnboundedReceiver<Notification>>>,
    metrics: MetricsPoller,
    registry: WidgetRegistry,
    status: StatusPoller,
    preferences: Arc<dyn PreferenceStore>,
    theme: watch::Sender<Theme>,
    cancel: CancellationToken,
    /// Child token for the running pollers; replaced on every `start()`.
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Drop for DashboardInner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Dashboard {
    /// Build the dashboard. Does NOT start polling; call [`start()`](Self::start).
    ///
    /// The theme is read from `preferences` here, falling back to the default.
    pub fn new(
        config: DashboardConfig,
        preferences: Arc<dyn PreferenceStore>,
        launcher: Arc<dyn Launcher>,
    ) -> Result<Self, CoreError> {
        let client = MainframeClient::new(
            config.base_url.clone(),
            &config.api_prefix,
            &config.transport(),
        )?;
        Ok(Self::with_client(config, client, preferences, launcher))
    }

    /// Build the dashboard around an existing API client.
    pub fn with_client(
        config: DashboardConfig,
        client: MainframeClient,
        preferences: Arc<dyn PreferenceStore>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        let (notifier, notifications) = Notifier::channel();
        let metrics = MetricsPoller::new(client.clone(), config.metrics_interval, notifier.clone());
        let registry = WidgetRegistry::new(client.clone(), notifier.clone(), launcher);
        let status = StatusPoller::new(client.clone(), config.status_interval);
        let (theme, _) = watch::channel(load_theme(preferences.as_ref()));
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(DashboardInner {
                config,
                client,
                notifier,
                notifications: Mutex::new(Some(notifications)),
                metrics,
                registry,
                status,
                preferences,
                theme,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.inner.registry
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Start the metrics poller, the status poller and the one-time widget load.
    ///
    /// Calling it again stops the running pollers before starting new ones.
    pub async fn start(&self) {
        self.shutdown().await;

        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        let mut handles = self.inner.task_handles.lock().await;
        handles.push(self.inner.metrics.start(child.clone()));
        handles.push(
            self.inner
                .status
                .start(self.inner.registry.subscribe(), child.clone()),
        );

        let dashboard = self.clone();
        handles.push(tokio::spawn(async move {
            tokio::select! {
                biased;
                () = child.cancelled() => {}
                // Failures are already reported through the notifier.
                _ = dashboard.inner.registry.load() => {}
            }
        }));

        info!(url = %self.inner.config.base_url, "dashboard started");
    }

    /// Stop all pollers and wait for their tasks to finish.
    ///
    /// In-flight requests are aborted; nothing is written after this returns.
    pub async fn shutdown(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("dashboard stopped");
    }

    /// Take the notification receiver. Only the first caller gets it.
    pub async fn take_notifications(&self) -> Option<mpsc::UnboundedReceiver<Notification>> {
        self.inner.notifications.lock().await.take()
    }

    // ── State observation ────────────────────────────────────────

    pub fn metrics(&self) -> watch::Receiver<MetricsState> {
        self.inner.metrics.subscribe()
    }

    pub fn widgets(&self) -> watch::Receiver<WidgetState> {
        self.inner.registry.subscribe()
    }

    pub fn statuses(&self) -> watch::Receiver<Arc<StatusMap>> {
        self.inner.status.subscribe()
    }

    pub fn status_for(&self, id: &str) -> Option<bool> {
        self.inner.status.status_for(id)
    }

    // ── One-shot operations ──────────────────────────────────────

    /// Fetch a single metrics snapshot without touching poller state.
    pub async fn system_stats(&self) -> Result<SystemStats, CoreError> {
        Ok(self.inner.client.system_stats().await?.into())
    }

    /// Load the widget list (same as the start-up load).
    pub async fn load_widgets(&self) -> Result<(), CoreError> {
        self.inner.registry.load().await
    }

    /// One concurrent status round over the currently loaded widgets.
    pub async fn probe_statuses(&self) -> StatusMap {
        let widgets = self.inner.registry.widgets();
        status::probe_round(&self.inner.client, &widgets).await
    }

    pub async fn invoke(&self, id: &str) -> Result<(), CoreError> {
        self.inner.registry.invoke(id).await
    }

    pub async fn invoke_action(&self, id: &str) -> Result<(), CoreError> {
        self.inner.registry.invoke_action(id).await
    }

    pub async fn invoke_toggle(&self, id: &str, enabled: bool) -> Result<(), CoreError> {
        self.inner.registry.invoke_toggle(id, enabled).await
    }

    pub async fn invoke_redirect(&self, id: &str) -> Result<RedirectOutcome, CoreError> {
        self.inner.registry.invoke_redirect(id).await
    }

    // ── Theme ────────────────────────────────────────────────────

    pub fn theme(&self) -> Theme {
        *self.inner.theme.borrow()
    }

    pub fn subscribe_theme(&self) -> watch::Receiver<Theme> {
        self.inner.theme.subscribe()
    }

    /// Set the theme and persist it. Persistence failures are ignored.
    pub fn set_theme(&self, theme: Theme) {
        self.inner.theme.send_replace(theme);
        save_theme(self.inner.preferences.as_ref(), theme);
    }

    /// Advance to the next theme in the fixed cycle and persist it.
    pub fn cycle_theme(&self) -> Theme {
        let next = self.theme().next();
        self.set_theme(next);
        next
    }
}
