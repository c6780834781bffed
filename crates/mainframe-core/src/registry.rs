// ── Widget registry ──
//
// Holds the widget list fetched from `/api/buttons` and runs widget
// invocations. Every failure is reported through the notifier at the
// point of the request and also returned, so one-shot callers can set
// an exit code. Widget state only changes after the backend confirms.

use std::sync::Arc;

use mainframe_api::MainframeClient;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::convert::widgets_from_descriptors;
use crate::error::CoreError;
use crate::launcher::Launcher;
use crate::model::{RedirectSpec, Widget, WidgetKind};
use crate::notify::{Notification, Notifier};

/// Observable widget list.
#[derive(Debug, Clone)]
pub struct WidgetState {
    /// `true` until the first load resolves either way.
    pub loading: bool,
    pub widgets: Arc<Vec<Widget>>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            loading: true,
            widgets: Arc::new(Vec::new()),
        }
    }
}

/// What a redirect invocation ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// `url` was handed to the launcher.
    Opened { url: String },
    /// The pre-flight call succeeded and there was nothing to open.
    Called,
}

pub struct WidgetRegistry {
    client: MainframeClient,
    notifier: Notifier,
    launcher: Arc<dyn Launcher>,
    state: watch::Sender<WidgetState>,
}

impl WidgetRegistry {
    pub fn new(client: MainframeClient, notifier: Notifier, launcher: Arc<dyn Launcher>) -> Self {
        let (state, _) = watch::channel(WidgetState::default());
        Self {
            client,
            notifier,
            launcher,
            state,
        }
    }

    // ── State observation ────────────────────────────────────────

    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.state.subscribe()
    }

    pub fn widgets(&self) -> Arc<Vec<Widget>> {
        Arc::clone(&self.state.borrow().widgets)
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// First widget with this id.
    pub fn get(&self, id: &str) -> Option<Widget> {
        self.state.borrow().widgets.iter().find(|w| w.id == id).cloned()
    }

    // ── Loading ──────────────────────────────────────────────────

    /// Fetch the widget list. On failure the current list is kept; the
    /// loading flag is cleared either way.
    pub async fn load(&self) -> Result<(), CoreError> {
        match self.client.widgets().await {
            Ok(descriptors) => {
                let widgets = widgets_from_descriptors(descriptors);
                info!(count = widgets.len(), "widgets loaded");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.widgets = Arc::new(widgets);
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "widget list fetch failed");
                let note = if self.state.borrow().widgets.is_empty() {
                    Notification::error(format!("Failed to load widgets: {e}"))
                } else {
                    Notification::warning(format!("Reload failed, keeping the last widget list: {e}"))
                };
                self.notifier.notify(note);
                self.state.send_modify(|s| s.loading = false);
                Err(e.into())
            }
        }
    }

    // ── Invocation ───────────────────────────────────────────────

    /// Run a widget's primary behavior: actions fire, toggles flip,
    /// redirects redirect. Stat tiles have nothing to run.
    pub async fn invoke(&self, id: &str) -> Result<(), CoreError> {
        let widget = self.lookup(id)?;
        match &widget.kind {
            WidgetKind::Action { .. } | WidgetKind::Unknown { .. } => self.invoke_action(id).await,
            WidgetKind::Toggle { toggle_state, .. } => {
                self.invoke_toggle(id, !toggle_state).await
            }
            WidgetKind::RedirectButton(_) => self.invoke_redirect(id).await.map(drop),
            WidgetKind::Stat { .. } => Err(CoreError::NotInvocable {
                id: widget.id.clone(),
                label: widget.label.clone(),
            }),
        }
    }

    /// POST to the widget's endpoint with no body. Never changes widget state.
    ///
    /// Unknown widget kinds land here too and, having no endpoint, only notify.
    pub async fn invoke_action(&self, id: &str) -> Result<(), CoreError> {
        let widget = self.lookup(id)?;
        let endpoint = match &widget.kind {
            WidgetKind::Action { endpoint } => endpoint.as_deref(),
            _ => None,
        };
        let endpoint = self.require_endpoint(&widget, endpoint)?;

        self.notifier
            .notify(Notification::info(format!("Running {}...", widget.label)));

        let result: Result<(), mainframe_api::Error> = async {
            let url = self.client.resolve(endpoint)?;
            self.client.trigger(url).await
        }
        .await;

        match result {
            Ok(()) => {
                self.notifier
                    .notify(Notification::success(format!("{} succeeded", widget.label)));
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "action failed");
                self.notifier
                    .notify(Notification::error(format!("{} failed: {e}", widget.label)));
                Err(e.into())
            }
        }
    }

    /// POST `{enabled}`; on success every widget with this id takes the new state.
    pub async fn invoke_toggle(&self, id: &str, enabled: bool) -> Result<(), CoreError> {
        let widget = self.lookup(id)?;
        let endpoint = match &widget.kind {
            WidgetKind::Toggle { endpoint, .. } => endpoint.as_deref(),
            _ => None,
        };
        let endpoint = self.require_endpoint(&widget, endpoint)?;
        let word = if enabled { "on" } else { "off" };

        self.notifier.notify(Notification::info(format!(
            "Switching {} {word}...",
            widget.label
        )));

        let result: Result<(), mainframe_api::Error> = async {
            let url = self.client.resolve(endpoint)?;
            self.client.set_toggle(url, enabled).await
        }
        .await;

        match result {
            Ok(()) => {
                self.apply_toggle(id, enabled);
                self.notifier.notify(Notification::success(format!(
                    "{} switched {word}",
                    widget.label
                )));
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "toggle failed");
                self.notifier
                    .notify(Notification::error(format!("{} failed: {e}", widget.label)));
                Err(e.into())
            }
        }
    }

    /// Run the optional pre-flight call, then open `redirectUrl`.
    ///
    /// With a pre-flight call the URL opens only after a 2xx; without one it
    /// opens immediately and nothing touches the network.
    pub async fn invoke_redirect(&self, id: &str) -> Result<RedirectOutcome, CoreError> {
        let widget = self.lookup(id)?;
        let WidgetKind::RedirectButton(spec) = &widget.kind else {
            return Err(self.missing_endpoint(&widget));
        };
        let RedirectSpec {
            redirect_url, api, ..
        } = spec;

        let Some(call) = api else {
            return match redirect_url {
                Some(url) => self.open(url),
                None => Err(self.missing_endpoint(&widget)),
            };
        };

        self.notifier
            .notify(Notification::info(format!("Contacting {}...", widget.label)));

        let result: Result<(), mainframe_api::Error> = async {
            let url = self.client.resolve(&call.endpoint)?;
            self.client
                .call(call.method.into(), url, call.data.as_ref())
                .await
        }
        .await;

        if let Err(e) = result {
            warn!(id, error = %e, "redirect pre-flight call failed");
            self.notifier
                .notify(Notification::error(format!("{} failed: {e}", widget.label)));
            return Err(e.into());
        }

        match redirect_url {
            Some(url) => self.open(url),
            None => {
                self.notifier
                    .notify(Notification::success(format!("{} succeeded", widget.label)));
                Ok(RedirectOutcome::Called)
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────

    fn lookup(&self, id: &str) -> Result<Widget, CoreError> {
        self.get(id).ok_or_else(|| CoreError::WidgetNotFound { id: id.to_owned() })
    }

    fn require_endpoint<'a>(
        &self,
        widget: &Widget,
        endpoint: Option<&'a str>,
    ) -> Result<&'a str, CoreError> {
        endpoint.ok_or_else(|| self.missing_endpoint(widget))
    }

    fn missing_endpoint(&self, widget: &Widget) -> CoreError {
        debug!(id = %widget.id, "widget has no endpoint");
        self.notifier.notify(Notification::error(format!(
            "No endpoint configured for {}",
            widget.label
        )));
        CoreError::MissingEndpoint {
            id: widget.id.clone(),
            label: widget.label.clone(),
        }
    }

    fn open(&self, url: &str) -> Result<RedirectOutcome, CoreError> {
        if let Err(e) = self.launcher.open(url) {
            self.notifier.notify(Notification::error(e.to_string()));
            return Err(e);
        }
        Ok(RedirectOutcome::Opened {
            url: url.to_owned(),
        })
    }

    fn apply_toggle(&self, id: &str, enabled: bool) {
        self.state.send_modify(|s| {
            let mut widgets = s.widgets.as_ref().clone();
            for widget in widgets.iter_mut().filter(|w| w.id == id) {
                if let WidgetKind::Toggle { toggle_state, .. } = &mut widget.kind {
                    *toggle_state = enabled;
                }
            }
            s.widgets = Arc::new(widgets);
        });
    }
}
