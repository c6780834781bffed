// ── System metrics poller ──
//
// Fetches `/api/system` immediately and then on every tick. Fetches run in
// a JoinSet owned by the task: a slow response may overlap the next tick,
// and whichever completes last wins. Cancelling the token aborts anything
// still in flight.

use std::sync::Arc;
use std::time::Duration;

use mainframe_api::MainframeClient;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::model::SystemStats;
use crate::notify::{Notification, Notifier};

/// Observable metrics state.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsState {
    /// `true` until the first fetch resolves either way.
    pub loading: bool,
    /// Last successful snapshot. Kept across failures.
    pub stats: Option<SystemStats>,
    /// Message of the most recent failure, cleared by the next success.
    pub error: Option<String>,
}

impl Default for MetricsState {
    fn default() -> Self {
        Self {
            loading: true,
            stats: None,
            error: None,
        }
    }
}

pub struct MetricsPoller {
    client: MainframeClient,
    period: Duration,
    notifier: Notifier,
    state: Arc<watch::Sender<MetricsState>>,
}

impl MetricsPoller {
    pub fn new(client: MainframeClient, period: Duration, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(MetricsState::default());
        Self {
            client,
            period,
            notifier,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MetricsState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> MetricsState {
        self.state.borrow().clone()
    }

    /// Spawn the polling task. It runs until `cancel` fires.
    pub fn start(&self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(metrics_task(
            self.client.clone(),
            self.period,
            self.notifier.clone(),
            Arc::clone(&self.state),
            cancel,
        ))
    }
}

async fn metrics_task(
    client: MainframeClient,
    period: Duration,
    notifier: Notifier,
    state: Arc<watch::Sender<MetricsState>>,
    cancel: CancellationToken,
) {
    // First tick completes immediately: that is the on-start fetch.
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!("metrics tick");
                in_flight.spawn(fetch_once(
                    client.clone(),
                    notifier.clone(),
                    Arc::clone(&state),
                ));
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }

    in_flight.abort_all();
    debug!("metrics poller stopped");
}

async fn fetch_once(
    client: MainframeClient,
    notifier: Notifier,
    state: Arc<watch::Sender<MetricsState>>,
) {
    match client.system_stats().await {
        Ok(raw) => {
            let stats = SystemStats::from(raw);
            state.send_modify(|s| {
                s.loading = false;
                s.stats = Some(stats);
                s.error = None;
            });
        }
        Err(e) => {
            if e.is_transient() {
                warn!(error = %e, "system metrics fetch failed, retrying next tick");
            } else {
                error!(error = %e, "system metrics fetch failed");
            }
            notifier.notify(Notification::error(format!(
                "Failed to load system metrics: {e}"
            )));
            state.send_modify(|s| {
                s.loading = false;
                s.error = Some(e.to_string());
            });
        }
    }
}
