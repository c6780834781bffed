// ── Widget status poller ──
//
// Probes every redirect button that declares a status endpoint. A round
// probes all of them concurrently and each result lands in the map as it
// completes. When the widget list changes the qualifying set is rebuilt,
// the running schedule and its in-flight probes are dropped, and a fresh
// round starts immediately.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use mainframe_api::MainframeClient;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::model::{StatusProbe, Widget};
use crate::registry::WidgetState;

/// Widget id → online. A missing key means "not resolved yet" or "no probe".
///
/// Entries are never pruned: ids that disappear from the widget list keep
/// their last value.
pub type StatusMap = IndexMap<String, bool>;

pub struct StatusPoller {
    client: MainframeClient,
    period: Duration,
    map: Arc<watch::Sender<Arc<StatusMap>>>,
}

impl StatusPoller {
    pub fn new(client: MainframeClient, period: Duration) -> Self {
        let (map, _) = watch::channel(Arc::new(StatusMap::new()));
        Self {
            client,
            period,
            map: Arc::new(map),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<StatusMap>> {
        self.map.subscribe()
    }

    pub fn snapshot(&self) -> Arc<StatusMap> {
        Arc::clone(&self.map.borrow())
    }

    pub fn status_for(&self, id: &str) -> Option<bool> {
        self.map.borrow().get(id).copied()
    }

    /// Spawn the polling task, following `widgets` until `cancel` fires.
    pub fn start(
        &self,
        widgets: watch::Receiver<WidgetState>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(status_task(
            self.client.clone(),
            self.period,
            widgets,
            Arc::clone(&self.map),
            cancel,
        ))
    }
}

#[derive(Debug, Clone)]
struct Target {
    id: String,
    probe: StatusProbe,
}

fn targets(widgets: &[Widget]) -> Vec<Target> {
    widgets
        .iter()
        .filter_map(|w| {
            w.status_probe().map(|probe| Target {
                id: w.id.clone(),
                probe: probe.clone(),
            })
        })
        .collect()
}

async fn status_task(
    client: MainframeClient,
    period: Duration,
    mut widgets: watch::Receiver<WidgetState>,
    map: Arc<watch::Sender<Arc<StatusMap>>>,
    cancel: CancellationToken,
) {
    loop {
        let round = targets(&widgets.borrow_and_update().widgets);
        debug!(targets = round.len(), "status schedule (re)started");

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut in_flight = JoinSet::new();

        let restart = loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break false,
                changed = widgets.changed() => break changed.is_ok(),
                _ = interval.tick(), if !round.is_empty() => {
                    for target in &round {
                        in_flight.spawn(probe_one(client.clone(), target.clone(), Arc::clone(&map)));
                    }
                }
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            }
        };

        in_flight.abort_all();
        if !restart {
            break;
        }
    }
    debug!("status poller stopped");
}

async fn probe_one(client: MainframeClient, target: Target, map: Arc<watch::Sender<Arc<StatusMap>>>) {
    let online = check(&client, &target.probe).await;
    map.send_modify(|m| {
        Arc::make_mut(m).insert(target.id, online);
    });
}

/// Transport errors, non-2xx, bad JSON and a missing `online` all count as offline.
async fn check(client: &MainframeClient, probe: &StatusProbe) -> bool {
    let result = match client.resolve(&probe.endpoint) {
        Ok(url) => client.probe_status(probe.method.into(), url).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(status) => status.online.unwrap_or(false),
        Err(e) => {
            debug!(endpoint = %probe.endpoint, error = %e, "status probe failed");
            false
        }
    }
}

/// Probe every qualifying widget once and wait for all of them.
pub async fn probe_round(client: &MainframeClient, widgets: &[Widget]) -> StatusMap {
    let mut set = JoinSet::new();
    for (idx, target) in targets(widgets).into_iter().enumerate() {
        let client = client.clone();
        set.spawn(async move { (idx, target.id, check(&client, &target.probe).await) });
    }

    let mut results = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        if let Ok(entry) = joined {
            results.push(entry);
        }
    }
    results.sort_by_key(|(idx, _, _)| *idx);
    results.into_iter().map(|(_, id, online)| (id, online)).collect()
}
