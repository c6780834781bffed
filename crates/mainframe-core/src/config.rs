// ── Runtime dashboard configuration ──
//
// Describes *where* the backend lives and how often to poll it.
// Never touches disk: the CLI/TUI builds a `DashboardConfig` and hands it in.

use std::time::Duration;

use url::Url;

/// Default interval for both the metrics and the status poller.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for talking to one dashboard backend.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend root (e.g., `http://localhost:5000`).
    pub base_url: Url,
    /// Path prefix for API routes and relative widget endpoints.
    pub api_prefix: String,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
    /// How often `/api/system` is fetched.
    pub metrics_interval: Duration,
    /// How often each widget status endpoint is probed.
    pub status_interval: Duration,
}

impl DashboardConfig {
    /// Config for `base_url` with every other field at its default.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_prefix: mainframe_api::client::DEFAULT_API_PREFIX.into(),
            tls: TlsVerification::default(),
            timeout: None,
            metrics_interval: DEFAULT_POLL_INTERVAL,
            status_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub(crate) fn transport(&self) -> mainframe_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => mainframe_api::TlsMode::System,
            TlsVerification::CustomCa(path) => mainframe_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => mainframe_api::TlsMode::DangerAcceptInvalid,
        };
        mainframe_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
