// mainframe-core: Polling and state reconciliation between mainframe-api and consumers (CLI/TUI).

pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod launcher;
pub mod metrics;
pub mod model;
pub mod notify;
pub mod parallax;
pub mod preference;
pub mod registry;
pub mod status;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, TlsVerification};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use launcher::{Launcher, RecordingLauncher, SystemLauncher};
pub use metrics::{MetricsPoller, MetricsState};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use parallax::{Offset, PARALLAX_STRENGTH, Parallax};
pub use preference::{MemoryPreferenceStore, PreferenceStore, THEME_KEY, load_theme, save_theme};
pub use registry::{RedirectOutcome, WidgetRegistry, WidgetState};
pub use status::{StatusMap, StatusPoller};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ApiCall, CpuBand, HttpMethod, RamBand, RedirectSpec, StatusProbe, SystemStats, Theme, Widget,
    WidgetKind,
};
