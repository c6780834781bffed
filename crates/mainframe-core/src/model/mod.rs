// ── Domain model ──
//
// Types consumers render. Wire shapes live in `mainframe_api::models`;
// `crate::convert` bridges the two.

pub mod band;
pub mod system;
pub mod theme;
pub mod widget;

pub use band::{CpuBand, RamBand};
pub use system::SystemStats;
pub use theme::Theme;
pub use widget::{ApiCall, HttpMethod, RedirectSpec, StatusProbe, Widget, WidgetKind};
