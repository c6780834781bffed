// mainframe-api: Async Rust client for the Mainframe dashboard HTTP API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::MainframeClient;
pub use error::Error;
pub use models::{StatusResponse, SystemStats, WidgetDescriptor};
pub use reqwest::Method;
pub use transport::{TlsMode, TransportConfig};
