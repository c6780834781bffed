// Dashboard API HTTP client
//
// Wraps `reqwest::Client` with URL construction under the configured API
// prefix, status checking, and JSON decoding with body previews on failure.
// Widget endpoints are caller-supplied strings resolved through `resolve`.

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{StatusResponse, SystemStats, ToggleRequest, WidgetDescriptor};
use crate::transport::TransportConfig;

/// Default path prefix the dashboard backend is mounted under.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Raw HTTP client for the dashboard backend.
///
/// Every request method checks for a 2xx status; anything else becomes
/// `Error::Status` with a truncated body.
#[derive(Debug, Clone)]
pub struct MainframeClient {
    http: reqwest::Client,
    base_url: Url,
    api_prefix: String,
}

impl MainframeClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:5000`); API
    /// paths are built as `{base_url}{api_prefix}/{path}`.
    pub fn new(base_url: Url, api_prefix: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, api_prefix))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, api_prefix: &str) -> Self {
        Self {
            http,
            base_url,
            api_prefix: api_prefix.trim_end_matches('/').to_owned(),
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}{prefix}/{path}`.
    pub fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}{}/{path}", self.api_prefix))?)
    }

    /// Resolve a widget-declared endpoint.
    ///
    /// Absolute `http(s)://` URLs are used as-is; everything else is treated
    /// as a path under the API prefix.
    pub fn resolve(&self, endpoint: &str) -> Result<Url, Error> {
        let endpoint = endpoint.trim();
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Ok(Url::parse(endpoint)?);
        }
        self.api_url(endpoint)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /api/system`
    pub async fn system_stats(&self) -> Result<SystemStats, Error> {
        let url = self.api_url("system")?;
        self.get_json(url).await
    }

    /// `GET /api/buttons`
    pub async fn widgets(&self) -> Result<Vec<WidgetDescriptor>, Error> {
        let url = self.api_url("buttons")?;
        self.get_json(url).await
    }

    /// POST with no body (action widgets). Any 2xx is success.
    pub async fn trigger(&self, url: Url) -> Result<(), Error> {
        debug!("POST {}", url);
        let resp = self.http.post(url).send().await?;
        Self::check_status(resp).await.map(drop)
    }

    /// POST `{"enabled": <bool>}` (toggle widgets).
    pub async fn set_toggle(&self, url: Url, enabled: bool) -> Result<(), Error> {
        debug!("POST {} enabled={}", url, enabled);
        let resp = self
            .http
            .post(url)
            .json(&ToggleRequest { enabled })
            .send()
            .await?;
        Self::check_status(resp).await.map(drop)
    }

    /// Arbitrary pre-flight call with an optional JSON body (redirect widgets).
    pub async fn call(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<(), Error> {
        debug!("{} {}", method, url);
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        Self::check_status(resp).await.map(drop)
    }

    /// Probe a widget's status endpoint.
    pub async fn probe_status(&self, method: Method, url: Url) -> Result<StatusResponse, Error> {
        debug!("{} {} (status)", method, url);
        let resp = self.http.request(method, url).send().await?;
        let resp = Self::check_status(resp).await?;
        Self::parse_json(resp).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        let resp = Self::check_status(resp).await?;
        Self::parse_json(resp).await
    }

    async fn check_status(resp: Response) -> Result<Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Status {
            status: status.as_u16(),
            body: preview(&body).to_owned(),
        })
    }

    async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// First 200 bytes of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
