// ── Widget domain types ──
//
// A closed set of widget kinds. Unrecognized `type` tags are kept as
// `WidgetKind::Unknown` so consumers match exhaustively instead of
// silently rendering them as something else.

use serde::Serialize;
use strum::{Display, EnumString};

/// HTTP method for redirect pre-flight calls and status probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<HttpMethod> for mainframe_api::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A dashboard tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    /// Stable key for status and toggle updates. Expected to be unique.
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: WidgetKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WidgetKind {
    /// Fire-and-forget POST.
    Action { endpoint: Option<String> },
    /// Read-only value rendered by the backend.
    Stat { value: String },
    /// POST `{enabled}`; state follows confirmed changes only.
    Toggle {
        endpoint: Option<String>,
        #[serde(rename = "toggleState")]
        toggle_state: bool,
    },
    /// Optional pre-flight call, then open a URL.
    RedirectButton(RedirectSpec),
    /// A `type` tag this build doesn't know.
    Unknown {
        #[serde(rename = "typeName")]
        type_name: String,
    },
}

impl WidgetKind {
    /// The wire tag for this kind.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Action { .. } => "action",
            Self::Stat { .. } => "stat",
            Self::Toggle { .. } => "toggle",
            Self::RedirectButton(_) => "redirectButton",
            Self::Unknown { type_name } => type_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectSpec {
    pub button_text: Option<String>,
    pub redirect_url: Option<String>,
    pub api: Option<ApiCall>,
    pub status: Option<StatusProbe>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiCall {
    pub endpoint: String,
    pub method: HttpMethod,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusProbe {
    pub endpoint: String,
    pub method: HttpMethod,
}

impl Widget {
    /// The status probe, for redirect buttons that declare one.
    pub fn status_probe(&self) -> Option<&StatusProbe> {
        match &self.kind {
            WidgetKind::RedirectButton(spec) => spec.status.as_ref(),
            _ => None,
        }
    }

    /// Text for the clickable part of the tile.
    pub fn button_text(&self) -> &str {
        match &self.kind {
            WidgetKind::RedirectButton(RedirectSpec {
                button_text: Some(text),
                ..
            }) => text,
            _ => &self.label,
        }
    }
}
