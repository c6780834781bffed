// Dashboard API response types
//
// Wire models for `/api/system`, `/api/buttons` and widget status probes.
// Widget descriptors come from a hand-edited YAML file on the backend, so
// every variant-specific field is optional and ids may arrive as numbers.

use serde::{Deserialize, Deserializer, Serialize};

// ── System ───────────────────────────────────────────────────────────

/// Snapshot from `GET /api/system`.
///
/// Percentages are `0..=100`; the backend sends integers, which decode fine into `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub cpu_usage: f64,
    pub ram_usage: f64,
    pub ram_used: String,
    pub ram_total: String,
}

// ── Widgets ──────────────────────────────────────────────────────────

/// One entry of the `GET /api/buttons` array.
///
/// The `type` tag stays a raw string here; `mainframe-core` turns it into a
/// closed enum and keeps unrecognized tags as an explicit variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDescriptor {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub widget_type: String,
    #[serde(default)]
    pub label: String,

    // stat
    #[serde(default)]
    pub value: Option<serde_json::Value>,

    // action / toggle
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub toggle_state: Option<bool>,

    // redirectButton
    #[serde(default)]
    pub button_text: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub api_endpoint: Option<String>,
    #[serde(default)]
    pub api_method: Option<String>,
    #[serde(default)]
    pub api_data: Option<serde_json::Value>,
    #[serde(default)]
    pub status_api_endpoint: Option<String>,
    #[serde(default)]
    pub status_api_method: Option<String>,
}

/// Body returned by a widget's status endpoint. A missing `online` means offline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub online: Option<bool>,
}

/// Body posted to a toggle endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToggleRequest {
    pub enabled: bool,
}

/// Accept `"id": "cpu"` as well as `"id": 3`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn system_stats_accepts_integer_percentages() {
        let stats: SystemStats = serde_json::from_value(json!({
            "cpuUsage": 92,
            "ramUsage": 50,
            "ramUsed": "4GB",
            "ramTotal": "8GB"
        }))
        .unwrap();
        assert!((stats.cpu_usage - 92.0).abs() < f64::EPSILON);
        assert_eq!(stats.ram_total, "8GB");
    }

    #[test]
    fn redirect_descriptor_decodes_camel_case_fields() {
        let widget: WidgetDescriptor = serde_json::from_value(json!({
            "id": "webui",
            "type": "redirectButton",
            "label": "Web UI",
            "buttonText": "Open",
            "redirectUrl": "https://example.test",
            "apiEndpoint": "/get-webui",
            "apiData": {"wake": true},
            "statusApiEndpoint": "/status/10.0.0.2"
        }))
        .unwrap();
        assert_eq!(widget.widget_type, "redirectButton");
        assert_eq!(widget.api_endpoint.as_deref(), Some("/get-webui"));
        assert_eq!(widget.status_api_method, None);
        assert_eq!(widget.api_data, Some(json!({"wake": true})));
    }

    #[test]
    fn numeric_id_is_stringified() {
        let widget: WidgetDescriptor =
            serde_json::from_value(json!({"id": 7, "type": "stat", "label": "Uptime"})).unwrap();
        assert_eq!(widget.id, "7");
    }

    #[test]
    fn status_without_online_field() {
        let status: StatusResponse = serde_json::from_value(json!({"state": "up"})).unwrap();
        assert_eq!(status.online, None);
    }
}
