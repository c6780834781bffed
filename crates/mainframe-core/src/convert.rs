// ── Wire → domain conversion ──
//
// Turns `mainframe_api` payloads into the closed domain types. Blank
// strings count as absent, and an unparseable method falls back to the
// field's default with a warning.

use std::collections::HashSet;

use chrono::Utc;
use mainframe_api::WidgetDescriptor;
use tracing::warn;

use crate::model::{ApiCall, HttpMethod, RedirectSpec, StatusProbe, SystemStats, Widget, WidgetKind};

impl From<mainframe_api::SystemStats> for SystemStats {
    fn from(raw: mainframe_api::SystemStats) -> Self {
        Self {
            cpu_usage: raw.cpu_usage,
            ram_usage: raw.ram_usage,
            ram_used: raw.ram_used,
            ram_total: raw.ram_total,
            fetched_at: Utc::now(),
        }
    }
}

/// Convert a widget list, warning once per duplicated id.
pub fn widgets_from_descriptors(descriptors: Vec<WidgetDescriptor>) -> Vec<Widget> {
    let mut seen = HashSet::with_capacity(descriptors.len());
    descriptors
        .into_iter()
        .map(|d| {
            if !seen.insert(d.id.clone()) {
                warn!(id = %d.id, "duplicate widget id; status and toggle updates will collide");
            }
            Widget::from(d)
        })
        .collect()
}

impl From<WidgetDescriptor> for Widget {
    fn from(d: WidgetDescriptor) -> Self {
        let kind = match d.widget_type.as_str() {
            "action" => WidgetKind::Action {
                endpoint: non_blank(d.endpoint),
            },
            "stat" => WidgetKind::Stat {
                value: stat_value(d.value),
            },
            "toggle" => WidgetKind::Toggle {
                endpoint: non_blank(d.endpoint),
                toggle_state: d.toggle_state.unwrap_or(false),
            },
            "redirectButton" => {
                let api = non_blank(d.api_endpoint).map(|endpoint| ApiCall {
                    endpoint,
                    method: parse_method(d.api_method.as_deref(), HttpMethod::Post, &d.id),
                    data: d.api_data,
                });
                let status = non_blank(d.status_api_endpoint).map(|endpoint| StatusProbe {
                    endpoint,
                    method: parse_method(d.status_api_method.as_deref(), HttpMethod::Get, &d.id),
                });
                WidgetKind::RedirectButton(RedirectSpec {
                    button_text: non_blank(d.button_text),
                    redirect_url: non_blank(d.redirect_url),
                    api,
                    status,
                })
            }
            other => WidgetKind::Unknown {
                type_name: other.to_owned(),
            },
        };

        Self {
            id: d.id,
            label: d.label,
            kind,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn stat_value(value: Option<serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => "-".into(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

fn parse_method(raw: Option<&str>, default: HttpMethod, id: &str) -> HttpMethod {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };
    raw.parse().unwrap_or_else(|_| {
        warn!(id, method = raw, "unsupported HTTP method, using {default}");
        default
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn descriptor(value: serde_json::Value) -> WidgetDescriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn redirect_defaults_methods() {
        let widget = Widget::from(descriptor(json!({
            "id": "ai",
            "type": "redirectButton",
            "label": "AI",
            "redirectUrl": "https://ai.local",
            "apiEndpoint": "/start-ki-server",
            "statusApiEndpoint": "/status/10.0.0.22"
        })));
        let WidgetKind::RedirectButton(spec) = widget.kind else {
            panic!("expected redirect button");
        };
        assert_eq!(spec.api.unwrap().method, HttpMethod::Post);
        assert_eq!(spec.status.unwrap().method, HttpMethod::Get);
    }

    #[test]
    fn methods_parse_case_insensitively() {
        let widget = Widget::from(descriptor(json!({
            "id": "x",
            "type": "redirectButton",
            "label": "X",
            "apiEndpoint": "/x",
            "apiMethod": "put",
            "statusApiEndpoint": "/s",
            "statusApiMethod": "bogus"
        })));
        let WidgetKind::RedirectButton(spec) = widget.kind else {
            panic!("expected redirect button");
        };
        assert_eq!(spec.api.unwrap().method, HttpMethod::Put);
        assert_eq!(spec.status.unwrap().method, HttpMethod::Get);
    }

    #[test]
    fn blank_endpoint_counts_as_missing() {
        let widget = Widget::from(descriptor(json!({
            "id": "a", "type": "action", "label": "A", "endpoint": "  "
        })));
        assert_eq!(widget.kind, WidgetKind::Action { endpoint: None });
    }

    #[test]
    fn unknown_type_is_preserved() {
        let widget = Widget::from(descriptor(json!({
            "id": "g", "type": "gauge", "label": "Gauge"
        })));
        assert_eq!(
            widget.kind,
            WidgetKind::Unknown {
                type_name: "gauge".into()
            }
        );
        assert_eq!(widget.kind.type_name(), "gauge");
    }

    #[test]
    fn stat_values_render_as_text() {
        let number = Widget::from(descriptor(json!({
            "id": "n", "type": "stat", "label": "N", "value": 42
        })));
        let missing = Widget::from(descriptor(json!({
            "id": "m", "type": "stat", "label": "M"
        })));
        assert_eq!(number.kind, WidgetKind::Stat { value: "42".into() });
        assert_eq!(missing.kind, WidgetKind::Stat { value: "-".into() });
    }

    #[test]
    fn toggle_state_defaults_to_off() {
        let widget = Widget::from(descriptor(json!({
            "id": "t", "type": "toggle", "label": "T", "endpoint": "/maint"
        })));
        assert_eq!(
            widget.kind,
            WidgetKind::Toggle {
                endpoint: Some("/maint".into()),
                toggle_state: false
            }
        );
    }

    #[test]
    fn duplicates_are_kept() {
        let widgets = widgets_from_descriptors(vec![
            descriptor(json!({"id": "d", "type": "stat", "label": "one"})),
            descriptor(json!({"id": "d", "type": "stat", "label": "two"})),
        ]);
        assert_eq!(widgets.len(), 2);
    }
}
