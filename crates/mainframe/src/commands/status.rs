//! `mainframe status`: one probe round over widgets that declare a status check.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusEntry {
    id: String,
    label: String,
    online: bool,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let dashboard = super::connect(global)?;
    dashboard.load_widgets().await?;

    let statuses = dashboard.probe_statuses().await;
    let widgets = dashboard.registry().widgets();
    let entries: Vec<StatusEntry> = statuses
        .iter()
        .map(|(id, online)| StatusEntry {
            id: id.clone(),
            label: widgets
                .iter()
                .find(|w| &w.id == id)
                .map_or_else(|| id.clone(), |w| w.label.clone()),
            online: *online,
        })
        .collect();

    if entries.is_empty() && !global.quiet {
        eprintln!("No widgets declare a status check.");
    }

    let color = output::should_color(global.color_mode());
    let out = output::render_list(
        global.output_format(),
        &entries,
        |e| StatusRow {
            id: e.id.clone(),
            label: e.label.clone(),
            status: output::status_badge(Some(e.online), color),
        },
        |e| format!("{} {}", e.id, if e.online { "online" } else { "offline" }),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
