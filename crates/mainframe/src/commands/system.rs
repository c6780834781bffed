//! `mainframe system`: one metrics snapshot.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use mainframe_core::{CpuBand, RamBand, SystemStats};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

const BAR_WIDTH: usize = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SystemView {
    cpu_usage: f64,
    cpu_band: CpuBand,
    ram_usage: f64,
    ram_band: RamBand,
    ram_used: String,
    ram_total: String,
    fetched_at: DateTime<Utc>,
}

impl From<&SystemStats> for SystemView {
    fn from(s: &SystemStats) -> Self {
        Self {
            cpu_usage: s.cpu_usage,
            cpu_band: s.cpu_band(),
            ram_usage: s.ram_usage,
            ram_band: s.ram_band(),
            ram_used: s.ram_used.clone(),
            ram_total: s.ram_total.clone(),
            fetched_at: s.fetched_at,
        }
    }
}

fn detail(v: &SystemView, color: bool) -> String {
    [
        format!(
            "CPU:     {:>5.1}% {} {}",
            v.cpu_usage,
            output::usage_bar(v.cpu_usage, BAR_WIDTH),
            output::cpu_band(v.cpu_band, color)
        ),
        format!(
            "RAM:     {:>5.1}% {} {}",
            v.ram_usage,
            output::usage_bar(v.ram_usage, BAR_WIDTH),
            output::ram_band(v.ram_band, color)
        ),
        format!("Memory:  {} / {}", v.ram_used, v.ram_total),
        format!(
            "Fetched: {}",
            v.fetched_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
        ),
    ]
    .join("\n")
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let dashboard = super::connect(global)?;
    let stats = dashboard.system_stats().await?;
    let view = SystemView::from(&stats);
    let color = output::should_color(global.color_mode());

    let out = output::render_single(
        global.output_format(),
        &view,
        |v| detail(v, color),
        |v| format!("{:.1} {:.1}", v.cpu_usage, v.ram_usage),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
