//! Widget command handlers.

use std::sync::Arc;

use tabled::Tabled;

use mainframe_core::{
    Dashboard, Launcher, RecordingLauncher, RedirectOutcome, SystemLauncher, Widget, WidgetKind,
};

use crate::cli::{GlobalOpts, SwitchState, WidgetsArgs, WidgetsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WidgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&Widget> for WidgetRow {
    fn from(w: &Widget) -> Self {
        Self {
            id: w.id.clone(),
            label: w.label.clone(),
            kind: w.kind.type_name().to_owned(),
            detail: summary(w),
        }
    }
}

/// Short per-kind description for the list view.
fn summary(w: &Widget) -> String {
    match w.kind {
        WidgetKind::Action { ref endpoint } => endpoint.clone().unwrap_or_else(|| "-".into()),
        WidgetKind::Stat { ref value } => value.clone(),
        WidgetKind::Toggle { toggle_state, .. } => on_off(toggle_state).into(),
        WidgetKind::RedirectButton(ref spec) => spec
            .redirect_url
            .clone()
            .or_else(|| spec.api.as_ref().map(|a| format!("{} {}", a.method, a.endpoint)))
            .unwrap_or_else(|| "-".into()),
        WidgetKind::Unknown { .. } => "-".into(),
    }
}

fn on_off(state: bool) -> &'static str {
    if state { "on" } else { "off" }
}

fn detail(w: &Widget) -> String {
    let mut lines = vec![
        format!("ID:       {}", w.id),
        format!("Label:    {}", w.label),
        format!("Type:     {}", w.kind.type_name()),
    ];
    match w.kind {
        WidgetKind::Action { ref endpoint } | WidgetKind::Toggle { ref endpoint, .. } => {
            lines.push(format!("Endpoint: {}", endpoint.as_deref().unwrap_or("-")));
        }
        WidgetKind::Stat { ref value } => lines.push(format!("Value:    {value}")),
        WidgetKind::RedirectButton(ref spec) => {
            lines.push(format!("Button:   {}", w.button_text()));
            lines.push(format!(
                "Opens:    {}",
                spec.redirect_url.as_deref().unwrap_or("-")
            ));
            if let Some(ref api) = spec.api {
                lines.push(format!("Calls:    {} {}", api.method, api.endpoint));
            }
        }
        WidgetKind::Unknown { .. } => {}
    }
    if let WidgetKind::Toggle { toggle_state, .. } = w.kind {
        lines.push(format!("State:    {}", on_off(toggle_state)));
    }
    if let Some(probe) = w.status_probe() {
        lines.push(format!("Status:   {} {}", probe.method, probe.endpoint));
    }
    lines.join("\n")
}

fn find(dashboard: &Dashboard, id: &str) -> Result<Widget, CliError> {
    dashboard
        .registry()
        .get(id)
        .ok_or_else(|| CliError::NotFound { id: id.to_owned() })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: WidgetsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        WidgetsCommand::List => {
            let dashboard = super::connect(global)?;
            dashboard.load_widgets().await?;
            let widgets = dashboard.registry().widgets();
            let out = output::render_list(
                global.output_format(),
                widgets.as_slice(),
                |w| WidgetRow::from(w),
                |w| w.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WidgetsCommand::Get { id } => {
            let dashboard = super::connect(global)?;
            dashboard.load_widgets().await?;
            let widget = find(&dashboard, &id)?;
            let out = output::render_single(global.output_format(), &widget, detail, |w| w.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WidgetsCommand::Run { id, no_open } => run(&id, no_open, global).await,

        WidgetsCommand::Toggle { id, state } => toggle(&id, state, global).await,
    }
}

async fn run(id: &str, no_open: bool, global: &GlobalOpts) -> Result<(), CliError> {
    // --no-open records the target instead of spawning a browser.
    let launcher: Arc<dyn Launcher> = if no_open {
        Arc::new(RecordingLauncher::new())
    } else {
        Arc::new(SystemLauncher)
    };
    let dashboard = super::connect_with(global, launcher)?;
    dashboard.load_widgets().await?;
    let widget = find(&dashboard, id)?;

    let result = match widget.kind {
        WidgetKind::RedirectButton(_) => {
            super::with_spinner(
                format!("Contacting {}...", widget.label),
                global.quiet,
                dashboard.invoke_redirect(id),
            )
            .await
        }
        _ => super::with_spinner(
            format!("Running {}...", widget.label),
            global.quiet,
            dashboard.invoke(id),
        )
        .await
        .map(|()| RedirectOutcome::Called),
    };
    super::report_notifications(&dashboard, global.quiet).await;

    if let RedirectOutcome::Opened { url } = result? {
        if no_open {
            output::print_output(&url, global.quiet);
        } else if !global.quiet {
            eprintln!("Opened {url}");
        }
    }
    Ok(())
}

async fn toggle(id: &str, state: Option<SwitchState>, global: &GlobalOpts) -> Result<(), CliError> {
    let dashboard = super::connect(global)?;
    dashboard.load_widgets().await?;
    let widget = find(&dashboard, id)?;

    let WidgetKind::Toggle { toggle_state, .. } = widget.kind else {
        return Err(CliError::WrongKind {
            id: id.to_owned(),
            expected: "toggle".into(),
            actual: widget.kind.type_name().to_owned(),
        });
    };
    let desired = state.map_or(!toggle_state, |s| s == SwitchState::On);

    let result = dashboard.invoke_toggle(id, desired).await;
    super::report_notifications(&dashboard, global.quiet).await;
    result?;

    let updated = find(&dashboard, id)?;
    let out = output::render_single(global.output_format(), &updated, detail, |w| {
        match w.kind {
            WidgetKind::Toggle { toggle_state, .. } => on_off(toggle_state).to_owned(),
            _ => String::new(),
        }
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
