//! Config command handlers.

use dialoguer::{Confirm, Input};
use serde::Serialize;

use mainframe_config::{self as config, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::prompt_err;

#[derive(Debug, Serialize)]
struct Paths {
    config: String,
    state: String,
    log: String,
}

fn config_detail(cfg: &Config) -> String {
    [
        format!("URL:              {}", cfg.url),
        format!("API prefix:       {}", cfg.api_prefix),
        format!("Insecure TLS:     {}", cfg.insecure),
        format!(
            "CA certificate:   {}",
            cfg.ca_cert
                .as_ref()
                .map_or_else(|| "-".into(), |p| p.display().to_string())
        ),
        format!(
            "Timeout:          {}",
            cfg.timeout.map_or_else(|| "none".into(), |t| format!("{t}s"))
        ),
        format!("Metrics interval: {}ms", cfg.polling.metrics_ms),
        format!("Status interval:  {}ms", cfg.polling.status_ms),
    ]
    .join("\n")
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global.config.clone().unwrap_or_else(config::config_path);

    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            eprintln!("mainframe configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            let defaults = Config::default();

            let url: String = Input::new()
                .with_prompt("Backend URL")
                .default(defaults.url.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let api_prefix: String = Input::new()
                .with_prompt("API prefix")
                .default(defaults.api_prefix.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let insecure = url.starts_with("https")
                && Confirm::new()
                    .with_prompt("Accept self-signed certificates?")
                    .default(false)
                    .interact()
                    .map_err(prompt_err)?;

            let metrics_ms: u64 = Input::new()
                .with_prompt("Metrics refresh (ms)")
                .default(defaults.polling.metrics_ms)
                .interact_text()
                .map_err(prompt_err)?;

            let status_ms: u64 = Input::new()
                .with_prompt("Status refresh (ms)")
                .default(defaults.polling.status_ms)
                .interact_text()
                .map_err(prompt_err)?;

            let mut cfg = Config {
                url,
                api_prefix,
                insecure,
                ..defaults
            };
            cfg.polling.metrics_ms = metrics_ms;
            cfg.polling.status_ms = status_ms;

            // Reject values the dashboard would refuse before writing them.
            config::to_dashboard_config(&cfg)?;
            config::save_config_to(&cfg, &path)?;
            eprintln!("\nConfiguration saved to {}", path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = super::resolve_config(global)?;
            let out = output::render_single(global.output_format(), &cfg, config_detail, |c| c.url.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let paths = Paths {
                config: path.display().to_string(),
                state: config::state_path().display().to_string(),
                log: config::log_path().display().to_string(),
            };
            let out = output::render_single(
                global.output_format(),
                &paths,
                |p| format!("Config: {}\nState:  {}\nLog:    {}", p.config, p.state, p.log),
                |p| p.config.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
