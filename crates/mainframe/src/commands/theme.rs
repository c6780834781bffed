//! Theme preference commands. These touch only the local state file.

use tabled::Tabled;

use mainframe_config::FilePreferenceStore;
use mainframe_core::{PreferenceStore, THEME_KEY, Theme, load_theme};

use crate::cli::{GlobalOpts, ThemeArgs, ThemeCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ThemeRow {
    #[tabled(rename = "Theme")]
    name: String,
    #[tabled(rename = "Active")]
    active: String,
}

pub fn handle(args: &ThemeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = FilePreferenceStore::default_location();
    tracing::debug!(path = %store.path().display(), "theme state file");

    match args.command {
        ThemeCommand::Get => {
            output::print_output(load_theme(&store).as_ref(), global.quiet);
            Ok(())
        }

        ThemeCommand::Set { ref name } => {
            let theme = parse_theme(name)?;
            store_theme(&store, theme)?;
            output::print_output(theme.as_ref(), global.quiet);
            Ok(())
        }

        ThemeCommand::Next => {
            let theme = load_theme(&store).next();
            store_theme(&store, theme)?;
            output::print_output(theme.as_ref(), global.quiet);
            Ok(())
        }

        ThemeCommand::List => {
            let current = load_theme(&store);
            let out = output::render_list(
                global.output_format(),
                &Theme::ALL,
                |t| ThemeRow {
                    name: t.to_string(),
                    active: if *t == current { "*".into() } else { String::new() },
                },
                ToString::to_string,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn parse_theme(name: &str) -> Result<Theme, CliError> {
    Theme::from_stored(name).ok_or_else(|| CliError::Validation {
        field: "theme".into(),
        reason: format!(
            "unknown theme '{name}', expected one of: {}",
            Theme::ALL.map(|t| t.to_string()).join(", ")
        ),
    })
}

/// Unlike the dashboard's own persistence, write failures are reported here.
fn store_theme(store: &dyn PreferenceStore, theme: Theme) -> Result<(), CliError> {
    store.set(THEME_KEY, theme.as_ref())?;
    Ok(())
}
