//! Theme preference handlers. Never touch the network.

use catalog_core::{Theme, ThemeState};

use crate::cli::{GlobalOpts, ThemeArgs, ThemeCommand};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ThemeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let state = ThemeState::new(catalog_config::load_theme().unwrap_or_default());

    match args.command {
        ThemeCommand::Show => {}
        ThemeCommand::Toggle => {
            let theme = state.toggle();
            catalog_config::save_theme(theme)?;
        }
        ThemeCommand::Set { theme } => {
            state.set(theme.into());
            catalog_config::save_theme(state.get())?;
        }
    }

    let theme = state.get();
    let out = output::render_single(&global.output, &theme, Theme::to_string, Theme::to_string)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
