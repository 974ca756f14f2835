//! Command dispatch: bridges CLI args -> catalog-core -> output formatting.

pub mod config_cmd;
pub mod products;
pub mod theme;
pub mod util;

use catalog_core::Catalog;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, catalog: &Catalog, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Products(args) => products::handle(catalog, args, global).await,
        // Config, Theme and Completions are handled before dispatch
        Command::Config(_) | Command::Theme(_) | Command::Completions(_) => {
            Err(CliError::Internal {
                message: "command does not need a backend".into(),
            })
        }
    }
}
