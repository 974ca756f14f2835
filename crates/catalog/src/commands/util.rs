//! Shared helpers for command handlers.

use std::io::IsTerminal;

use catalog_core::{Catalog, ModalOptions, NotificationKind};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Answer the next confirmation question raised on the catalog's gate.
///
/// `--yes` confirms without asking. Without a terminal the question is
/// cancelled and the caller gets [`CliError::NonInteractiveRequiresYes`].
pub async fn answer_confirmation(
    catalog: &Catalog,
    action: &str,
    yes_flag: bool,
) -> Result<(), CliError> {
    let gate = catalog.modal();
    let mut pending = gate.subscribe();
    let options = loop {
        if let Some(options) = pending.latest() {
            break options;
        }
        match pending.changed().await {
            Some(Some(options)) => break options,
            Some(None) => {}
            None => return Ok(()),
        }
    };

    if yes_flag {
        gate.confirm();
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        gate.cancel();
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }

    let answer = tokio::task::spawn_blocking(move || prompt(&options))
        .await
        .map_err(|e| CliError::Internal {
            message: format!("confirmation prompt panicked: {e}"),
        })?;

    match answer {
        Ok(true) => {
            gate.confirm();
            Ok(())
        }
        Ok(false) => {
            gate.cancel();
            Ok(())
        }
        Err(e) => {
            gate.cancel();
            Err(e)
        }
    }
}

fn prompt(options: &ModalOptions) -> Result<bool, CliError> {
    eprintln!("{}", options.title);
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "{} [{} / {}]",
            options.message, options.confirm_text, options.cancel_text
        ))
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Print queued notifications to stderr.
///
/// Errors are skipped: they reach the user through the returned `CliError`.
pub fn print_notifications(catalog: &Catalog, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    let color = output::should_color(&global.color);
    for n in catalog.notifications().snapshot().iter() {
        if n.kind != NotificationKind::Error {
            eprintln!("{}", output::notification_line(n, color));
        }
    }
}
