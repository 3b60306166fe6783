use devspace_installer::ConfirmPrompt;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use miette::IntoDiagnostic;
use std::time::Duration;

pub fn create_progress_bar<S: AsRef<str>>(start: S) -> miette::Result<ProgressBar> {
    let pb = ProgressBar::new(0);

    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(start.as_ref().to_owned());
    pb.set_style(
        ProgressStyle::with_template("{bar:80.183/black} | {bytes:>10} / {total_bytes:<10} | {msg}")
            .into_diagnostic()?
            .progress_chars("━╾─"),
    );

    Ok(pb)
}

/// Confirms with the user through the terminal.
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> miette::Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(false)
            .interact()
            .into_diagnostic()
    }
}
