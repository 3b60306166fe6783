mod app;
mod commands;
mod helpers;
mod session;

use app::{App as CLI, Commands, LogLevel};
use clap::Parser;
use session::InstallerSession;
use std::env;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FILTER_MODULES: [&str; 3] = ["devspace_installer", "devspace_installer_cli", "system_env"];

fn setup_tracing(cli: &CLI) {
    let level = cli.log.unwrap_or(match cli.command {
        // Output is captured by package scripts
        Commands::GetTag => LogLevel::Warn,
        Commands::Noop => LogLevel::Off,
        _ => LogLevel::Info,
    });

    let directives = FILTER_MODULES
        .iter()
        .map(|module| format!("{module}={}", level.as_directive()))
        .collect::<Vec<_>>()
        .join(",");

    tracing_subscriber::registry()
        .with(EnvFilter::new(directives))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> miette::Result<ExitCode> {
    miette::set_panic_hook();

    let cli = CLI::parse();

    setup_tracing(&cli);

    debug!(
        args = ?env::args().collect::<Vec<_>>(),
        "Running devspace-installer v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Must succeed even when the environment is incomplete
    if matches!(cli.command, Commands::Noop) {
        return Ok(ExitCode::SUCCESS);
    }

    let session = InstallerSession::new()?;

    let code = match cli.command {
        Commands::Noop => Ok(None),
        Commands::UpdateVersion => commands::update_version(session).await,
        Commands::GetTag => commands::get_tag(session).await,
        Commands::Install(args) => commands::install(session, args).await,
        Commands::Uninstall => commands::uninstall(session).await,
        Commands::FinishInstall(args) => commands::finish_install(session, args).await,
    }?;

    Ok(ExitCode::from(code.unwrap_or(0)))
}
