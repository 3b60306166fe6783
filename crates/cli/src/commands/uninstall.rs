use crate::helpers::TerminalPrompt;
use crate::session::{AppResult, InstallerSession};
use devspace_installer::{ConfigRemoval, InstallerError, UninstallContext, UninstallManager};
use starbase_styles::color;
use system_env::SystemOS;
use tracing::{debug, info, warn};

pub async fn uninstall(session: InstallerSession) -> AppResult {
    let os = SystemOS::from_env().map_err(InstallerError::from)?;

    let target = match session.locate_target(os) {
        Ok(target) => Some(target),
        Err(error) => {
            warn!("Unable to locate the devspace install directory: {error}");
            None
        }
    };

    let context = UninstallContext {
        automated: session.is_automated_update(),
        interactive: session.is_interactive(),
    };

    let report = UninstallManager::new(&session.config, &TerminalPrompt).uninstall(
        target.as_ref(),
        os,
        &context,
    );

    for path in &report.removed {
        debug!(file = ?path, "Removed");
    }

    for path in &report.failed {
        warn!("Failed to remove {}", color::path(path));
    }

    if report.config == ConfigRemoval::Removed {
        info!(
            "Removed devspace configuration {}",
            color::path(&session.config.config_dir)
        );
    }

    if report.removed.is_empty() {
        info!("No devspace installation found");
    } else {
        info!("Uninstalled devspace");
    }

    Ok(None)
}
