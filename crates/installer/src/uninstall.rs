use crate::config::InstallerConfig;
use crate::install::remove_best_effort;
use crate::target::InstallTarget;
use starbase_styles::color;
use starbase_utils::fs;
use std::path::PathBuf;
use system_env::SystemOS;
use tracing::{debug, instrument, warn};

/// Asks the user a yes/no question.
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> miette::Result<bool>;
}

/// How the current invocation was started.
#[derive(Clone, Copy, Debug, Default)]
pub struct UninstallContext {
    /// A package manager is updating the package, nobody can answer prompts.
    pub automated: bool,

    /// Standard input and output are attached to a terminal.
    pub interactive: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigRemoval {
    Removed,
    Declined,
    Missing,
    SkippedAutomated,
    SkippedNonInteractive,
    Failed,
}

#[derive(Debug)]
pub struct UninstallReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    pub config: ConfigRemoval,
}

pub struct UninstallManager<'app> {
    config: &'app InstallerConfig,
    prompt: &'app dyn ConfirmPrompt,
}

impl<'app> UninstallManager<'app> {
    pub fn new(config: &'app InstallerConfig, prompt: &'app dyn ConfirmPrompt) -> Self {
        UninstallManager { config, prompt }
    }

    /// Remove every installed artifact, then offer to remove the user's
    /// configuration. A missing `target` (the install directory couldn't be
    /// resolved) still removes the fallback directory copy.
    #[instrument(skip(self))]
    pub fn uninstall(
        &self,
        target: Option<&InstallTarget>,
        os: SystemOS,
        context: &UninstallContext,
    ) -> UninstallReport {
        let mut report = UninstallReport {
            removed: vec![],
            failed: vec![],
            config: ConfigRemoval::Missing,
        };

        for path in self.collect_artifacts(target, os) {
            if !path.exists() {
                continue;
            }

            if remove_best_effort(&path) {
                report.removed.push(path);
            } else {
                report.failed.push(path);
            }
        }

        report.config = self.remove_config_dir(context);

        if report.config == ConfigRemoval::Failed {
            report.failed.push(self.config.config_dir.clone());
        }

        report
    }

    fn collect_artifacts(&self, target: Option<&InstallTarget>, os: SystemOS) -> Vec<PathBuf> {
        let mut paths = vec![];

        if let Some(target) = target {
            paths.push(target.final_path.clone());
            paths.push(target.temp_path.clone());
            paths.push(target.legacy_path.clone());
            paths.extend(target.companion_paths(&self.config.binary_name, os, true));
        }

        let fallback = InstallTarget::new(&self.config.fallback_bin_dir, &self.config.binary_name, os);

        if !paths.contains(&fallback.final_path) {
            paths.push(fallback.final_path);
        }

        paths
    }

    fn remove_config_dir(&self, context: &UninstallContext) -> ConfigRemoval {
        let dir = &self.config.config_dir;

        if !dir.exists() {
            return ConfigRemoval::Missing;
        }

        if context.automated {
            warn!(
                "Keeping configuration in {} as devspace is being updated by a package manager",
                color::path(dir)
            );

            return ConfigRemoval::SkippedAutomated;
        }

        if !context.interactive {
            warn!(
                "Keeping configuration in {} as there is no terminal to confirm its removal",
                color::path(dir)
            );

            return ConfigRemoval::SkippedNonInteractive;
        }

        let message = format!("Remove devspace configuration in {}?", color::path(dir));

        match self.prompt.confirm(&message) {
            Ok(true) => {}
            Ok(false) => {
                debug!(dir = ?dir, "Keeping configuration directory");

                return ConfigRemoval::Declined;
            }
            Err(error) => {
                warn!("Unable to prompt for confirmation, keeping configuration: {error}");

                return ConfigRemoval::Declined;
            }
        };

        match fs::remove_dir_all(dir) {
            Ok(_) => {
                debug!(dir = ?dir, "Removed configuration directory");

                ConfigRemoval::Removed
            }
            Err(error) => {
                warn!("Unable to remove {}: {error}", color::path(dir));

                ConfigRemoval::Failed
            }
        }
    }
}
