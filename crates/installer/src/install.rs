use crate::config::InstallerConfig;
use crate::download::{download_release, DownloadOutcome, DownloadSession, OnChunkFn};
use crate::error::InstallerError;
use crate::replace_binary;
use crate::target::InstallTarget;
use crate::version::{ReleaseFeed, ReleaseVersion};
use starbase_styles::color;
use starbase_utils::fs;
use std::path::{Path, PathBuf};
use system_env::PlatformTarget;
use tracing::{debug, instrument, trace, warn};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InstallPhase {
    Idle,
    Resolving,
    Downloading,
    Installing,
    Installed,
    Failed,
}

#[derive(Debug)]
pub struct InstallOutcome {
    pub version: ReleaseVersion,
    pub binary: PathBuf,
    pub session: DownloadSession,
    /// True if no binary existed at the final path before this run.
    pub fresh: bool,
    /// Companion scripts that were removed after installing.
    pub removed: Vec<PathBuf>,
}

/// Drives a single install: resolve a version, download the matching release
/// artifact, and move it into place. When the requested version has no
/// artifact, the latest release (pre-releases included) is resolved and
/// downloaded instead, exactly once.
pub struct Installer<'app> {
    pub phase: InstallPhase,

    client: reqwest::Client,
    config: &'app InstallerConfig,
    feed: &'app dyn ReleaseFeed,
    on_chunk: Option<OnChunkFn>,
}

impl<'app> Installer<'app> {
    pub fn new(
        config: &'app InstallerConfig,
        client: reqwest::Client,
        feed: &'app dyn ReleaseFeed,
    ) -> Self {
        Installer {
            phase: InstallPhase::Idle,
            client,
            config,
            feed,
            on_chunk: None,
        }
    }

    pub fn on_chunk(mut self, callback: impl Fn(u64, u64) + Send + Sync + 'static) -> Self {
        self.on_chunk = Some(Box::new(callback));
        self
    }

    /// Map the host identifiers to a platform before doing anything else,
    /// so an unsupported platform fails without any network activity.
    pub async fn install_for_host(
        &mut self,
        os: &str,
        arch: &str,
        target: &InstallTarget,
        version: Option<ReleaseVersion>,
    ) -> miette::Result<InstallOutcome> {
        let platform = PlatformTarget::from_host(os, arch).map_err(|error| {
            self.phase = InstallPhase::Failed;
            InstallerError::from(error)
        })?;

        self.install(&platform, target, version).await
    }

    #[instrument(skip(self))]
    pub async fn install(
        &mut self,
        platform: &PlatformTarget,
        target: &InstallTarget,
        version: Option<ReleaseVersion>,
    ) -> miette::Result<InstallOutcome> {
        let result = self.run(platform, target, version).await;

        if result.is_err() {
            self.phase = InstallPhase::Failed;
            remove_best_effort(&target.temp_path);
        }

        Ok(result?)
    }

    async fn run(
        &mut self,
        platform: &PlatformTarget,
        target: &InstallTarget,
        version: Option<ReleaseVersion>,
    ) -> Result<InstallOutcome, InstallerError> {
        let mut version = version;
        let mut include_prerelease = false;
        let mut retried = false;

        let (version, session) = loop {
            let current = match version.take() {
                Some(explicit) => explicit,
                None => {
                    self.phase = InstallPhase::Resolving;
                    self.feed.fetch_latest_version(include_prerelease).await?
                }
            };

            self.phase = InstallPhase::Downloading;

            let session = self.download(platform, target, &current).await?;

            if session.outcome == DownloadOutcome::Completed {
                break (current, session);
            }

            if retried {
                return Err(InstallerError::DownloadNotAvailable {
                    version: current.to_string(),
                    status: session.http_status.to_string(),
                });
            }

            warn!(
                "Release {} is not available for {}, falling back to the latest release",
                color::hash(current.as_str()),
                platform,
            );

            retried = true;
            include_prerelease = true;
        };

        self.phase = InstallPhase::Installing;

        let fresh = !target.final_path.exists();

        // A previous run may have left a relocated binary behind
        remove_best_effort(&target.legacy_path);

        replace_binary(&target.temp_path, &target.final_path, &target.legacy_path)?;

        if target.legacy_path.exists() && fs::remove_file(&target.legacy_path).is_err() {
            debug!("Previous binary is still running, it will be removed on the next run");
        }

        let removed = self.remove_companions(platform, target, fresh);

        self.phase = InstallPhase::Installed;

        debug!(
            version = %version,
            binary = ?target.final_path,
            "Installed devspace"
        );

        Ok(InstallOutcome {
            binary: target.final_path.clone(),
            version,
            session,
            fresh,
            removed,
        })
    }

    async fn download(
        &self,
        platform: &PlatformTarget,
        target: &InstallTarget,
        version: &ReleaseVersion,
    ) -> Result<DownloadSession, InstallerError> {
        let url = self.config.download_url(version, platform);

        // Left over from an interrupted run
        remove_best_effort(&target.temp_path);

        let session = download_release(
            &self.client,
            &url,
            version,
            &target.temp_path,
            self.on_chunk.as_ref(),
        )
        .await?;

        if session.outcome == DownloadOutcome::Missing {
            remove_best_effort(&target.temp_path);
        }

        Ok(session)
    }

    fn remove_companions(
        &self,
        platform: &PlatformTarget,
        target: &InstallTarget,
        fresh: bool,
    ) -> Vec<PathBuf> {
        let mut removed = vec![];

        for path in target.companion_paths(&self.config.binary_name, platform.os, !fresh) {
            if path.exists() && remove_best_effort(&path) {
                removed.push(path);
            }
        }

        removed
    }
}

/// Remove a file if it exists, logging instead of failing. Returns true
/// if the file no longer exists.
pub(crate) fn remove_best_effort(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }

    match fs::remove_file(path) {
        Ok(_) => {
            trace!(file = ?path, "Removed file");
            true
        }
        Err(error) => {
            warn!("Unable to remove {}: {error}", color::path(path));
            false
        }
    }
}
