use crate::error::InstallerError;
use crate::version::ReleaseVersion;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use system_env::PlatformTarget;
use tracing::{debug, warn};

pub const DEFAULT_RELEASE_HOST: &str = "https://github.com";
pub const DEFAULT_REPOSITORY: &str = "covexo/devspace";

/// Immutable settings for a single installer run. Constructed once at process
/// start and passed to each resolver, instead of being read from ambient state.
#[derive(Clone, Debug)]
pub struct InstallerConfig {
    /// Name of the installed binary, without extension.
    pub binary_name: String,

    /// Directory holding persisted user configuration (~/.devspace).
    pub config_dir: PathBuf,

    /// System directory used when no package manager directory is usable.
    pub fallback_bin_dir: PathBuf,

    /// Path to the version metadata record (package.json).
    pub manifest_path: PathBuf,

    /// Name of the package as published to the npm registry.
    pub package_name: String,

    /// Base URL of the release host, without a trailing slash.
    pub release_host: String,

    /// Repository slug in `<org>/<project>` form.
    pub repository: String,

    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl InstallerConfig {
    pub fn new() -> miette::Result<Self> {
        let home = dirs::home_dir().ok_or(InstallerError::MissingHomeDir)?;
        let mut config = Self::from_home(home);

        if let Ok(host) = env::var("DEVSPACE_INSTALLER_RELEASE_HOST") {
            if !host.is_empty() {
                config.release_host = host.trim_end_matches('/').to_owned();
            }
        }

        if let Some(manifest) = env::var_os("DEVSPACE_INSTALLER_MANIFEST") {
            if !manifest.is_empty() {
                config.manifest_path = PathBuf::from(manifest);
            }
        }

        if let Some(dir) = env::var_os("DEVSPACE_INSTALLER_FALLBACK_DIR") {
            if !dir.is_empty() {
                config.fallback_bin_dir = PathBuf::from(dir);
            }
        }

        if let Ok(timeout) = env::var("DEVSPACE_INSTALLER_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring invalid DEVSPACE_INSTALLER_TIMEOUT value {timeout}"),
            };
        }

        debug!(
            release_host = &config.release_host,
            manifest = ?config.manifest_path,
            "Loaded installer configuration"
        );

        Ok(config)
    }

    pub fn from_home(home: impl AsRef<Path>) -> Self {
        InstallerConfig {
            binary_name: "devspace".into(),
            config_dir: home.as_ref().join(".devspace"),
            fallback_bin_dir: PathBuf::from("/usr/local/bin"),
            manifest_path: PathBuf::from("package.json"),
            package_name: "devspace".into(),
            release_host: DEFAULT_RELEASE_HOST.into(),
            repository: DEFAULT_REPOSITORY.into(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(600),
        }
    }

    /// Name of the project, the last segment of the repository slug.
    pub fn project_name(&self) -> &str {
        self.repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository)
    }

    /// Path prefix of release download links, as it appears on the release host.
    pub fn release_download_path(&self) -> String {
        format!("/{}/releases/download/", self.repository)
    }

    pub fn release_listing_url(&self) -> String {
        format!("{}/{}/releases", self.release_host, self.repository)
    }

    pub fn download_url(&self, version: &ReleaseVersion, platform: &PlatformTarget) -> String {
        let file = platform.os.get_exe_name(format!(
            "{}-{}",
            self.project_name(),
            platform.artifact_suffix()
        ));

        format!(
            "{}{}v{}/{file}",
            self.release_host,
            self.release_download_path(),
            version.as_str(),
        )
    }
}

/// Snapshot of the environment variables and invocation details that
/// resolvers depend on, captured once at process start.
#[derive(Clone, Debug, Default)]
pub struct HostEnvironment {
    /// Path of the running installer, used to detect the package manager.
    pub invocation: String,

    /// Install prefix reported by the package manager (`npm_config_prefix`).
    pub npm_prefix: Option<String>,

    /// Executable search path (`PATH`).
    pub path: Option<String>,
}

impl HostEnvironment {
    pub fn capture() -> Self {
        let invocation = env::var("npm_execpath")
            .ok()
            .filter(|value| !value.is_empty())
            .or_else(|| {
                env::current_exe()
                    .ok()
                    .map(|exe| exe.to_string_lossy().to_string())
            })
            .unwrap_or_default();

        HostEnvironment {
            invocation,
            npm_prefix: env::var("npm_config_prefix")
                .ok()
                .filter(|value| !value.is_empty()),
            path: env::var("PATH").ok(),
        }
    }
}
