use crate::config::{HostEnvironment, InstallerConfig};
use crate::error::InstallerError;
use starbase_styles::color;
use starbase_utils::fs;
use std::path::{Path, PathBuf};
use system_env::{
    capture_command_stdout, is_dir_on_path, NodePackageManager, PlatformTarget, SystemOS,
};
use tracing::{debug, instrument, trace, warn};

/// File-system locations used by a single install or uninstall run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstallTarget {
    /// Directory that receives the binary.
    pub directory: PathBuf,

    /// File name of the binary, including the `.exe` extension on Windows.
    pub binary_name: String,

    /// The live binary.
    pub final_path: PathBuf,

    /// Where a download is streamed to before being moved into place.
    pub temp_path: PathBuf,

    /// Where a previous binary is relocated to when it can't be replaced in place.
    pub legacy_path: PathBuf,
}

impl InstallTarget {
    pub fn new(directory: impl AsRef<Path>, binary_name: &str, os: SystemOS) -> Self {
        let directory = directory.as_ref().to_path_buf();
        let binary_name = os.get_exe_name(binary_name);

        InstallTarget {
            final_path: directory.join(&binary_name),
            temp_path: directory.join(format!("{binary_name}.dl")),
            legacy_path: directory.join(format!(".{binary_name}.old")),
            directory,
            binary_name,
        }
    }

    /// Scripts a package manager links next to the binary that would shadow it.
    /// These only exist on Windows, where npm creates a shell script, a PowerShell
    /// script, and a cmd script for every package binary. Set `all` to false to
    /// only return the formats that are unrelated to a native executable.
    pub fn companion_paths(&self, name: &str, os: SystemOS, all: bool) -> Vec<PathBuf> {
        if !os.is_windows() {
            return vec![];
        }

        let mut paths = vec![
            self.directory.join(name),
            self.directory.join(format!("{name}.ps1")),
        ];

        if all {
            paths.push(self.directory.join(format!("{name}.cmd")));
        }

        paths
    }
}

/// Asks a package manager where it links global package binaries.
pub trait GlobalBinQuery {
    fn global_bin_dir(&self, manager: NodePackageManager) -> Option<PathBuf>;
}

/// Runs the package manager's own command and reads the directory from stdout.
#[derive(Debug, Default)]
pub struct PackageManagerQuery;

impl GlobalBinQuery for PackageManagerQuery {
    fn global_bin_dir(&self, manager: NodePackageManager) -> Option<PathBuf> {
        capture_command_stdout(manager.get_global_bin_command()).map(PathBuf::from)
    }
}

/// Determines a writable directory on `PATH` to install the binary into,
/// preferring the global bin directory of the package manager that
/// triggered this run.
pub struct InstallPathResolver<'app> {
    config: &'app InstallerConfig,
    host: &'app HostEnvironment,
    query: &'app dyn GlobalBinQuery,
}

impl<'app> InstallPathResolver<'app> {
    pub fn new(
        config: &'app InstallerConfig,
        host: &'app HostEnvironment,
        query: &'app dyn GlobalBinQuery,
    ) -> Self {
        InstallPathResolver {
            config,
            host,
            query,
        }
    }

    /// Resolve the install directory and ensure it exists.
    #[instrument(skip(self))]
    pub fn resolve(&self, platform: &PlatformTarget) -> miette::Result<InstallTarget> {
        let dir = self.locate(platform.os)?;

        fs::create_dir_all(&dir).map_err(InstallerError::from)?;

        debug!(dir = ?dir, "Resolved install directory {}", color::path(&dir));

        Ok(InstallTarget::new(dir, &self.config.binary_name, platform.os))
    }

    /// Resolve the install directory without touching the file system.
    pub fn locate(&self, os: SystemOS) -> Result<PathBuf, InstallerError> {
        let Some(dir) = self
            .query_package_managers()
            .or_else(|| self.from_prefix_env(os))
        else {
            if os.is_windows() {
                return Err(InstallerError::InstallDirUnresolved);
            }

            debug!(
                "Unable to query a package manager, falling back to {}",
                color::path(&self.config.fallback_bin_dir)
            );

            return Ok(self.config.fallback_bin_dir.clone());
        };

        let path_var = self.host.path.as_deref().unwrap_or_default();

        if is_dir_on_path(&dir, path_var, os) {
            return Ok(dir);
        }

        if os.is_windows() {
            return Err(InstallerError::InstallDirNotOnPath { dir });
        }

        warn!(
            "Global bin directory {} is not on PATH, installing to {} instead",
            color::path(&dir),
            color::path(&self.config.fallback_bin_dir)
        );

        Ok(self.config.fallback_bin_dir.clone())
    }

    fn query_package_managers(&self) -> Option<PathBuf> {
        let primary = NodePackageManager::detect_from_invocation(&self.host.invocation);

        for manager in [primary, primary.alternate()] {
            trace!(manager = %manager, "Querying global bin directory");

            if let Some(dir) = self.query.global_bin_dir(manager) {
                if !dir.as_os_str().is_empty() {
                    return Some(dir);
                }
            }
        }

        None
    }

    fn from_prefix_env(&self, os: SystemOS) -> Option<PathBuf> {
        let prefix = PathBuf::from(self.host.npm_prefix.as_deref()?);

        trace!(prefix = ?prefix, "Using npm_config_prefix");

        // npm links binaries into the prefix itself on Windows
        Some(if os.is_windows() {
            prefix
        } else {
            prefix.join("bin")
        })
    }
}
