use devspace_installer::{
    create_http_client, detect_automated_update, HostEnvironment, InstallPathResolver,
    InstallTarget, InstallerConfig, InstallerError, PackageManagerQuery,
};
use std::io::{self, IsTerminal};
use system_env::{PlatformTarget, SystemOS, SystemProcessTable};

/// Exit code to use when it differs from the default success code.
pub type AppResult = miette::Result<Option<u8>>;

pub struct InstallerSession {
    pub config: InstallerConfig,
    pub host: HostEnvironment,
}

impl InstallerSession {
    pub fn new() -> miette::Result<Self> {
        Ok(Self {
            config: InstallerConfig::new()?,
            host: HostEnvironment::capture(),
        })
    }

    pub fn create_http_client(&self) -> miette::Result<reqwest::Client> {
        create_http_client(&self.config)
    }

    /// Resolve the install directory for the platform, creating it if needed.
    pub fn resolve_target(&self, platform: &PlatformTarget) -> miette::Result<InstallTarget> {
        InstallPathResolver::new(&self.config, &self.host, &PackageManagerQuery).resolve(platform)
    }

    /// Resolve where an existing install lives, without creating anything.
    pub fn locate_target(&self, os: SystemOS) -> Result<InstallTarget, InstallerError> {
        let dir =
            InstallPathResolver::new(&self.config, &self.host, &PackageManagerQuery).locate(os)?;

        Ok(InstallTarget::new(dir, &self.config.binary_name, os))
    }

    pub fn is_automated_update(&self) -> bool {
        detect_automated_update(&SystemProcessTable, &self.config.package_name)
    }

    pub fn is_interactive(&self) -> bool {
        io::stdin().is_terminal() && io::stdout().is_terminal()
    }
}
