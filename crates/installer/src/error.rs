use miette::Diagnostic;
use starbase_styles::{Style, Stylize};
use starbase_utils::fs::FsError;
use starbase_utils::json::JsonError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InstallerError {
    #[error(transparent)]
    Fs(#[from] Box<FsError>),

    #[error(transparent)]
    Json(#[from] Box<JsonError>),

    #[diagnostic(code(devspace::installer::unsupported_platform))]
    #[error("Unable to download and install devspace on this platform. {0}")]
    UnsupportedPlatform(#[from] system_env::Error),

    #[diagnostic(code(devspace::installer::missing_home_dir))]
    #[error("Unable to determine your home directory.")]
    MissingHomeDir,

    #[diagnostic(
        code(devspace::installer::version_request_failed),
        help("Check your internet connection and try again.")
    )]
    #[error("Failed to request the latest release from {}.", .url.style(Style::Url))]
    VersionRequestFailed {
        url: String,
        #[source]
        error: Box<reqwest::Error>,
    },

    #[diagnostic(code(devspace::installer::version_unavailable))]
    #[error(
        "Unable to resolve the latest devspace version from {}.\n{}",
        .url.style(Style::Url),
        format!("Status: {}", .status).style(Style::MutedLight),
    )]
    VersionUnavailable { url: String, status: String },

    #[diagnostic(
        code(devspace::installer::version_not_found),
        help("The release listing may have changed format, please report this issue!")
    )]
    #[error("No release version could be found in the listing at {}.", .url.style(Style::Url))]
    VersionNotFound { url: String },

    #[diagnostic(code(devspace::installer::invalid_version))]
    #[error("Invalid release version {}.", .version.style(Style::Hash))]
    InvalidVersion {
        version: String,
        #[source]
        error: Box<semver::Error>,
    },

    #[diagnostic(
        code(devspace::installer::install_dir_unresolved),
        help("Make sure npm or yarn is available, or set the npm_config_prefix environment variable.")
    )]
    #[error("Unable to determine the global bin directory to install devspace into.")]
    InstallDirUnresolved,

    #[diagnostic(
        code(devspace::installer::install_dir_not_on_path),
        help("Add the directory to your PATH environment variable and try again.")
    )]
    #[error(
        "The global bin directory {} is not on PATH, devspace would not be executable.",
        .dir.style(Style::Path),
    )]
    InstallDirNotOnPath { dir: PathBuf },

    #[diagnostic(code(devspace::installer::download_failed))]
    #[error("Failed to download release {}.", .url.style(Style::Url))]
    DownloadFailed {
        url: String,
        #[source]
        error: Box<reqwest::Error>,
    },

    #[diagnostic(
        code(devspace::installer::download_timeout),
        help("The connection timed out, please try again later.")
    )]
    #[error("Timed out downloading release {}.", .url.style(Style::Url))]
    DownloadTimeout { url: String },

    #[diagnostic(
        code(devspace::installer::not_available),
        help("A release may be in progress, please try again later!"),
        url("https://github.com/covexo/devspace/releases")
    )]
    #[error(
        "Download for devspace v{} is not available.\n{}",
        .version,
        format!("Status: {}", .status).style(Style::MutedLight),
    )]
    DownloadNotAvailable { version: String, status: String },

    #[diagnostic(code(devspace::installer::write_failed))]
    #[error("Failed to write download to {}.", .path.style(Style::Path))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: Box<std::io::Error>,
    },

    #[diagnostic(
        code(devspace::installer::replace_failed),
        help("This is commonly a permissions issue. Either install without elevated privileges (npm install -g devspace), or re-run with unsafe permissions enabled (sudo npm install -g devspace --unsafe-perm=true).")
    )]
    #[error("Unable to move the downloaded binary into place at {}.", .path.style(Style::Path))]
    ReplaceFailed {
        path: PathBuf,
        #[source]
        error: Box<FsError>,
    },

    #[diagnostic(code(devspace::installer::invalid_manifest))]
    #[error("Version metadata {} is missing a {} field.", .path.style(Style::File), "version".style(Style::Property))]
    InvalidManifest { path: PathBuf },
}

impl From<FsError> for InstallerError {
    fn from(error: FsError) -> Self {
        InstallerError::Fs(Box::new(error))
    }
}

impl From<JsonError> for InstallerError {
    fn from(error: JsonError) -> Self {
        InstallerError::Json(Box::new(error))
    }
}
