use crate::helpers::create_progress_bar;
use crate::session::{AppResult, InstallerSession};
use clap::Args;
use devspace_installer::{
    GithubReleasePage, InstallOutcome, Installer, InstallerError, ReleaseVersion, VersionManifest,
};
use starbase_styles::color;
use system_env::PlatformTarget;
use tracing::{debug, info, instrument};

#[derive(Args, Clone, Debug, Default)]
pub struct InstallArgs {
    #[arg(
        long,
        help = "Version to install, instead of the version recorded in package.json"
    )]
    pub version: Option<String>,
}

fn resolve_requested_version(
    session: &InstallerSession,
    args: &InstallArgs,
) -> miette::Result<Option<ReleaseVersion>> {
    if let Some(version) = &args.version {
        return Ok(Some(ReleaseVersion::parse(version)?));
    }

    let Some(manifest) = VersionManifest::load_if_exists(&session.config.manifest_path)? else {
        return Ok(None);
    };

    Ok(manifest.version()?)
}

#[instrument(skip(session))]
async fn run_install(
    session: &InstallerSession,
    args: &InstallArgs,
    show_progress: bool,
) -> miette::Result<InstallOutcome> {
    let version = resolve_requested_version(session, args)?;
    // Fails for unsupported platforms before anything is requested
    let platform = PlatformTarget::detect().map_err(InstallerError::from)?;

    debug!(
        platform = %platform,
        version = ?version,
        "Installing devspace"
    );

    let target = session.resolve_target(&platform)?;
    let client = session.create_http_client()?;
    let feed = GithubReleasePage::new(&session.config, client.clone());
    let mut installer = Installer::new(&session.config, client, &feed);

    if !show_progress {
        return installer.install(&platform, &target, version).await;
    }

    let pb = create_progress_bar(format!("Downloading devspace for {platform}"))?;
    let pb_clone = pb.clone();

    installer = installer.on_chunk(move |current, total| {
        if total > 0 && pb_clone.length() != Some(total) {
            pb_clone.set_length(total);
        }

        pb_clone.set_position(current);
    });

    let result = installer.install(&platform, &target, version).await;

    pb.finish_and_clear();

    result
}

pub async fn install(session: InstallerSession, args: InstallArgs) -> AppResult {
    let outcome = run_install(&session, &args, true).await?;

    info!(
        "Installed devspace {} to {}",
        color::hash(outcome.version.as_str()),
        color::path(&outcome.binary)
    );

    Ok(None)
}

pub async fn finish_install(session: InstallerSession, args: InstallArgs) -> AppResult {
    let outcome = run_install(&session, &args, false).await?;

    debug!(
        version = outcome.version.as_str(),
        binary = ?outcome.binary,
        bytes = outcome.session.bytes_written,
        fresh = outcome.fresh,
        "Finished installing devspace"
    );

    Ok(None)
}
