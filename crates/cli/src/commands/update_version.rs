use crate::session::{AppResult, InstallerSession};
use devspace_installer::{GithubReleasePage, ReleaseFeed, VersionManifest};
use starbase_styles::color;
use tracing::info;

pub async fn update_version(session: InstallerSession) -> AppResult {
    let client = session.create_http_client()?;
    let feed = GithubReleasePage::new(&session.config, client);
    let version = feed.fetch_latest_version(true).await?;

    let mut manifest = VersionManifest::load(&session.config.manifest_path)?;

    manifest.set_version(&version)?;
    manifest.save()?;

    info!(
        "Updated {} to version {}",
        color::path(&manifest.path),
        color::hash(version.as_str())
    );

    Ok(None)
}
