use crate::session::{AppResult, InstallerSession};
use devspace_installer::VersionManifest;
use tracing::debug;

pub async fn get_tag(session: InstallerSession) -> AppResult {
    let manifest = VersionManifest::load(&session.config.manifest_path)?;

    let tag = match manifest.version()? {
        Some(version) => version.channel_tag(),
        None => {
            debug!(manifest = ?manifest.path, "No version recorded, using the default tag");

            "latest".into()
        }
    };

    println!("{tag}");

    Ok(None)
}
