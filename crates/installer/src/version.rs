use crate::config::InstallerConfig;
use crate::error::InstallerError;
use async_trait::async_trait;
use regex::Regex;
use semver::Version;
use serde_json::Value;
use starbase_styles::color;
use starbase_utils::json;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, instrument, trace};

// Stable releases only. The version segment ends at the first path separator
// and must be a plain `major.minor.patch`, so pre-release tags never match.
static STABLE_DOWNLOAD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"/([^/"'\s]+/[^/"'\s]+)/releases/download/v([0-9]+\.[0-9]+\.[0-9]+)/"#).unwrap()
});

static ANY_DOWNLOAD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"/([^/"'\s]+/[^/"'\s]+)/releases/download/v([^/"'\s]+)/"#).unwrap()
});

static CHANNEL_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)-([a-z]+)(\.[0-9]+)?$").unwrap());

/// A published release version, for example `4.2.0` or `4.2.0-beta.4`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleaseVersion {
    raw: String,
}

impl ReleaseVersion {
    /// Parse a version string, with or without a leading `v`.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, InstallerError> {
        let raw = value.as_ref().trim();
        let raw = raw.strip_prefix('v').unwrap_or(raw);

        Version::parse(raw).map_err(|error| InstallerError::InvalidVersion {
            version: raw.to_owned(),
            error: Box::new(error),
        })?;

        Ok(ReleaseVersion {
            raw: raw.to_owned(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Return the release channel this version is published under.
    pub fn channel_tag(&self) -> String {
        derive_tag(&self.raw)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Derive the release channel tag from a version's trailing suffix:
/// `1.2.3-beta.4` is published as `beta`, and a version without a
/// suffix as `latest`.
pub fn derive_tag(version: &str) -> String {
    CHANNEL_TAG_PATTERN
        .captures(version.trim())
        .and_then(|caps| caps.get(1))
        .map(|tag| tag.as_str().to_lowercase())
        .unwrap_or_else(|| "latest".into())
}

/// Find the version of the first release download link for the repository
/// within a release listing document.
pub fn extract_latest_version(
    document: &str,
    repository: &str,
    include_prerelease: bool,
) -> Option<String> {
    let pattern = if include_prerelease {
        &ANY_DOWNLOAD_PATTERN
    } else {
        &STABLE_DOWNLOAD_PATTERN
    };

    pattern
        .captures_iter(document)
        .find(|caps| caps.get(1).is_some_and(|repo| repo.as_str() == repository))
        .and_then(|caps| caps.get(2))
        .map(|version| version.as_str().to_owned())
}

/// Source of the newest published release.
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    async fn fetch_latest_version(
        &self,
        include_prerelease: bool,
    ) -> Result<ReleaseVersion, InstallerError>;
}

/// Resolves the latest release by scraping the repository's release listing
/// page for download links. This is a textual contract with the release host,
/// so it's kept behind [`ReleaseFeed`].
pub struct GithubReleasePage {
    client: reqwest::Client,
    repository: String,
    url: String,
}

impl GithubReleasePage {
    pub fn new(config: &InstallerConfig, client: reqwest::Client) -> Self {
        GithubReleasePage {
            client,
            repository: config.repository.clone(),
            url: config.release_listing_url(),
        }
    }
}

#[async_trait]
impl ReleaseFeed for GithubReleasePage {
    #[instrument(skip(self))]
    async fn fetch_latest_version(
        &self,
        include_prerelease: bool,
    ) -> Result<ReleaseVersion, InstallerError> {
        let url = &self.url;
        let handle_http_error = |error: reqwest::Error| InstallerError::VersionRequestFailed {
            url: url.to_owned(),
            error: Box::new(error),
        };

        trace!("Loading release listing from {}", color::url(url));

        let response = self.client.get(url).send().await.map_err(handle_http_error)?;
        let status = response.status();

        if !status.is_success() {
            return Err(InstallerError::VersionUnavailable {
                url: url.to_owned(),
                status: status.to_string(),
            });
        }

        let document = response.text().await.map_err(handle_http_error)?;

        let Some(version) = extract_latest_version(&document, &self.repository, include_prerelease)
        else {
            return Err(InstallerError::VersionNotFound {
                url: url.to_owned(),
            });
        };

        debug!(include_prerelease, "Found latest version {}", color::hash(&version));

        ReleaseVersion::parse(version)
    }
}

/// The persisted version metadata record. This is the `package.json` of the
/// npm package that ships the installer; only the `version` field is read
/// or written, everything else is preserved as-is.
#[derive(Debug)]
pub struct VersionManifest {
    pub path: PathBuf,
    data: Value,
}

impl VersionManifest {
    pub fn load(path: impl AsRef<Path>) -> miette::Result<Self> {
        let path = path.as_ref();
        let data: Value = json::read_file(path).map_err(InstallerError::from)?;

        Ok(VersionManifest {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn load_if_exists(path: impl AsRef<Path>) -> miette::Result<Option<Self>> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(manifest = ?path, "No version metadata found");

            return Ok(None);
        }

        Self::load(path).map(Some)
    }

    /// Return the recorded version, or `None` if the record has no usable
    /// version string.
    pub fn version(&self) -> Result<Option<ReleaseVersion>, InstallerError> {
        match self.data.get("version") {
            Some(Value::String(version)) if !version.trim().is_empty() => {
                ReleaseVersion::parse(version).map(Some)
            }
            Some(Value::String(_)) | None => Ok(None),
            Some(_) => Err(InstallerError::InvalidManifest {
                path: self.path.clone(),
            }),
        }
    }

    pub fn set_version(&mut self, version: &ReleaseVersion) -> Result<(), InstallerError> {
        let Value::Object(map) = &mut self.data else {
            return Err(InstallerError::InvalidManifest {
                path: self.path.clone(),
            });
        };

        map.insert("version".into(), Value::String(version.to_string()));

        Ok(())
    }

    pub fn save(&self) -> miette::Result<()> {
        json::write_file(&self.path, &self.data, true).map_err(InstallerError::from)?;

        debug!(manifest = ?self.path, "Saved version metadata");

        Ok(())
    }
}
