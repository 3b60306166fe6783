use crate::config::InstallerConfig;
use crate::error::InstallerError;
use crate::version::ReleaseVersion;
use futures::StreamExt;
use starbase_styles::color;
use starbase_utils::fs;
use std::fmt::Debug;
use std::io::Write;
use std::path::Path;
use tracing::{debug, instrument, trace};

/// Callback invoked after each chunk is written, with the bytes written so far
/// and the total size (0 when the server didn't report one).
pub type OnChunkFn = Box<dyn Fn(u64, u64) + Send + Sync>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DownloadOutcome {
    /// The artifact was written to the temp path in full.
    Completed,
    /// The server has no artifact for the requested version (HTTP 404).
    Missing,
}

/// A single download attempt.
#[derive(Clone, Debug)]
pub struct DownloadSession {
    pub url: String,
    pub http_status: u16,
    pub bytes_written: u64,
    pub outcome: DownloadOutcome,
}

pub fn create_http_client(config: &InstallerConfig) -> miette::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(format!("devspace-installer/{}", env!("CARGO_PKG_VERSION")))
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()
        .map_err(|error| InstallerError::DownloadFailed {
            url: config.release_host.clone(),
            error: Box::new(error),
        })?;

    Ok(client)
}

/// Stream the artifact at `url` into `temp_file`. A 404 is reported as a
/// [`DownloadOutcome::Missing`] session so the caller can decide to fall back,
/// any other unsuccessful status is an error.
#[instrument(skip(client, on_chunk))]
pub async fn download_release(
    client: &reqwest::Client,
    url: &str,
    version: &ReleaseVersion,
    temp_file: impl AsRef<Path> + Debug,
    on_chunk: Option<&OnChunkFn>,
) -> Result<DownloadSession, InstallerError> {
    let temp_file = temp_file.as_ref();
    let handle_http_error = |error: reqwest::Error| {
        if error.is_timeout() {
            InstallerError::DownloadTimeout {
                url: url.to_owned(),
            }
        } else {
            InstallerError::DownloadFailed {
                url: url.to_owned(),
                error: Box::new(error),
            }
        }
    };
    let handle_io_error = |error: std::io::Error| InstallerError::WriteFailed {
        path: temp_file.to_path_buf(),
        error: Box::new(error),
    };

    trace!(version = %version, "Downloading release from {}", color::url(url));

    let response = client.get(url).send().await.map_err(handle_http_error)?;
    let status = response.status();

    if status.as_u16() == 404 {
        debug!(version = %version, "Release artifact does not exist");

        return Ok(DownloadSession {
            url: url.to_owned(),
            http_status: status.as_u16(),
            bytes_written: 0,
            outcome: DownloadOutcome::Missing,
        });
    }

    if !status.is_success() {
        return Err(InstallerError::DownloadNotAvailable {
            version: version.to_string(),
            status: status.to_string(),
        });
    }

    let total = response.content_length().unwrap_or(0);
    let mut file = fs::create_file(temp_file)?;
    let mut stream = response.bytes_stream();
    let mut bytes_written = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(handle_http_error)?;

        file.write_all(&chunk).map_err(handle_io_error)?;
        bytes_written += chunk.len() as u64;

        if let Some(callback) = on_chunk {
            callback(bytes_written, total);
        }
    }

    file.flush().map_err(handle_io_error)?;
    file.sync_all().map_err(handle_io_error)?;

    debug!(
        bytes = bytes_written,
        "Downloaded release to {}",
        color::path(temp_file)
    );

    Ok(DownloadSession {
        url: url.to_owned(),
        http_status: status.as_u16(),
        bytes_written,
        outcome: DownloadOutcome::Completed,
    })
}
