use crate::error::InstallerError;
use starbase_utils::fs;
use std::path::Path;
use tracing::{trace, warn};

/// Move the downloaded binary over the live binary. Windows replaces an existing
/// file on rename, unless it's locked by a running process. In that case the
/// live binary is relocated first (a rename keeps the same handle, so the
/// running process is unaffected), and restored if the second rename fails.
pub fn replace_binary(
    temp_path: &Path,
    final_path: &Path,
    legacy_path: &Path,
) -> Result<(), InstallerError> {
    let handle_error = |error| InstallerError::ReplaceFailed {
        path: final_path.to_path_buf(),
        error: Box::new(error),
    };

    trace!(from = ?temp_path, to = ?final_path, "Renaming binary into place");

    if fs::rename(temp_path, final_path).is_ok() {
        return Ok(());
    }

    if !final_path.exists() {
        return fs::rename(temp_path, final_path).map_err(handle_error);
    }

    trace!(
        to = ?legacy_path,
        "Binary appears to be in use, relocating it before replacing"
    );

    fs::rename(final_path, legacy_path).map_err(handle_error)?;

    if let Err(error) = fs::rename(temp_path, final_path) {
        if fs::rename(legacy_path, final_path).is_err() {
            warn!("Failed to restore the previous binary from {legacy_path:?}");
        }

        return Err(handle_error(error));
    }

    Ok(())
}
