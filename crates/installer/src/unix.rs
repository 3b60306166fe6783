use crate::error::InstallerError;
use starbase_utils::fs;
use std::path::Path;
use tracing::trace;

/// Move the downloaded binary over the live binary. A rename within the same
/// directory is atomic, so the live path always holds either the previous
/// binary or the new one. A running process keeps its inode, so replacing
/// a binary that is currently executing is safe.
pub fn replace_binary(
    temp_path: &Path,
    final_path: &Path,
    _legacy_path: &Path,
) -> Result<(), InstallerError> {
    fs::update_perms(temp_path, Some(0o755)).map_err(|error| InstallerError::ReplaceFailed {
        path: final_path.to_path_buf(),
        error: Box::new(error),
    })?;

    trace!(from = ?temp_path, to = ?final_path, "Renaming binary into place");

    fs::rename(temp_path, final_path).map_err(|error| InstallerError::ReplaceFailed {
        path: final_path.to_path_buf(),
        error: Box::new(error),
    })?;

    Ok(())
}
