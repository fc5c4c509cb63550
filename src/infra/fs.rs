//! Local filesystem helpers shared by the transports.

use std::path::Path;

use anyhow::{Context, Result};

/// Recursively copy `src` into `dest`, creating `dest`.
///
/// # Errors
///
/// Returns an error if any directory or file cannot be copied.
pub fn copy_dir_all(src: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("creating directory {}", dest.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))?
    {
        let entry = entry.with_context(|| format!("reading directory {}", src.display()))?;
        let target = dest.join(entry.file_name());
        let file_type = entry
            .file_type()
            .with_context(|| format!("inspecting {}", entry.path().display()))?;
        if file_type.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target).with_context(|| {
                format!("copying {} to {}", entry.path().display(), target.display())
            })?;
        }
    }
    Ok(())
}

/// Move `src` to `dest`: a rename when possible, a copy-then-delete when the
/// paths live on different filesystems.
///
/// # Errors
///
/// Returns an error if neither strategy succeeds.
pub fn move_dir(src: &Path, dest: &Path) -> Result<()> {
    if std::fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    copy_dir_all(src, dest)?;
    std::fs::remove_dir_all(src)
        .with_context(|| format!("removing moved source {}", src.display()))
}
