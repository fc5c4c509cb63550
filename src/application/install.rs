//! Install orchestration: archive → scratch extraction → product-root probe
//! → relocation into the install root.
//!
//! The scratch directory is owned exclusively by one install operation and
//! is removed on every exit path; its removal never masks the primary error.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::instance::Instance;
use crate::application::ports::{Archiver, ExecutionTransport};
use crate::domain::error::InstanceError;
use crate::domain::splunk::PRODUCT_DIRECTORIES;

impl<T: ExecutionTransport> Instance<T> {
    /// Install this instance from a local archive.
    ///
    /// A running server is stopped first; it is NOT restarted afterwards —
    /// a fresh install usually needs configuration before first start, so
    /// the caller owns that decision.
    ///
    /// # Errors
    ///
    /// Returns extraction errors,
    /// [`InstanceError::CouldNotFindProductDirectory`] when the archive
    /// layout is unrecognized, and relocation errors from the transport.
    pub async fn install_from_archive(
        &mut self,
        archiver: &impl Archiver,
        archive: &Path,
    ) -> Result<()> {
        log::info!("installing splunk from archive {}", archive.display());
        self.stop_if_running().await?;
        let scratch = tempfile::tempdir().context("creating extraction scratch directory")?;
        let result = self
            .install_with_scratch(archiver, archive, scratch.path())
            .await;
        if let Err(err) = scratch.close() {
            log::warn!("failed to remove extraction scratch directory: {err}");
        }
        result
    }

    async fn install_with_scratch(
        &mut self,
        archiver: &impl Archiver,
        archive: &Path,
        scratch: &Path,
    ) -> Result<()> {
        archiver
            .extract(archive, scratch)
            .with_context(|| format!("extracting {}", archive.display()))?;
        let product_root = find_product_root(scratch)?;
        let dest = self.install_root().to_path_buf();
        log::info!(
            "relocating {} to {}",
            product_root.display(),
            dest.display()
        );
        self.transport()
            .push_tree(&product_root, &dest)
            .await
            .with_context(|| format!("relocating extracted tree into {}", dest.display()))
    }
}

/// Probe the scratch directory's top-level entries for a known product root.
///
/// The candidate list is ordered; the first existing directory wins. No
/// match is a hard failure — it means the package layout is unexpected, not
/// that a retry would help.
fn find_product_root(scratch: &Path) -> Result<PathBuf> {
    for name in PRODUCT_DIRECTORIES {
        let candidate = scratch.join(name);
        if candidate.is_dir() {
            log::debug!("{name} - exists");
            return Ok(candidate);
        }
        log::debug!("{name} - does not exist");
    }
    Err(InstanceError::CouldNotFindProductDirectory.into())
}
