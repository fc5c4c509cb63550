//! Archive extraction over `tar` + `flate2`.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

use crate::application::ports::Archiver;

/// Extracts tarballs, gzipped or plain, detected by file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarArchiver;

impl TarArchiver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Archiver for TarArchiver {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let file =
            File::open(archive).with_context(|| format!("opening {}", archive.display()))?;
        log::info!("extracting {} to {}", archive.display(), dest.display());
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            tar::Archive::new(GzDecoder::new(file))
                .unpack(dest)
                .with_context(|| format!("unpacking {}", archive.display()))
        } else if name.ends_with(".tar") {
            tar::Archive::new(file)
                .unpack(dest)
                .with_context(|| format!("unpacking {}", archive.display()))
        } else {
            anyhow::bail!("unsupported archive format: {}", archive.display())
        }
    }
}
