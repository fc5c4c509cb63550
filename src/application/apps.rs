//! App lifecycle: install/uninstall of sub-packages under `etc/apps`.
//!
//! Written against the same transport abstraction as the rest of the
//! controller: packages are extracted into a local scratch directory and
//! then pushed through the transport, which makes the remote case a
//! stage-then-bulk-transfer by construction.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::instance::Instance;
use crate::application::ports::{Archiver, ExecutionTransport};
use crate::domain::splunk;

impl<T: ExecutionTransport> Instance<T> {
    /// Directory installed apps live in.
    #[must_use]
    pub fn apps_dir(&self) -> PathBuf {
        splunk::apps_dir(self.install_root())
    }

    fn app_path(&self, name: &str) -> PathBuf {
        self.apps_dir().join(name)
    }

    /// Whether the named app is installed.
    pub async fn has_app(&self, name: &str) -> bool {
        self.transport().is_dir(&self.app_path(name)).await
    }

    /// Install an app package into the apps directory.
    ///
    /// A package containing a single top-level directory (the usual app
    /// layout) is installed under `name`; anything else is pushed entry by
    /// entry under its own names. No restart is performed — callers decide
    /// when a restart is due.
    ///
    /// # Errors
    ///
    /// Returns extraction errors and transport transfer errors. The scratch
    /// directory is removed on every exit path.
    pub async fn install_app(
        &self,
        archiver: &impl Archiver,
        name: &str,
        package: &Path,
    ) -> Result<()> {
        log::info!("installing app {name} from {}", package.display());
        let scratch = tempfile::tempdir().context("creating app scratch directory")?;
        let result = self
            .install_app_from_scratch(archiver, name, package, scratch.path())
            .await;
        if let Err(err) = scratch.close() {
            log::warn!("failed to remove app scratch directory: {err}");
        }
        result
    }

    async fn install_app_from_scratch(
        &self,
        archiver: &impl Archiver,
        name: &str,
        package: &Path,
        scratch: &Path,
    ) -> Result<()> {
        archiver
            .extract(package, scratch)
            .with_context(|| format!("extracting app package {}", package.display()))?;
        let mut entries: Vec<PathBuf> = std::fs::read_dir(scratch)
            .context("listing extracted app package")?
            .collect::<Result<Vec<_>, _>>()
            .context("listing extracted app package")?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        entries.sort();

        if let [single] = entries.as_slice()
            && single.is_dir()
        {
            return self.transport().push_tree(single, &self.app_path(name)).await;
        }
        let apps = self.apps_dir();
        for entry in &entries {
            let Some(file_name) = entry.file_name() else {
                continue;
            };
            self.transport().push_tree(entry, &apps.join(file_name)).await?;
        }
        Ok(())
    }

    /// Remove the named app.
    ///
    /// Returns whether an app was actually present — callers use this to
    /// decide whether a restart is required.
    ///
    /// # Errors
    ///
    /// Returns transport deletion errors.
    pub async fn uninstall_app(&self, name: &str) -> Result<bool> {
        if !self.has_app(name).await {
            return Ok(false);
        }
        log::info!("uninstalling app {name}");
        self.transport().remove_tree(&self.app_path(name)).await?;
        Ok(true)
    }
}
