//! Local execution transport — spawns child processes directly.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{ExecOutput, ExecutionTransport};
use crate::domain::package::Platform;
use crate::domain::splunk;
use crate::infra::fs;

/// Transport for an installation on this machine.
///
/// Commands are spawned with an argument array — a shell is never involved,
/// so arguments need no quoting on this side of the escaping policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTransport;

impl LocalTransport {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ExecutionTransport for LocalTransport {
    async fn run(&self, binary: &Path, args: &[String]) -> Result<ExecOutput> {
        log::info!("executing {} {}", binary.display(), args.join(" "));
        let output = tokio::process::Command::new(binary)
            .args(args)
            .output()
            .await
            .with_context(|| format!("failed to spawn {}", binary.display()))?;
        let code = output.status.code().unwrap_or(-1);
        log::info!("exit code {code}");
        Ok(ExecOutput {
            code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    async fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    async fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    async fn locate(&self, root: &Path, name: &str) -> PathBuf {
        splunk::binary_path(root, name)
    }

    async fn push_tree(&self, local_src: &Path, dest: &Path) -> Result<()> {
        if dest.exists() {
            std::fs::remove_dir_all(dest)
                .with_context(|| format!("replacing {}", dest.display()))?;
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::move_dir(local_src, dest)
            .with_context(|| format!("moving {} to {}", local_src.display(), dest.display()))
    }

    async fn remove_tree(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path).with_context(|| format!("removing {}", path.display()))
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("removing {}", path.display()))
    }

    async fn platform(&self) -> Result<Platform> {
        Platform::host()
    }

    fn host(&self) -> &str {
        "localhost"
    }
}
