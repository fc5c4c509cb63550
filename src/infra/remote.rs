//! Remote execution transport — adapts a remote shell collaborator.
//!
//! The remote shell executes one command string per call and does not
//! tokenize for us, so this is the single place where an argument array is
//! serialized — every word is quoted by `domain::shell` before it crosses
//! the boundary. See `domain/shell.rs` for the shared escaping policy.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{ExecOutput, ExecutionTransport, RemoteShell};
use crate::domain::error::InstanceError;
use crate::domain::package::Platform;
use crate::domain::shell::{join_command, quote};
use crate::domain::splunk;

/// Transport for an installation reached through a remote shell.
pub struct RemoteTransport<S: RemoteShell> {
    shell: S,
}

impl<S: RemoteShell> RemoteTransport<S> {
    pub fn new(shell: S) -> Self {
        Self { shell }
    }

    #[must_use]
    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Detect the remote platform from `uname -s` / `uname -m`.
    ///
    /// # Errors
    ///
    /// Returns an error when either probe fails or the pair maps to no
    /// supported platform.
    pub async fn detect_platform(&self) -> Result<Platform> {
        let os = self.shell.execute("uname -s").await?;
        anyhow::ensure!(
            os.success(),
            "could not determine remote OS: {}",
            os.stderr_lossy()
        );
        let machine = self.shell.execute("uname -m").await?;
        anyhow::ensure!(
            machine.success(),
            "could not determine remote architecture: {}",
            machine.stderr_lossy()
        );
        let os = os.stdout_lossy().into_owned();
        let machine = machine.stdout_lossy().into_owned();
        Platform::from_uname(&os, &machine).ok_or_else(|| {
            anyhow::anyhow!("unsupported remote platform: {}-{}", os.trim(), machine.trim())
        })
    }
}

impl<S: RemoteShell> ExecutionTransport for RemoteTransport<S> {
    async fn run(&self, binary: &Path, args: &[String]) -> Result<ExecOutput> {
        let command = join_command(&binary.to_string_lossy(), args);
        log::info!("executing on {}: {command}", self.shell.host());
        let output = self.shell.execute(&command).await?;
        log::info!("exit code {}", output.code);
        Ok(output)
    }

    async fn exists(&self, path: &Path) -> bool {
        self.shell.is_file(path).await || self.shell.is_dir(path).await
    }

    async fn is_dir(&self, path: &Path) -> bool {
        self.shell.is_dir(path).await
    }

    /// Remote archives sometimes nest the product directory one level down,
    /// so probe `root/bin/name` first, then `root/splunk/bin/name`, and fall
    /// back to the primary candidate when neither exists.
    async fn locate(&self, root: &Path, name: &str) -> PathBuf {
        let primary = splunk::binary_path(root, name);
        if Path::new(name).is_absolute() || self.shell.is_file(&primary).await {
            return primary;
        }
        let nested = splunk::nested_binary_path(root, name);
        if self.shell.is_file(&nested).await {
            return nested;
        }
        primary
    }

    async fn push_tree(&self, local_src: &Path, dest: &Path) -> Result<()> {
        if self.shell.is_dir(dest).await || self.shell.is_file(dest).await {
            self.shell
                .remove_tree(dest)
                .await
                .with_context(|| format!("replacing {}", dest.display()))?;
        }
        self.shell.send(local_src, dest).await
    }

    async fn remove_tree(&self, path: &Path) -> Result<()> {
        self.shell.remove_tree(path).await
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        self.shell.remove_file(path).await
    }

    async fn platform(&self) -> Result<Platform> {
        self.detect_platform().await
    }

    fn host(&self) -> &str {
        self.shell.host()
    }
}

/// Remote shell over the system `ssh`/`scp` binaries.
///
/// The SSH protocol itself stays a black box; this adapter only builds
/// command lines and interprets exit codes. `BatchMode` keeps sessions
/// non-interactive so a missing key fails fast instead of prompting.
#[derive(Debug)]
pub struct SshSession {
    host: String,
    user: Option<String>,
    identity: Option<PathBuf>,
}

impl SshSession {
    /// Create a session description for `host`.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::InvalidTransport`] for an empty host.
    pub fn new(
        host: impl Into<String>,
        user: Option<String>,
        identity: Option<PathBuf>,
    ) -> Result<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(InstanceError::InvalidTransport {
                reason: "ssh host is empty".to_string(),
            }
            .into());
        }
        Ok(Self {
            host,
            user,
            identity,
        })
    }

    fn destination(&self) -> String {
        match &self.user {
            Some(user) => format!("{user}@{}", self.host),
            None => self.host.clone(),
        }
    }

    fn identity_args(&self) -> Vec<String> {
        match &self.identity {
            Some(identity) => vec!["-i".to_string(), identity.to_string_lossy().into_owned()],
            None => Vec::new(),
        }
    }

    async fn run_local(program: &str, args: &[String]) -> Result<ExecOutput> {
        log::debug!("running {program} {}", args.join(" "));
        let output = tokio::process::Command::new(program)
            .args(args)
            .output()
            .await
            .with_context(|| format!("failed to spawn {program}"))?;
        Ok(ExecOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    async fn probe(&self, flag: &str, path: &Path) -> bool {
        let command = format!("test {flag} {}", quote(&path.to_string_lossy()));
        match self.execute(&command).await {
            Ok(output) => output.success(),
            Err(_) => false,
        }
    }
}

impl RemoteShell for SshSession {
    async fn execute(&self, command: &str) -> Result<ExecOutput> {
        let mut args = vec!["-o".to_string(), "BatchMode=yes".to_string()];
        args.extend(self.identity_args());
        args.push(self.destination());
        args.push(command.to_string());
        Self::run_local("ssh", &args).await
    }

    async fn is_file(&self, path: &Path) -> bool {
        self.probe("-f", path).await
    }

    async fn is_dir(&self, path: &Path) -> bool {
        self.probe("-d", path).await
    }

    async fn send(&self, local: &Path, remote: &Path) -> Result<()> {
        let mut args = vec!["-r".to_string(), "-q".to_string()];
        args.extend(self.identity_args());
        args.push(local.to_string_lossy().into_owned());
        args.push(format!(
            "{}:{}",
            self.destination(),
            remote.to_string_lossy()
        ));
        let output = Self::run_local("scp", &args).await?;
        anyhow::ensure!(
            output.success(),
            "scp to {}:{} failed: {}",
            self.host,
            remote.display(),
            output.stderr_lossy()
        );
        Ok(())
    }

    async fn remove_tree(&self, path: &Path) -> Result<()> {
        let command = format!("rm -rf {}", quote(&path.to_string_lossy()));
        let output = self.execute(&command).await?;
        anyhow::ensure!(
            output.success(),
            "removing {} on {} failed: {}",
            path.display(),
            self.host,
            output.stderr_lossy()
        );
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        let command = format!("rm -f {}", quote(&path.to_string_lossy()));
        let output = self.execute(&command).await?;
        anyhow::ensure!(
            output.success(),
            "removing {} on {} failed: {}",
            path.display(),
            self.host,
            output.stderr_lossy()
        );
        Ok(())
    }

    fn host(&self) -> &str {
        &self.host
    }
}
