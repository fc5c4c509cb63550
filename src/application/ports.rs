//! Port trait definitions for the application layer.
//!
//! Ports are the contracts infrastructure must fulfill. This file imports
//! only from `crate::domain` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::package::{PackageDescriptor, Platform};

/// Captured result of one command execution.
///
/// Transports own the exit-code representation end-to-end, so remote shells
/// can report codes without fabricating a local `ExitStatus`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit code; `-1` when the process was terminated by a signal.
    pub code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExecOutput {
    /// Build an output with empty streams.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        Self {
            code,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }

    #[must_use]
    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    #[must_use]
    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

/// Uniform execution surface over a local or remote installation.
///
/// The instance controller routes every external action through this trait
/// and never special-cases transport identity. Arguments are passed as an
/// array end-to-end; a transport that must serialize them into a single
/// command string (the remote shell boundary) quotes each word explicitly.
#[allow(async_fn_in_trait)]
pub trait ExecutionTransport {
    /// Run `binary` with `args`, capturing exit code and both streams.
    ///
    /// Implementations log the exact command and the resulting exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be executed at all; a non-zero
    /// exit is NOT an error.
    async fn run(&self, binary: &Path, args: &[String]) -> Result<ExecOutput>;

    /// Whether `path` exists (file or directory).
    async fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    async fn is_dir(&self, path: &Path) -> bool;

    /// Resolve a binary name against an install root.
    ///
    /// Never fails; absence is discovered when the binary is invoked. The
    /// remote implementation probes a nested fallback layout, the local one
    /// is a pure path join.
    async fn locate(&self, root: &Path, name: &str) -> PathBuf;

    /// Relocate a LOCAL directory tree to `dest` inside this transport's
    /// namespace, replacing any prior contents of `dest`.
    ///
    /// Locally this is a rename (a copy is only made when crossing
    /// filesystems); remotely it is a bulk transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be moved into place.
    async fn push_tree(&self, local_src: &Path, dest: &Path) -> Result<()>;

    /// Recursively delete a directory tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree exists but cannot be removed.
    async fn remove_tree(&self, path: &Path) -> Result<()>;

    /// Delete a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    async fn remove_file(&self, path: &Path) -> Result<()>;

    /// Platform of the machine this transport executes on.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform cannot be determined or no
    /// package is published for it.
    async fn platform(&self) -> Result<Platform>;

    /// Host name this transport's commands execute on.
    fn host(&self) -> &str;
}

/// Remote shell collaborator the remote transport is built on.
///
/// The shell executes one command string per call and does not tokenize on
/// the caller's behalf.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// Execute a fully serialized command line remotely.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be delivered to the remote
    /// side; a non-zero remote exit is NOT an error.
    async fn execute(&self, command: &str) -> Result<ExecOutput>;

    /// Whether `path` is a regular file on the remote side.
    async fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` is a directory on the remote side.
    async fn is_dir(&self, path: &Path) -> bool;

    /// Recursively copy a local tree to a remote destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails.
    async fn send(&self, local: &Path, remote: &Path) -> Result<()>;

    /// Recursively delete a remote tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    async fn remove_tree(&self, path: &Path) -> Result<()>;

    /// Delete a single remote file.
    ///
    /// # Errors
    ///
    /// Returns an error if the deletion fails.
    async fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remote host name.
    fn host(&self) -> &str;
}

/// A shared shell session can back several transports at once — the
/// session's lifetime is independent of any one instance.
impl<S: RemoteShell> RemoteShell for &S {
    async fn execute(&self, command: &str) -> Result<ExecOutput> {
        (**self).execute(command).await
    }

    async fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path).await
    }

    async fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path).await
    }

    async fn send(&self, local: &Path, remote: &Path) -> Result<()> {
        (**self).send(local, remote).await
    }

    async fn remove_tree(&self, path: &Path) -> Result<()> {
        (**self).remove_tree(path).await
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        (**self).remove_file(path).await
    }

    fn host(&self) -> &str {
        (**self).host()
    }
}

/// Archive extraction collaborator; the format is auto-detected by the
/// implementation, not the caller.
pub trait Archiver {
    /// Extract `archive` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be read or unpacked.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

/// Package resolution collaborator: turns a descriptor into a local archive
/// path, downloading as a side effect.
pub trait PackageResolver {
    /// Resolve `package` to a local archive path.
    ///
    /// # Errors
    ///
    /// Resolution failures (network, availability) propagate unchanged.
    fn resolve(&self, package: &PackageDescriptor) -> Result<PathBuf>;
}
