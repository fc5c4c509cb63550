//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to
//! `anyhow::Error` via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

/// Full context of a command whose outcome could not be trusted.
///
/// The control binary's exit code is not a reliable success signal, so every
/// verification failure carries the exact command together with its raw
/// output for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// The command line that was executed, in display form.
    pub command: String,
    /// Exit code the command returned.
    pub code: i32,
    /// Captured stdout, lossily decoded.
    pub stdout: String,
    /// Captured stderr, lossily decoded.
    pub stderr: String,
}

impl std::fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}` exited with code {}\n--- stdout ---\n{}\n--- stderr ---\n{}",
            self.command, self.code, self.stdout, self.stderr
        )
    }
}

/// Errors raised by instance lifecycle and install operations.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("splunk is not installed under {}", .root.display())]
    NotInstalled { root: PathBuf },

    #[error("the binary {} does not exist", .0.display())]
    BinaryMissing(PathBuf),

    #[error("splunk was not running after start: {0}")]
    CouldNotStart(CommandFailure),

    #[error("splunk was still running after stop: {0}")]
    CouldNotStop(CommandFailure),

    #[error("splunk was not running after restart: {0}")]
    CouldNotRestart(CommandFailure),

    #[error("command failed: {0}")]
    CommandFailed(CommandFailure),

    #[error("could not find a splunk build inside the extracted archive")]
    CouldNotFindProductDirectory,

    #[error("invalid install root {}: {reason}", .path.display())]
    InvalidInstallRoot { path: PathBuf, reason: String },

    #[error("invalid transport: {reason}")]
    InvalidTransport { reason: String },
}
