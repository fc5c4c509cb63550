//! Defaults-file schema for the CLI.
//!
//! Pure types only; loading lives in `infra::config`. Command-line flags
//! always win over file values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Defaults stored in `~/.splunkctl/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Defaults {
    /// Install root used when `--splunk-home` is not passed.
    pub splunk_home: Option<PathBuf>,
    /// Remote host for SSH-reached instances.
    pub ssh_host: Option<String>,
    /// Remote user for SSH-reached instances.
    pub ssh_user: Option<String>,
    /// Identity file passed to ssh/scp.
    pub ssh_identity: Option<PathBuf>,
    /// Base URL packages are resolved against.
    pub package_base_url: Option<String>,
}
