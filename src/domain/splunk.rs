//! Splunk product conventions and pure path/parse helpers.
//!
//! Everything here is data-in data-out; transports and the instance
//! controller build on these functions.

use std::path::{Path, PathBuf};

use crate::domain::error::InstanceError;

/// Name of the control binary under `bin/`.
pub const SPLUNK_BINARY: &str = "splunk";

/// Non-interactive flags appended to every regular command.
///
/// Without these the binary may prompt and block the calling automation.
pub const COMMON_FLAGS: &[&str] = &["--accept-license", "--no-prompt", "--answer-yes"];

/// Token printed by `splunk status` when the server process is up.
pub const RUNNING_TOKEN: &str = "splunkd is running";

/// Top-level directory names a package archive may extract to, probed in
/// this order when locating the product root.
pub const PRODUCT_DIRECTORIES: &[&str] =
    &["splunk", "splunkforwarder", "splunkbeta", "splunkforwarderbeta"];

/// Query command that prints the splunkd (management) port.
pub const SPLUNKD_PORT_COMMAND: &str = "soapport";

/// Query command that prints the web port.
pub const WEB_PORT_COMMAND: &str = "httpport";

/// Resolve a binary name against an install root.
///
/// An absolute `name` is returned unchanged; anything else joins
/// `root/bin/name`.
#[must_use]
pub fn binary_path(root: &Path, name: &str) -> PathBuf {
    let name = Path::new(name);
    if name.is_absolute() {
        return name.to_path_buf();
    }
    root.join("bin").join(name)
}

/// Fallback candidate for nested archive layouts: `root/splunk/bin/name`.
#[must_use]
pub fn nested_binary_path(root: &Path, name: &str) -> PathBuf {
    root.join("splunk").join("bin").join(name)
}

/// Directory that holds installed apps: `root/etc/apps`.
#[must_use]
pub fn apps_dir(root: &Path) -> PathBuf {
    root.join("etc").join("apps")
}

/// Parse a port from command output.
///
/// The tool may print banner or warning lines before the value, so the port
/// is taken from the last non-empty line of stdout. Returns `None` when no
/// line parses as a port.
#[must_use]
pub fn parse_port_output(stdout: &str) -> Option<u16> {
    stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())?
        .trim()
        .parse()
        .ok()
}

/// Normalize an install root to an absolute path.
///
/// Relative inputs are resolved against the current directory; the target
/// does not need to exist yet.
///
/// # Errors
///
/// Returns [`InstanceError::InvalidInstallRoot`] for an empty path or when
/// the current directory cannot be determined.
pub fn normalize_install_root(input: &Path) -> Result<PathBuf, InstanceError> {
    if input.as_os_str().is_empty() {
        return Err(InstanceError::InvalidInstallRoot {
            path: input.to_path_buf(),
            reason: "path is empty".to_string(),
        });
    }
    if input.is_absolute() {
        return Ok(input.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|err| InstanceError::InvalidInstallRoot {
        path: input.to_path_buf(),
        reason: format!("cannot resolve relative path: {err}"),
    })?;
    Ok(cwd.join(input))
}
