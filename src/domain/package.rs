//! Package descriptors consumed by the acquisition adapter.

use anyhow::Result;

/// Release channel a package is resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    /// Nightly build from a development branch. `None` means the default
    /// branch / latest build.
    Nightly {
        branch: Option<String>,
        build: Option<String>,
    },
    /// Published release. `None` means the latest version.
    Released { version: Option<String> },
}

/// Target platform of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    LinuxX86_64,
    LinuxAarch64,
    DarwinX86_64,
    DarwinAarch64,
    WindowsX86_64,
}

impl Platform {
    /// Platform of the machine this process runs on.
    ///
    /// # Errors
    ///
    /// Returns an error for an OS/architecture combination no package is
    /// published for.
    pub fn host() -> Result<Self> {
        Self::from_uname(std::env::consts::OS, std::env::consts::ARCH)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unsupported platform: {}-{}",
                    std::env::consts::OS,
                    std::env::consts::ARCH
                )
            })
    }

    /// Map an OS / machine pair (as printed by `uname -s` / `uname -m`, or
    /// the values of `std::env::consts`) to a platform.
    #[must_use]
    pub fn from_uname(os: &str, machine: &str) -> Option<Self> {
        let os = os.trim().to_ascii_lowercase();
        let machine = machine.trim().to_ascii_lowercase();
        match (os.as_str(), machine.as_str()) {
            ("linux", "x86_64" | "amd64") => Some(Self::LinuxX86_64),
            ("linux", "aarch64" | "arm64") => Some(Self::LinuxAarch64),
            ("darwin" | "macos", "x86_64") => Some(Self::DarwinX86_64),
            ("darwin" | "macos", "aarch64" | "arm64") => Some(Self::DarwinAarch64),
            ("windows", "x86_64" | "amd64") => Some(Self::WindowsX86_64),
            _ => None,
        }
    }

    /// Label used in package file names, e.g. `Linux-x86_64`.
    #[must_use]
    pub fn file_label(self) -> &'static str {
        match self {
            Self::LinuxX86_64 => "Linux-x86_64",
            Self::LinuxAarch64 => "Linux-aarch64",
            Self::DarwinX86_64 => "Darwin-x86_64",
            Self::DarwinAarch64 => "Darwin-arm64",
            Self::WindowsX86_64 => "Windows-x86_64",
        }
    }
}

/// Whether a package carries the full product or the universal forwarder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    Full,
    UniversalForwarder,
}

impl PackageKind {
    /// File-name prefix of this package kind.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Full => "splunk",
            Self::UniversalForwarder => "splunkforwarder",
        }
    }
}

/// Immutable description of one package to acquire.
///
/// Constructed by the caller, resolved to a local archive by a
/// `PackageResolver`, and discarded once the archive has been installed (or
/// the attempt failed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub channel: Channel,
    pub platform: Platform,
    pub kind: PackageKind,
}

impl PackageDescriptor {
    /// Archive file name this descriptor resolves to,
    /// e.g. `splunkforwarder-9.2.1-Linux-x86_64.tgz`.
    #[must_use]
    pub fn file_name(&self) -> String {
        let version = match &self.channel {
            Channel::Nightly { build, .. } => build.clone().unwrap_or_else(|| "latest".to_string()),
            Channel::Released { version } => {
                version.clone().unwrap_or_else(|| "latest".to_string())
            }
        };
        format!(
            "{}-{}-{}.tgz",
            self.kind.prefix(),
            version,
            self.platform.file_label()
        )
    }

    /// Path component under the resolver base URL this descriptor lives in.
    #[must_use]
    pub fn channel_path(&self) -> String {
        match &self.channel {
            Channel::Nightly { branch, .. } => format!(
                "nightly/{}",
                branch.as_deref().unwrap_or("current")
            ),
            Channel::Released { .. } => "released".to_string(),
        }
    }
}
