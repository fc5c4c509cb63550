//! Production adapters fulfilling the application-layer ports.

pub mod archiver;
pub mod config;
pub mod fs;
pub mod local;
pub mod remote;
pub mod resolver;

pub use archiver::TarArchiver;
pub use local::LocalTransport;
pub use remote::{RemoteTransport, SshSession};
pub use resolver::HttpPackageResolver;
