//! Application layer — port traits and the instance controller.

pub mod acquire;
pub mod apps;
pub mod install;
pub mod instance;
pub mod ports;

pub use instance::{Instance, ListenerToken, StartEvent};
pub use ports::{Archiver, ExecOutput, ExecutionTransport, PackageResolver, RemoteShell};
