//! Transport-polymorphic control of Splunk server installations.
//!
//! An [`application::Instance`] binds an install root to one execution
//! transport — a local subprocess spawner or a remote shell session — and
//! exposes a uniform lifecycle contract: install, start, stop, restart,
//! uninstall, and port/state discovery. Test and automation callers drive
//! everything through that contract without knowing where the installation
//! lives.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;
