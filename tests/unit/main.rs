//! Unit tests for splunkctl.
//!
//! These tests drive the instance controller through scripted fakes and run
//! fast without spawning processes or touching the network.

mod acquire;
mod install;
mod lifecycle;
