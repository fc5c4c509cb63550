//! Integration tests for the splunkctl CLI.
//!
//! These tests spawn the actual binary and exercise argument parsing and
//! the no-installation paths end to end. They never require a real Splunk
//! installation.
