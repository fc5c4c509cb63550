//! Unit tests for package acquisition: resolver delegation and guaranteed
//! archive cleanup.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use splunkctl::application::Instance;
use splunkctl::domain::package::{Channel, PackageDescriptor, PackageKind, Platform};

use crate::helpers::{FakeArchiver, FakeResolver, FakeTransport};

fn instance() -> Instance<FakeTransport> {
    Instance::new("/opt/splunk", FakeTransport::default()).expect("instance")
}

fn descriptor() -> PackageDescriptor {
    PackageDescriptor {
        channel: Channel::Released {
            version: Some("9.2.1".to_string()),
        },
        platform: Platform::LinuxX86_64,
        kind: PackageKind::Full,
    }
}

fn downloaded_archive(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("splunk-9.2.1-Linux-x86_64.tgz");
    std::fs::write(&path, b"archive bytes").expect("write archive");
    path
}

#[tokio::test]
async fn downloaded_archive_is_removed_after_a_successful_install() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = downloaded_archive(&dir);
    let resolver = FakeResolver::with_archive(archive.clone());
    let archiver = FakeArchiver::with_entries(&["splunk"]);
    let mut instance = instance();

    instance
        .install_from_package(&resolver, &archiver, &descriptor())
        .await
        .expect("install");

    assert!(!archive.exists(), "archive is cleaned up after install");
    assert_eq!(resolver.resolved.borrow().len(), 1);
}

#[tokio::test]
async fn downloaded_archive_is_removed_even_when_the_install_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = downloaded_archive(&dir);
    let resolver = FakeResolver::with_archive(archive.clone());
    let archiver = FakeArchiver::failing();
    let mut instance = instance();

    let err = instance
        .install_from_package(&resolver, &archiver, &descriptor())
        .await
        .expect_err("install fails");
    assert!(err.to_string().contains("extracting"));
    assert!(!archive.exists(), "archive is cleaned up on failure too");
}

#[tokio::test]
async fn resolver_failures_propagate_and_nothing_is_extracted() {
    let resolver = FakeResolver::unavailable();
    let archiver = FakeArchiver::with_entries(&["splunk"]);
    let mut instance = instance();

    let err = instance
        .install_from_package(&resolver, &archiver, &descriptor())
        .await
        .expect_err("resolution fails");
    assert!(err.to_string().contains("404"));
    assert!(archiver.last_dest.borrow().is_none());
}

#[tokio::test]
async fn nightly_forwarder_descriptor_reaches_the_resolver() {
    let dir = tempfile::tempdir().expect("tempdir");
    let archive = downloaded_archive(&dir);
    let resolver = FakeResolver::with_archive(archive);
    let archiver = FakeArchiver::with_entries(&["splunkforwarder"]);
    let mut instance = instance();

    instance
        .install_nightly_forwarder(
            &resolver,
            &archiver,
            Platform::LinuxX86_64,
            Some("develop".to_string()),
            None,
        )
        .await
        .expect("install");

    let resolved = resolver.resolved.borrow();
    let package = resolved.first().expect("one resolution");
    assert_eq!(package.kind, PackageKind::UniversalForwarder);
    assert_eq!(
        package.channel,
        Channel::Nightly {
            branch: Some("develop".to_string()),
            build: None,
        }
    );
}
