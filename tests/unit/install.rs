//! Unit tests for the install orchestration: scratch lifetime, product-root
//! probing, and relocation through the transport.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use splunkctl::application::Instance;
use splunkctl::domain::InstanceError;

use crate::helpers::{FakeArchiver, FakeTransport};

fn instance(transport: FakeTransport) -> Instance<FakeTransport> {
    Instance::new("/opt/splunk", transport).expect("instance")
}

fn scratch_path(archiver: &FakeArchiver) -> PathBuf {
    archiver
        .last_dest
        .borrow()
        .clone()
        .expect("archiver was invoked")
}

#[tokio::test]
async fn install_detects_the_product_directory_and_relocates_it() {
    let mut instance = instance(FakeTransport::default());
    let archiver = FakeArchiver::with_entries(&["splunk"]);

    instance
        .install_from_archive(&archiver, Path::new("/downloads/splunk.tgz"))
        .await
        .expect("install");

    let pushed = instance.transport().pushed.borrow();
    let (src, dest) = pushed.first().expect("one relocation");
    assert!(src.ends_with("splunk"), "product root is the matched entry");
    assert_eq!(dest, &PathBuf::from("/opt/splunk"));
}

#[tokio::test]
async fn install_removes_the_scratch_directory_on_success() {
    let mut instance = instance(FakeTransport::default());
    let archiver = FakeArchiver::with_entries(&["splunk"]);

    instance
        .install_from_archive(&archiver, Path::new("/downloads/splunk.tgz"))
        .await
        .expect("install");

    assert!(!scratch_path(&archiver).exists());
}

#[tokio::test]
async fn install_removes_the_scratch_directory_when_no_product_root_matches() {
    let mut instance = instance(FakeTransport::default());
    let archiver = FakeArchiver::with_entries(&["unexpected-layout"]);

    let err = instance
        .install_from_archive(&archiver, Path::new("/downloads/splunk.tgz"))
        .await
        .expect_err("must fail");
    let typed = err.downcast_ref::<InstanceError>().expect("typed error");
    assert!(matches!(typed, InstanceError::CouldNotFindProductDirectory));
    assert!(!scratch_path(&archiver).exists());
    assert!(
        instance.transport().pushed.borrow().is_empty(),
        "nothing is relocated on a layout failure"
    );
}

#[tokio::test]
async fn install_removes_the_scratch_directory_when_extraction_fails() {
    let mut instance = instance(FakeTransport::default());
    let archiver = FakeArchiver::failing();

    let err = instance
        .install_from_archive(&archiver, Path::new("/downloads/splunk.tgz"))
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("extracting"));
    assert!(!scratch_path(&archiver).exists());
}

#[tokio::test]
async fn install_stops_a_running_server_first() {
    let mut instance = instance(FakeTransport::running());
    let archiver = FakeArchiver::with_entries(&["splunkforwarder"]);

    instance
        .install_from_archive(&archiver, Path::new("/downloads/uf.tgz"))
        .await
        .expect("install");

    assert!(instance.transport().commands().contains(&"stop".to_string()));
}

#[tokio::test]
async fn install_does_not_probe_stop_when_nothing_is_installed() {
    let mut instance = instance(FakeTransport::default());
    let archiver = FakeArchiver::with_entries(&["splunk"]);

    instance
        .install_from_archive(&archiver, Path::new("/downloads/splunk.tgz"))
        .await
        .expect("install");

    assert!(
        !instance.transport().commands().contains(&"stop".to_string()),
        "no stop is issued against an empty install root"
    );
}

#[tokio::test]
async fn install_does_not_start_the_server_afterwards() {
    let mut instance = instance(FakeTransport::default());
    let archiver = FakeArchiver::with_entries(&["splunk"]);

    instance
        .install_from_archive(&archiver, Path::new("/downloads/splunk.tgz"))
        .await
        .expect("install");

    let commands = instance.transport().commands();
    assert!(!commands.contains(&"start".to_string()));
    assert!(!commands.contains(&"restart".to_string()));
}

#[tokio::test]
async fn end_to_end_install_then_start() {
    // Fresh instance, nothing installed yet.
    let mut instance = instance(FakeTransport::default());
    assert!(!instance.is_installed().await);

    let archiver = FakeArchiver::with_entries(&["splunk"]);
    instance
        .install_from_archive(&archiver, Path::new("/downloads/splunk.tgz"))
        .await
        .expect("install");

    // The relocation marked the fake installation present; now bring it up.
    assert!(instance.is_installed().await);
    let code = instance.start(false).await.expect("start");
    assert_eq!(code, 0);
    assert!(instance.is_running().await);
}
