//! Unit tests for start/stop/restart verification, port discovery, and
//! uninstall behaviour.

#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use splunkctl::application::{Instance, StartEvent};
use splunkctl::domain::InstanceError;

use crate::helpers::{FakeTransport, output};

fn instance(transport: FakeTransport) -> Instance<FakeTransport> {
    Instance::new("/opt/splunk", transport).expect("instance")
}

// ── start ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn start_succeeds_when_probe_reports_running() {
    let mut instance = instance(FakeTransport::installed());
    let code = instance.start(false).await.expect("start");
    assert_eq!(code, 0);
    assert!(instance.is_running().await);
}

#[tokio::test]
async fn start_appends_common_flags_to_the_command() {
    let mut instance = instance(FakeTransport::installed());
    instance.start(false).await.expect("start");
    let calls = instance.transport().calls.borrow();
    let first = calls.first().expect("one command");
    assert_eq!(first[0], "start");
    assert!(first.contains(&"--accept-license".to_string()));
    assert!(first.contains(&"--no-prompt".to_string()));
    assert!(first.contains(&"--answer-yes".to_string()));
}

#[tokio::test]
async fn start_passes_the_auto_ports_flag() {
    let mut instance = instance(FakeTransport::installed());
    instance.start(true).await.expect("start");
    let calls = instance.transport().calls.borrow();
    assert!(calls.first().expect("one command").contains(&"--auto-ports".to_string()));
}

#[tokio::test]
async fn start_fails_on_clean_exit_code_when_probe_says_not_running() {
    let transport = FakeTransport::installed();
    // Exit code 0, but the running state never flips.
    transport.respond("start", output(0, "Starting...\n"));
    let mut instance = instance(transport);

    let err = instance.start(false).await.expect_err("must fail");
    let typed = err.downcast_ref::<InstanceError>().expect("typed error");
    let InstanceError::CouldNotStart(failure) = typed else {
        panic!("expected CouldNotStart, got {typed:?}");
    };
    assert!(failure.command.contains("start"));
    assert!(failure.command.contains("--accept-license"));
    assert_eq!(failure.code, 0);
    assert!(failure.stdout.contains("Starting..."));
}

#[tokio::test]
async fn start_tolerates_nonzero_exit_when_already_running() {
    let transport = FakeTransport::running();
    transport.respond("start", output(8, "splunkd is already running\n"));
    let mut instance = instance(transport);

    let code = instance.start(false).await.expect("start");
    assert_eq!(code, 8);
}

#[tokio::test]
async fn start_on_uninstalled_instance_is_not_installed() {
    let mut instance = instance(FakeTransport::default());
    let err = instance.start(false).await.expect_err("must fail");
    let typed = err.downcast_ref::<InstanceError>().expect("typed error");
    assert!(matches!(typed, InstanceError::NotInstalled { .. }));
}

// ── stop ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stop_is_idempotent_when_already_stopped() {
    let mut instance = instance(FakeTransport::installed());
    instance.stop().await.expect("first stop");
    instance.stop().await.expect("second stop");
}

#[tokio::test]
async fn stop_fails_when_probe_still_reports_running() {
    let transport = FakeTransport::running();
    transport.respond("stop", output(0, "Stopping...\n"));
    let mut instance = instance(transport);

    let err = instance.stop().await.expect_err("must fail");
    let typed = err.downcast_ref::<InstanceError>().expect("typed error");
    assert!(matches!(typed, InstanceError::CouldNotStop(_)));
}

// ── restart ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn restart_issues_a_single_restart_command() {
    let mut instance = instance(FakeTransport::running());
    let code = instance.restart().await.expect("restart");
    assert_eq!(code, 0);
    let commands = instance.transport().commands();
    assert!(commands.contains(&"restart".to_string()));
    assert!(!commands.contains(&"start".to_string()));
    assert!(!commands.contains(&"stop".to_string()));
}

#[tokio::test]
async fn restart_wraps_verification_failure_as_could_not_restart() {
    let transport = FakeTransport::installed();
    transport.respond("restart", output(0, ""));
    let mut instance = instance(transport);

    let err = instance.restart().await.expect_err("must fail");
    let typed = err.downcast_ref::<InstanceError>().expect("typed error");
    assert!(matches!(typed, InstanceError::CouldNotRestart(_)));
}

// ── is_running ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn is_running_is_false_when_not_installed_and_probes_nothing() {
    let instance = instance(FakeTransport::default());
    assert!(!instance.is_running().await);
    assert!(instance.transport().calls.borrow().is_empty());
}

#[tokio::test]
async fn is_running_checks_for_the_running_token() {
    let transport = FakeTransport::installed();
    transport.respond("status", output(0, "some other words\n"));
    let instance = instance(transport);
    assert!(!instance.is_running().await);

    let transport = FakeTransport::installed();
    transport.respond("status", output(64, "splunkd is running (PID: 7).\n"));
    let instance = Instance::new("/opt/splunk", transport).expect("instance");
    assert!(instance.is_running().await, "token wins over exit code");
}

// ── ports ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn port_is_parsed_from_last_non_empty_stdout_line() {
    let transport = FakeTransport::installed();
    transport.respond("soapport", output(0, "warning: banner text\n8089\n"));
    let mut instance = instance(transport);
    assert_eq!(instance.splunkd_port().await, Some(8089));
}

#[tokio::test]
async fn port_reads_are_cached_until_invalidated() {
    let transport = FakeTransport::installed();
    transport.respond("soapport", output(0, "8089\n"));
    transport.respond("httpport", output(0, "8000\n"));
    let mut instance = instance(transport);

    assert_eq!(instance.splunkd_port().await, Some(8089));
    instance.transport().responses.borrow_mut().clear();
    assert_eq!(instance.splunkd_port().await, Some(8089), "second read is cached");
    assert_eq!(instance.web_port().await, Some(8000), "web port cached by the same refresh");
}

#[tokio::test]
async fn port_is_unknown_when_query_exits_nonzero() {
    let transport = FakeTransport::installed();
    transport.respond("soapport", output(2, "8089\n"));
    transport.respond("httpport", output(2, "8000\n"));
    let mut instance = instance(transport);
    assert_eq!(instance.splunkd_port().await, None);
}

#[tokio::test]
async fn port_is_unknown_when_not_installed() {
    let mut instance = instance(FakeTransport::default());
    assert_eq!(instance.splunkd_port().await, None);
    assert_eq!(instance.web_port().await, None);
    assert!(instance.transport().calls.borrow().is_empty());
}

#[tokio::test]
async fn start_refreshes_the_port_caches() {
    let transport = FakeTransport::installed();
    transport.respond("soapport", output(0, "8089\n"));
    let mut instance = instance(transport);
    assert_eq!(instance.splunkd_port().await, Some(8089));

    instance.transport().respond("soapport", output(0, "9089\n"));
    instance.start(false).await.expect("start");
    assert_eq!(instance.splunkd_port().await, Some(9089));
}

#[tokio::test]
async fn uri_base_is_none_while_the_port_is_unknown() {
    let transport = FakeTransport::installed();
    transport.respond("soapport", output(2, ""));
    let mut instance = instance(transport);
    assert_eq!(instance.uri_base().await, None);

    instance.transport().respond("soapport", output(0, "8089\n"));
    assert_eq!(
        instance.uri_base().await.as_deref(),
        Some("https://localhost:8089")
    );
}

// ── listeners ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn listeners_are_notified_once_per_successful_start() {
    let transport = FakeTransport::installed();
    transport.respond("soapport", output(0, "8089\n"));
    transport.respond("httpport", output(0, "8000\n"));
    let mut instance = instance(transport);

    let events: Arc<Mutex<Vec<StartEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    instance.on_start(move |event| sink.lock().expect("lock").push(*event));

    instance.start(false).await.expect("start");
    instance.restart().await.expect("restart");

    let events = events.lock().expect("lock");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].splunkd_port, Some(8089));
    assert_eq!(events[0].web_port, Some(8000));
}

#[tokio::test]
async fn removed_listeners_are_not_notified() {
    let mut instance = instance(FakeTransport::installed());

    let events: Arc<Mutex<Vec<StartEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let token = instance.on_start(move |event| sink.lock().expect("lock").push(*event));
    assert!(instance.remove_on_start(token));

    instance.start(false).await.expect("start");
    assert!(events.lock().expect("lock").is_empty());
}

#[tokio::test]
async fn failed_start_does_not_notify_listeners() {
    let transport = FakeTransport::installed();
    transport.respond("start", output(0, ""));
    let mut instance = instance(transport);

    let events: Arc<Mutex<Vec<StartEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    instance.on_start(move |event| sink.lock().expect("lock").push(*event));

    assert!(instance.start(false).await.is_err());
    assert!(events.lock().expect("lock").is_empty());
}

// ── uninstall ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn uninstall_on_uninstalled_instance_is_a_no_op() {
    let mut instance = instance(FakeTransport::default());
    instance.uninstall().await.expect("uninstall");
    assert!(instance.transport().removed_trees.borrow().is_empty());
    assert!(instance.transport().calls.borrow().is_empty());
}

#[tokio::test]
async fn uninstall_stops_a_running_server_then_deletes_the_root() {
    let mut instance = instance(FakeTransport::running());
    instance.uninstall().await.expect("uninstall");
    assert!(instance.transport().commands().contains(&"stop".to_string()));
    assert_eq!(
        instance.transport().removed_trees.borrow().as_slice(),
        [PathBuf::from("/opt/splunk")]
    );
}

// ── misc ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn splunk_binary_resolves_under_the_install_root() {
    let instance = instance(FakeTransport::installed());
    assert_eq!(
        instance.splunk_binary().await,
        PathBuf::from("/opt/splunk/bin/splunk")
    );
}

#[tokio::test]
async fn version_returns_trimmed_stdout() {
    let transport = FakeTransport::installed();
    transport.respond("version", output(0, "Splunk 9.2.1 (build 78803f243968)\n"));
    let instance = instance(transport);
    assert_eq!(
        instance.version().await.expect("version"),
        "Splunk 9.2.1 (build 78803f243968)"
    );
}

#[tokio::test]
async fn version_failure_carries_command_context() {
    let transport = FakeTransport::installed();
    transport.respond("version", output(1, ""));
    let instance = instance(transport);
    let err = instance.version().await.expect_err("must fail");
    let typed = err.downcast_ref::<InstanceError>().expect("typed error");
    assert!(matches!(typed, InstanceError::CommandFailed(_)));
}

#[tokio::test]
async fn execute_on_uninstalled_instance_fails_fast() {
    let instance = instance(FakeTransport::default());
    let err = instance.execute(&["status"]).await.expect_err("must fail");
    let typed = err.downcast_ref::<InstanceError>().expect("typed error");
    assert!(matches!(typed, InstanceError::NotInstalled { .. }));
}

#[tokio::test]
async fn enable_listen_issues_the_listen_command() {
    let instance = instance(FakeTransport::installed());
    instance.enable_listen(9997).await.expect("enable");
    let calls = instance.transport().calls.borrow();
    let first = calls.first().expect("one command");
    assert_eq!(&first[..4], ["enable", "listen", "-port", "9997"]);
}
