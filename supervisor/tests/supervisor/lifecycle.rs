//! Start/stop behavior: no-op starts, pid record management, startup
//! timeouts, race tolerance, and the full install-to-stop scenario.

use crate::common::{
    closed_port, pid_record_path, spawn_health_responder, test_settings, wire, write_installation,
    write_payload, write_pid_record, MockRunner, ScriptedProcessControl,
};
use hub_supervisor::error::SupervisorError;
use hub_supervisor::supervise::HubState;

#[tokio::test]
async fn start_is_noop_when_already_running() {
    let dir = tempfile::tempdir().unwrap();
    let (port, _responder) = spawn_health_responder().await;
    let settings = test_settings(&dir.path().join("root"), port, &dir.path().join("payload"));
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::alive(false));
    write_installation(&hub.settings);
    write_pid_record(&hub.settings, 4242);

    hub.supervisor.start().await.unwrap();

    assert_eq!(hub.runner.spawn_count(), 0, "no new process may be launched");
}

#[tokio::test]
async fn start_requires_installation() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir.path().join("root"), 7423, &dir.path().join("payload"));
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::dead());

    let err = hub.supervisor.start().await.unwrap_err();
    assert!(matches!(err, SupervisorError::NotInstalled));
}

#[tokio::test]
async fn start_launches_detached_and_records_pid() {
    let dir = tempfile::tempdir().unwrap();
    let (port, _responder) = spawn_health_responder().await;
    let settings = test_settings(&dir.path().join("root"), port, &dir.path().join("payload"));
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::alive(false));
    write_installation(&hub.settings);

    hub.supervisor.start().await.unwrap();

    let recorded = std::fs::read_to_string(pid_record_path(&hub.settings)).unwrap();
    assert_eq!(recorded.trim(), "4242");

    let spawns = hub.runner.spawns.lock().unwrap();
    assert_eq!(spawns.len(), 1);
    let spec = &spawns[0];
    assert_eq!(spec.cwd, hub.settings.layout.root);
    assert_eq!(spec.log_file, hub.settings.layout.log_file);
    assert!(spec.args[0].ends_with("main.py"));
}

#[tokio::test]
async fn start_times_out_pointing_at_log() {
    // Process launches and stays alive, but never serves.
    let dir = tempfile::tempdir().unwrap();
    let port = closed_port().await;
    let settings = test_settings(&dir.path().join("root"), port, &dir.path().join("payload"));
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::alive(false));
    write_installation(&hub.settings);

    let err = hub.supervisor.start().await.unwrap_err();
    match err {
        SupervisorError::StartupTimeout { log_file, .. } => {
            assert_eq!(log_file, hub.settings.layout.log_file);
        }
        other => panic!("expected StartupTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_spawn_tolerated_when_another_instance_won() {
    // Two instances race through the not-running check; ours loses the
    // launch (port already bound) while the winner's pid record lands a
    // moment later. start() must resolve this by probing, not error.
    let dir = tempfile::tempdir().unwrap();
    let (port, _responder) = spawn_health_responder().await;
    let settings = test_settings(&dir.path().join("root"), port, &dir.path().join("payload"));
    let runner = MockRunner::new();
    runner.refuse_spawns();
    let hub = wire(settings, runner, ScriptedProcessControl::alive(false));
    write_installation(&hub.settings);

    let winner_settings = hub.settings.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        write_pid_record(&winner_settings, 5151);
    });

    hub.supervisor.start().await.unwrap();
    assert_eq!(hub.runner.spawn_count(), 1, "our launch was attempted");
}

#[tokio::test]
async fn stop_clears_pid_record() {
    let dir = tempfile::tempdir().unwrap();
    let (port, _responder) = spawn_health_responder().await;
    let settings = test_settings(&dir.path().join("root"), port, &dir.path().join("payload"));
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::alive(true));
    write_installation(&hub.settings);
    write_pid_record(&hub.settings, 4242);

    hub.supervisor.stop().await.unwrap();

    assert!(!pid_record_path(&hub.settings).exists());
    assert!(!hub.supervisor.is_running().await);

    let terminated = hub.control.terminated.lock().unwrap();
    assert_eq!(terminated[0], (4242, true), "graceful signal first");
}

#[tokio::test]
async fn stop_is_noop_when_not_running() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir.path().join("root"), 7423, &dir.path().join("payload"));
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::dead());

    hub.supervisor.stop().await.unwrap();
    assert!(hub.control.terminated.lock().unwrap().is_empty());
}

#[tokio::test]
async fn install_start_stop_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload");
    write_payload(&payload);
    let (port, _responder) = spawn_health_responder().await;
    let settings = test_settings(&dir.path().join("root"), port, &payload);
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::alive(true));

    assert!(!hub.installer.is_installed().unwrap());

    hub.installer.install().unwrap();
    assert!(hub.installer.is_installed().unwrap());

    hub.supervisor.start().await.unwrap();
    assert!(hub.supervisor.is_running().await);

    let summary = hub.supervisor.status().await;
    assert_eq!(summary.state, HubState::Running);
    assert_eq!(
        summary.endpoint.as_deref(),
        Some(hub.settings.base_url().as_str())
    );

    hub.supervisor.stop().await.unwrap();
    assert!(!hub.supervisor.is_running().await);
    assert!(!pid_record_path(&hub.settings).exists());

    let summary = hub.supervisor.status().await;
    assert_eq!(summary.state, HubState::Stopped);
    assert!(summary.endpoint.is_none());
}
