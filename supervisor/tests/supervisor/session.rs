//! Session activation flow: prerequisite gating, install-on-activate,
//! ownership claims across instances, owner-only teardown.

use std::sync::Arc;

use crate::common::{
    pid_record_path, spawn_health_responder, test_settings, write_payload, MockRunner,
    ScriptedProcessControl,
};
use hub_supervisor::error::ActivationError;
use hub_supervisor::owner::{MemoryOwnershipStore, OwnershipStore};
use hub_supervisor::prereq::Prerequisite;
use hub_supervisor::session::HubSession;

fn store() -> Arc<dyn OwnershipStore> {
    Arc::new(MemoryOwnershipStore::new())
}

#[tokio::test]
async fn activation_halts_without_interpreter() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir.path().join("root"), 7423, &dir.path().join("payload"));
    let runner = MockRunner::new();
    runner.fail("python --version");
    runner.fail("python3 --version");
    let session = HubSession::with_parts(
        settings,
        store(),
        runner.clone(),
        ScriptedProcessControl::dead(),
    );

    let err = session.activate().await.unwrap_err();
    assert!(matches!(
        err,
        ActivationError::PrerequisiteMissing(Prerequisite::Interpreter)
    ));
    assert_eq!(runner.spawn_count(), 0, "flow halts before any launch");
}

#[tokio::test]
async fn activation_halts_without_container_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir.path().join("root"), 7423, &dir.path().join("payload"));
    let runner = MockRunner::new();
    runner.fail("docker --version");
    runner.fail("podman --version");
    let session = HubSession::with_parts(
        settings,
        store(),
        runner,
        ScriptedProcessControl::dead(),
    );

    let err = session.activate().await.unwrap_err();
    assert!(matches!(
        err,
        ActivationError::PrerequisiteMissing(Prerequisite::ContainerRuntime)
    ));
}

#[tokio::test]
async fn activation_installs_claims_and_starts() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload");
    write_payload(&payload);
    let (port, _responder) = spawn_health_responder().await;
    let settings = test_settings(&dir.path().join("root"), port, &payload);
    let session = HubSession::with_parts(
        settings.clone(),
        store(),
        MockRunner::new(),
        ScriptedProcessControl::alive(false),
    );
    let mut changes = session.publisher().subscribe();

    let activation = session.activate().await.unwrap();

    assert!(activation.owner);
    assert!(session.installer().is_present());
    assert!(pid_record_path(&settings).exists());
    assert!(session.supervisor().is_running().await);
    assert!(changes.has_changed().unwrap(), "subscribers were notified");

    let definitions = session.publisher().definitions();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].url, settings.mcp_url());
}

#[tokio::test]
async fn second_instance_defers_to_running_owner() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload");
    write_payload(&payload);
    let (port, _responder) = spawn_health_responder().await;
    let settings = test_settings(&dir.path().join("root"), port, &payload);
    let shared = store();

    let first = HubSession::with_parts(
        settings.clone(),
        shared.clone(),
        MockRunner::new(),
        ScriptedProcessControl::alive(false),
    );
    assert!(first.activate().await.unwrap().owner);

    let second_runner = MockRunner::new();
    let second = HubSession::with_parts(
        settings,
        shared,
        second_runner.clone(),
        ScriptedProcessControl::alive(false),
    );
    let activation = second.activate().await.unwrap();

    assert!(!activation.owner);
    assert_eq!(
        second_runner.spawn_count(),
        0,
        "non-owner must not launch a second hub"
    );
}

#[tokio::test]
async fn deactivate_stops_only_when_owner() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload");
    write_payload(&payload);
    let (port, _responder) = spawn_health_responder().await;
    let settings = test_settings(&dir.path().join("root"), port, &payload);
    let shared = store();
    let control = ScriptedProcessControl::alive(true);

    let owner = HubSession::with_parts(
        settings.clone(),
        shared.clone(),
        MockRunner::new(),
        control.clone(),
    );
    assert!(owner.activate().await.unwrap().owner);

    let bystander = HubSession::with_parts(
        settings.clone(),
        shared.clone(),
        MockRunner::new(),
        control.clone(),
    );
    assert!(!bystander.activate().await.unwrap().owner);

    // The bystander leaving must not take the shared hub down.
    bystander.deactivate().await.unwrap();
    assert!(pid_record_path(&settings).exists());

    owner.deactivate().await.unwrap();
    assert!(!pid_record_path(&settings).exists());
    assert!(owner.coordinator().current_owner().await.is_none());
}
