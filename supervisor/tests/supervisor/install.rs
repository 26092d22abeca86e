//! Installer behavior: payload copy, idempotence, hard failure on a missing
//! payload, provisioning failures surfacing from both entry points.

use crate::common::{test_settings, wire, write_payload, MockRunner, ScriptedProcessControl};
use hub_supervisor::error::InstallError;

#[tokio::test]
async fn install_copies_payload_and_provisions() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload");
    write_payload(&payload);
    let settings = test_settings(&dir.path().join("root"), 7423, &payload);
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::dead());

    hub.installer.install().unwrap();

    assert!(hub.settings.layout.entry_point.is_file());
    assert!(hub.settings.layout.manifest.is_file());
    assert!(hub.installer.is_present());

    // pip ran against the copied manifest
    let runs = hub.runner.runs.lock().unwrap().clone();
    assert!(runs.iter().any(|line| line.contains("pip install")));
}

#[tokio::test]
async fn reinstall_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload");
    write_payload(&payload);
    let root = dir.path().join("root");
    let settings = test_settings(&root, 7423, &payload);
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::dead());

    hub.installer.install().unwrap();
    let first: Vec<_> = walk(&root);

    hub.installer.install().unwrap();
    let second: Vec<_> = walk(&root);

    assert_eq!(first, second, "re-install must not duplicate files");
    assert!(hub.installer.is_installed().unwrap());
}

#[tokio::test]
async fn missing_payload_is_a_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload"); // never created
    let settings = test_settings(&dir.path().join("root"), 7423, &payload);
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::dead());

    let err = hub.installer.install().unwrap_err();
    assert!(matches!(err, InstallError::PayloadMissing { .. }));
    assert!(!hub.installer.is_present());
    assert!(!hub.installer.is_installed().unwrap());
}

#[tokio::test]
async fn provisioning_failure_surfaces_from_install() {
    let dir = tempfile::tempdir().unwrap();
    let payload = dir.path().join("payload");
    write_payload(&payload);
    let settings = test_settings(&dir.path().join("root"), 7423, &payload);
    let runner = MockRunner::new();
    runner.fail("pip install");
    let hub = wire(settings, runner, ScriptedProcessControl::dead());

    let err = hub.installer.install().unwrap_err();
    match err {
        InstallError::DependencyProvisioningFailed { output } => {
            assert!(output.contains("simulated failure"));
        }
        other => panic!("expected DependencyProvisioningFailed, got {other:?}"),
    }

    // The broken install must not read back as installed: the presence check
    // re-runs provisioning and surfaces the same failure.
    assert!(hub.installer.is_installed().is_err());
}

#[tokio::test]
async fn is_installed_false_without_manifest_or_entry() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir.path().join("root"), 7423, &dir.path().join("payload"));
    let hub = wire(settings, MockRunner::new(), ScriptedProcessControl::dead());

    assert!(!hub.installer.is_installed().unwrap());
    // No manifest on disk means no provisioning attempt either.
    assert!(hub.runner.runs.lock().unwrap().is_empty());
}

/// Sorted relative paths of every file under `root`.
fn walk(root: &std::path::Path) -> Vec<String> {
    fn visit(dir: &std::path::Path, root: &std::path::Path, out: &mut Vec<String>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let path = entry.path();
            if path.is_dir() {
                visit(&path, root, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().display().to_string());
            }
        }
    }
    let mut out = Vec::new();
    visit(root, root, &mut out);
    out.sort();
    out
}
