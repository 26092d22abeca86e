//! Hub process supervision.
//!
//! Owns the lifecycle of the managed hub process: start, stop, liveness
//! detection, and health verification. Liveness is decided by the PID record
//! corroborated by an HTTP health probe; a recorded pid alone proves
//! nothing, since pids get reused.

mod health;
mod process;

pub use process::{ProcessControl, SystemProcessControl};

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::HubSettings;
use crate::error::SupervisorError;
use crate::install::Installer;
use crate::runner::{CommandRunner, LaunchSpec};

/// Initial delay of the readiness poll loop; doubles up to [`POLL_MAX`].
const POLL_INITIAL: Duration = Duration::from_millis(500);
const POLL_MAX: Duration = Duration::from_secs(2);

/// Interval between liveness re-checks while waiting for a graceful stop.
const STOP_POLL: Duration = Duration::from_millis(250);

/// Coarse hub state, for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubState {
    NotInstalled,
    Stopped,
    Running,
}

impl std::fmt::Display for HubState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HubState::NotInstalled => write!(f, "not installed"),
            HubState::Stopped => write!(f, "stopped"),
            HubState::Running => write!(f, "running"),
        }
    }
}

/// Snapshot of hub state plus its endpoint when running.
#[derive(Debug, Clone)]
pub struct StatusSummary {
    pub state: HubState,
    pub endpoint: Option<String>,
    pub docs_url: Option<String>,
}

/// Supervises the hub process.
#[derive(Clone)]
pub struct Supervisor {
    settings: Arc<HubSettings>,
    installer: Installer,
    runner: Arc<dyn CommandRunner>,
    control: Arc<dyn ProcessControl>,
    http: reqwest::Client,
}

impl Supervisor {
    pub fn new(
        settings: Arc<HubSettings>,
        installer: Installer,
        runner: Arc<dyn CommandRunner>,
        control: Arc<dyn ProcessControl>,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(settings.health_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            settings,
            installer,
            runner,
            control,
            http,
        }
    }

    /// Whether the hub is running *and* serving.
    ///
    /// A PID record pointing at a process that no longer exists is healed
    /// silently: the record is removed and the hub reported as not running.
    pub async fn is_running(&self) -> bool {
        let pid_file = &self.settings.layout.pid_file;
        let Some(pid) = read_pid_record(pid_file) else {
            return false;
        };

        if !self.control.is_alive(pid) {
            debug!(pid, "stale pid record, removing");
            let _ = fs::remove_file(pid_file);
            return false;
        }

        health::probe(
            &self.http,
            &self.settings.base_url(),
            &self.settings.health_paths,
        )
        .await
    }

    /// Launch the hub as a detached process and wait for it to become ready.
    ///
    /// No-op when already running. Two instances may race through the
    /// `is_running` check; a spawn failure (port already bound, pid record
    /// overwritten) is therefore treated as "someone else may have started
    /// it" and resolved by re-probing before an error is surfaced.
    pub async fn start(&self) -> Result<(), SupervisorError> {
        if self.is_running().await {
            debug!("hub already running");
            return Ok(());
        }

        if !self.installer.is_installed()? {
            return Err(SupervisorError::NotInstalled);
        }

        let layout = &self.settings.layout;
        let interpreter = crate::prereq::Prereqs::new(self.runner.clone())
            .interpreter_command()
            .unwrap_or("python3");

        let spec = LaunchSpec {
            command: interpreter.to_string(),
            args: vec![layout.entry_point.to_string_lossy().into_owned()],
            cwd: layout.root.clone(),
            log_file: layout.log_file.clone(),
        };

        info!(command = %spec.command, entry = %layout.entry_point.display(), "starting hub");
        match self.runner.spawn_detached(&spec) {
            Ok(pid) => {
                debug!(pid, "hub process spawned");
                fs::write(&layout.pid_file, format!("{pid}\n"))?;
            }
            Err(e) => {
                warn!(error = %e, "hub launch failed, checking for a concurrent start");
            }
        }

        // Poll with backoff until the hub answers a probe, capped at the
        // startup budget.
        let budget = self.settings.startup_budget;
        let started = Instant::now();
        let mut delay = POLL_INITIAL;
        while started.elapsed() < budget {
            let remaining = budget.saturating_sub(started.elapsed());
            sleep(delay.min(remaining)).await;
            if self.is_running().await {
                info!(elapsed_ms = started.elapsed().as_millis(), "hub ready");
                return Ok(());
            }
            delay = (delay * 2).min(POLL_MAX);
        }

        // Lost-race re-check before giving up.
        if self.is_running().await {
            return Ok(());
        }

        Err(SupervisorError::StartupTimeout {
            budget_secs: budget.as_secs(),
            log_file: layout.log_file.clone(),
        })
    }

    /// Stop the hub: graceful signal first, forceful kill if it lingers.
    ///
    /// No-op when not running. Deletes the PID record on success.
    pub async fn stop(&self) -> Result<(), SupervisorError> {
        if !self.is_running().await {
            debug!("hub not running");
            return Ok(());
        }

        let pid_file = &self.settings.layout.pid_file;
        let Some(pid) = read_pid_record(pid_file) else {
            return Ok(());
        };

        info!(pid, "stopping hub");
        self.control
            .terminate(pid, true)
            .map_err(|source| SupervisorError::StopFailed { pid, source })?;

        let deadline = Instant::now() + self.settings.stop_grace;
        while self.control.is_alive(pid) && Instant::now() < deadline {
            sleep(STOP_POLL).await;
        }

        if self.control.is_alive(pid) {
            warn!(pid, "hub ignored graceful shutdown, killing");
            self.control
                .terminate(pid, false)
                .map_err(|source| SupervisorError::StopFailed { pid, source })?;
        }

        let _ = fs::remove_file(pid_file);
        Ok(())
    }

    /// Compose liveness into a short status plus the endpoint when running.
    pub async fn status(&self) -> StatusSummary {
        if self.is_running().await {
            return StatusSummary {
                state: HubState::Running,
                endpoint: Some(self.settings.base_url()),
                docs_url: Some(self.settings.docs_url()),
            };
        }

        let state = if self.installer.is_present() {
            HubState::Stopped
        } else {
            HubState::NotInstalled
        };
        StatusSummary {
            state,
            endpoint: None,
            docs_url: None,
        }
    }
}

/// Read the single-line decimal pid from the record file.
///
/// An unreadable or unparseable record is treated like a stale one: removed,
/// and reported as absent.
fn read_pid_record(path: &Path) -> Option<u32> {
    let content = fs::read_to_string(path).ok()?;
    match content.trim().parse::<u32>() {
        Ok(pid) => Some(pid),
        Err(_) => {
            warn!(path = %path.display(), "unparseable pid record, removing");
            let _ = fs::remove_file(path);
            None
        }
    }
}
