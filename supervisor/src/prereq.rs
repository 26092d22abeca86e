//! Prerequisite checks for the host system.
//!
//! The hub needs a Python interpreter to run and a container runtime to
//! manage MCP servers. Each check invokes the dependency's version command
//! (canonical name first, then a fallback alias); the container runtime is
//! additionally probed with a runtime-level command to confirm the daemon,
//! not just the CLI, is reachable. No failure propagates past this boundary.

use std::sync::Arc;

use crate::runner::CommandRunner;

/// Interpreter launcher candidates, in probe order.
const INTERPRETER_CANDIDATES: [&str; 2] = ["python", "python3"];

/// Container runtime CLI candidates, in probe order.
const CONTAINER_CANDIDATES: [&str; 2] = ["docker", "podman"];

/// A host dependency the hub cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    Interpreter,
    ContainerRuntime,
}

impl std::fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prerequisite::Interpreter => write!(f, "Python"),
            Prerequisite::ContainerRuntime => write!(f, "Docker"),
        }
    }
}

/// Checks host prerequisites via the injected [`CommandRunner`].
#[derive(Clone)]
pub struct Prereqs {
    runner: Arc<dyn CommandRunner>,
}

impl Prereqs {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Whether a usable Python interpreter is on the host.
    pub fn has_interpreter(&self) -> bool {
        self.interpreter_command().is_some()
    }

    /// The launcher name the hub should be started with.
    pub fn interpreter_command(&self) -> Option<&'static str> {
        INTERPRETER_CANDIDATES
            .into_iter()
            .find(|cmd| self.version_ok(cmd))
    }

    /// Whether a container runtime is installed *and* its daemon is reachable.
    pub fn has_container_runtime(&self) -> bool {
        self.container_command().is_some()
    }

    /// The container CLI whose daemon answered.
    pub fn container_command(&self) -> Option<&'static str> {
        CONTAINER_CANDIDATES
            .into_iter()
            .find(|cmd| self.version_ok(cmd) && self.daemon_ok(cmd))
    }

    fn version_ok(&self, cmd: &str) -> bool {
        self.runner
            .run(cmd, &["--version"], None)
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    /// `<cli> ps` exercises the daemon, not just the binary.
    fn daemon_ok(&self, cmd: &str) -> bool {
        self.runner
            .run(cmd, &["ps"], None)
            .map(|out| out.status.success())
            .unwrap_or(false)
    }
}
