//! Command execution abstraction.
//!
//! Enables dependency injection for prerequisite checks, dependency
//! provisioning, and hub launch so tests can inject a mock.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// What to launch and where its output goes.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Command to execute (e.g. "python3").
    pub command: String,
    /// Arguments (e.g. the entry point path).
    pub args: Vec<String>,
    /// Working directory for the process.
    pub cwd: PathBuf,
    /// Log file receiving the child's stdout and stderr, opened in append mode.
    pub log_file: PathBuf,
}

/// Runs external commands on behalf of the supervisor.
pub trait CommandRunner: Send + Sync {
    /// Runs `cmd` with `args` to completion and returns the output.
    fn run(&self, cmd: &str, args: &[&str], cwd: Option<&Path>) -> io::Result<Output>;

    /// Launches a detached child per `spec` and returns its process id.
    ///
    /// The child must survive the exit of the calling process.
    fn spawn_detached(&self, spec: &LaunchSpec) -> io::Result<u32>;
}

/// Default implementation using `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct DefaultCommandRunner;

impl CommandRunner for DefaultCommandRunner {
    fn run(&self, cmd: &str, args: &[&str], cwd: Option<&Path>) -> io::Result<Output> {
        let mut command = Command::new(cmd);
        command.args(args);
        if let Some(cwd) = cwd {
            command.current_dir(cwd);
        }
        command.output()
    }

    fn spawn_detached(&self, spec: &LaunchSpec) -> io::Result<u32> {
        let out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&spec.log_file)?;
        let err = out.try_clone()?;

        let mut command = Command::new(&spec.command);
        command
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::from(out))
            .stderr(Stdio::from(err));

        // Detach: new process group so the child survives our exit.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const DETACHED_PROCESS: u32 = 0x0000_0008;
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
            command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
        }

        let child = command.spawn()?;
        Ok(child.id())
    }
}
