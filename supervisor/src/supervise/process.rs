//! Platform process control.
//!
//! Small capability behind which the platform-specific liveness and
//! termination idioms live; the rest of the supervisor is platform-agnostic.

use std::io;

use sysinfo::{Pid, ProcessesToUpdate, System};

/// OS-level process inspection and termination.
pub trait ProcessControl: Send + Sync {
    /// Whether a process with this id exists, determined by querying the
    /// process table. Never signals the process on inspection.
    fn is_alive(&self, pid: u32) -> bool;

    /// Terminate the process: graceful asks it to shut down, non-graceful
    /// kills it outright. A process that is already gone counts as success.
    fn terminate(&self, pid: u32, graceful: bool) -> io::Result<()>;
}

/// Process control backed by the host OS.
#[derive(Debug, Clone, Default)]
pub struct SystemProcessControl;

impl ProcessControl for SystemProcessControl {
    fn is_alive(&self, pid: u32) -> bool {
        let pid = Pid::from_u32(pid);
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system.process(pid).is_some()
    }

    #[cfg(unix)]
    fn terminate(&self, pid: u32, graceful: bool) -> io::Result<()> {
        let signal = if graceful {
            libc::SIGTERM
        } else {
            libc::SIGKILL
        };
        let rc = unsafe { libc::kill(pid as libc::pid_t, signal) };
        if rc == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        // Already gone: termination achieved.
        if err.raw_os_error() == Some(libc::ESRCH) {
            return Ok(());
        }
        Err(err)
    }

    #[cfg(windows)]
    fn terminate(&self, pid: u32, graceful: bool) -> io::Result<()> {
        let pid_arg = pid.to_string();
        let mut args = vec!["/PID", pid_arg.as_str(), "/T"];
        if !graceful {
            args.push("/F");
        }
        let output = std::process::Command::new("taskkill").args(&args).output()?;
        if output.status.success() || !self.is_alive(pid) {
            Ok(())
        } else {
            Err(io::Error::other(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ))
        }
    }
}
