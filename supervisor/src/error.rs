//! Error types for installation, supervision, and session activation.

use std::path::PathBuf;

use thiserror::Error;

use crate::prereq::Prerequisite;

/// Errors from installing the hub payload.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The bundled payload directory does not exist. This is a hard failure;
    /// no substitute payload is synthesized.
    #[error("bundled hub payload not found at {path}")]
    PayloadMissing { path: PathBuf },

    /// `pip install -r requirements.txt` failed. Carries the tool output.
    #[error("failed to provision hub dependencies: {output}")]
    DependencyProvisioningFailed { output: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors from starting or stopping the hub process.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("hub is not installed; run `hubctl install` first")]
    NotInstalled,

    /// The hub did not answer a health probe within the startup budget.
    /// The cause lives in the hub's own output, so point at the log file.
    #[error("hub did not become ready within {budget_secs}s; check the log at {log_file}")]
    StartupTimeout { budget_secs: u64, log_file: PathBuf },

    #[error("failed to signal hub process {pid}")]
    StopFailed {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors from the session activation flow.
///
/// A missing prerequisite halts the flow; it is reported to the caller and
/// never retried automatically.
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("{0} is required but was not found on this system")]
    PrerequisiteMissing(Prerequisite),

    #[error(transparent)]
    Install(#[from] InstallError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}
