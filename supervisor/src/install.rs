//! Hub installation.
//!
//! Materializes the bundled hub payload into the per-user install root and
//! provisions its Python dependencies. Installation is idempotent: re-running
//! it overwrites the copied tree file by file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::HubSettings;
use crate::error::InstallError;
use crate::prereq::Prereqs;
use crate::runner::CommandRunner;

/// Well-known paths inside (and beside) the install root.
///
/// An installation is *present* iff both the entry point and the dependency
/// manifest exist on disk.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    pub root: PathBuf,
    pub entry_point: PathBuf,
    pub manifest: PathBuf,
    pub pid_file: PathBuf,
    pub log_file: PathBuf,
}

impl InstallLayout {
    pub fn new(root: PathBuf) -> Self {
        let entry_point = root.join("hub").join("main.py");
        let manifest = root.join("requirements.txt");
        let pid_file = root.join("hub.pid");
        let log_file = root.join("hub.log");
        Self {
            root,
            entry_point,
            manifest,
            pid_file,
            log_file,
        }
    }
}

/// Installs the hub payload and provisions its dependencies.
#[derive(Clone)]
pub struct Installer {
    settings: Arc<HubSettings>,
    runner: Arc<dyn CommandRunner>,
}

impl Installer {
    pub fn new(settings: Arc<HubSettings>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { settings, runner }
    }

    /// Pure presence check: entry point and manifest both on disk.
    pub fn is_present(&self) -> bool {
        let layout = &self.settings.layout;
        layout.entry_point.is_file() && layout.manifest.is_file()
    }

    /// Whether the hub is installed.
    ///
    /// When a manifest is present this opportunistically re-runs dependency
    /// provisioning (idempotent); a provisioning failure surfaces as
    /// [`InstallError::DependencyProvisioningFailed`] rather than being
    /// swallowed.
    pub fn is_installed(&self) -> Result<bool, InstallError> {
        if self.settings.layout.manifest.is_file() {
            self.provision_dependencies()?;
        }
        Ok(self.is_present())
    }

    /// Copy the bundled payload into the install root and provision
    /// dependencies.
    pub fn install(&self) -> Result<(), InstallError> {
        let layout = &self.settings.layout;
        fs::create_dir_all(&layout.root)?;

        let payload = &self.settings.payload_dir;
        if !payload.is_dir() {
            return Err(InstallError::PayloadMissing {
                path: payload.clone(),
            });
        }

        copy_tree(payload, &layout.root)?;

        if layout.manifest.is_file() {
            self.provision_dependencies()?;
        }

        info!(root = %layout.root.display(), "hub installed");
        Ok(())
    }

    /// `pip install -r requirements.txt` against the installed manifest.
    fn provision_dependencies(&self) -> Result<(), InstallError> {
        let layout = &self.settings.layout;
        let interpreter = Prereqs::new(self.runner.clone())
            .interpreter_command()
            .ok_or_else(|| InstallError::DependencyProvisioningFailed {
                output: "no python interpreter found".to_string(),
            })?;

        debug!(interpreter, "provisioning hub dependencies");
        let manifest = layout.manifest.to_string_lossy().into_owned();
        let output = self
            .runner
            .run(
                interpreter,
                &["-m", "pip", "install", "-r", &manifest],
                Some(&layout.root),
            )
            .map_err(|e| InstallError::DependencyProvisioningFailed {
                output: e.to_string(),
            })?;

        if !output.status.success() {
            let mut detail = String::from_utf8_lossy(&output.stderr).into_owned();
            if detail.trim().is_empty() {
                detail = String::from_utf8_lossy(&output.stdout).into_owned();
            }
            return Err(InstallError::DependencyProvisioningFailed { output: detail });
        }

        Ok(())
    }
}

/// Recursive file-by-file copy preserving directory structure and
/// overwriting existing files.
fn copy_tree(source: &Path, destination: &Path) -> std::io::Result<()> {
    fs::create_dir_all(destination)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = destination.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_tree(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path)?;
        }
    }

    Ok(())
}
