//! Command handlers module
//!
//! Handler functions for CLI commands. CommandContext resolves settings once
//! and builds the components handlers share.

use std::sync::Arc;

use anyhow::Result;

use hub_supervisor::config::{HubFileConfig, HubSettings, Overrides};
use hub_supervisor::install::Installer;
use hub_supervisor::prereq::Prereqs;
use hub_supervisor::publish::DefinitionPublisher;
use hub_supervisor::runner::DefaultCommandRunner;
use hub_supervisor::supervise::{Supervisor, SystemProcessControl};

use crate::cli::Cli;

pub mod definitions;
pub mod install;
pub mod lifecycle;
pub mod logs;
pub mod status;

pub use definitions::run_definitions;
pub use install::run_install;
pub use lifecycle::{run_start, run_stop};
pub use logs::run_logs;
pub use status::run_status;

/// Shared context for command handlers.
pub struct CommandContext {
    pub settings: Arc<HubSettings>,
    pub prereqs: Prereqs,
    pub installer: Installer,
    pub supervisor: Supervisor,
}

impl CommandContext {
    /// Resolve settings (CLI/env > .hub.toml > defaults) and wire components.
    pub fn new(cli: &Cli) -> Result<Self> {
        let file = HubFileConfig::load()?;
        let settings = HubSettings::resolve(
            file,
            Overrides {
                host: cli.host.clone(),
                port: cli.port,
                install_root: cli.install_root.clone(),
            },
        );

        let runner = Arc::new(DefaultCommandRunner);
        let control = Arc::new(SystemProcessControl);
        let prereqs = Prereqs::new(runner.clone());
        let installer = Installer::new(settings.clone(), runner.clone());
        let supervisor = Supervisor::new(settings.clone(), installer.clone(), runner, control);

        Ok(Self {
            settings,
            prereqs,
            installer,
            supervisor,
        })
    }

    /// Publisher over this context's components.
    pub fn publisher(&self) -> DefinitionPublisher {
        DefinitionPublisher::new(
            self.settings.clone(),
            self.installer.clone(),
            self.supervisor.clone(),
        )
    }
}
